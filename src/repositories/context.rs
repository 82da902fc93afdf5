//! DbContext - Contesto di persistenza con scope di una singola richiesta
//!
//! I repository registrano le modifiche nel change set; `save_changes` le
//! scrive tutte insieme, sulla transazione esplicita se attiva, altrimenti
//! dentro una transazione implicita. Il change set si svuota solo se il
//! salvataggio riesce.

use super::traits::UnitOfWork;
use super::transaction::{MySqlDriver, TransactionSlot};
use crate::entities::Product;
use sqlx::{MySqlConnection, MySqlPool};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// A mutation staged by a repository, not yet written to the store
#[derive(Debug, Clone, PartialEq)]
pub enum PendingChange {
    Insert(Product),
    Update(Product),
    Delete(Uuid),
}

pub struct DbContext {
    pool: MySqlPool,
    changes: Mutex<Vec<PendingChange>>,
    transaction: TransactionSlot<MySqlDriver>,
}

impl DbContext {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            transaction: TransactionSlot::new(MySqlDriver::new(pool.clone())),
            changes: Mutex::new(Vec::new()),
            pool,
        }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub async fn stage(&self, change: PendingChange) {
        debug!("Staging change: {:?}", change);
        self.changes.lock().await.push(change);
    }

    pub async fn pending_count(&self) -> usize {
        self.changes.lock().await.len()
    }
}

impl UnitOfWork for DbContext {
    #[instrument(skip(self))]
    async fn save_changes(&self) -> Result<u64, sqlx::Error> {
        let mut staged = self.changes.lock().await;
        if staged.is_empty() {
            debug!("No pending changes to save");
            return Ok(0);
        }

        let mut active = self.transaction.lock().await;
        let outcome = match active.as_mut() {
            Some(transaction) => flush(transaction.connection(), &staged).await,
            None => flush_in_new_transaction(&self.pool, &staged).await,
        };

        match outcome {
            Ok(affected) => {
                staged.clear();
                info!("Saved changes, {} rows affected", affected);
                Ok(affected)
            }
            Err(err) => {
                warn!("Save failed, {} staged changes kept: {}", staged.len(), err);
                Err(err)
            }
        }
    }

    async fn begin_transaction(&self) -> Result<(), sqlx::Error> {
        self.transaction.begin().await
    }

    async fn commit(&self) -> Result<(), sqlx::Error> {
        self.transaction.commit().await
    }

    async fn rollback(&self) -> Result<(), sqlx::Error> {
        self.transaction.rollback().await
    }
}

/// Transazione implicita: se `flush` fallisce il drop di `tx` fa il rollback
async fn flush_in_new_transaction(pool: &MySqlPool, changes: &[PendingChange]) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let affected = flush(&mut *tx, changes).await?;
    tx.commit().await?;
    Ok(affected)
}

/// Scrive le modifiche nell'ordine in cui sono state registrate
async fn flush(conn: &mut MySqlConnection, changes: &[PendingChange]) -> Result<u64, sqlx::Error> {
    let mut affected = 0;
    for change in changes {
        let result = match change {
            PendingChange::Insert(product) => {
                sqlx::query("INSERT INTO products (id, name, price, description) VALUES (?, ?, ?, ?)")
                    .bind(product.id)
                    .bind(&product.name)
                    .bind(product.price)
                    .bind(&product.description)
                    .execute(&mut *conn)
                    .await?
            }
            PendingChange::Update(product) => {
                sqlx::query("UPDATE products SET name = ?, price = ?, description = ? WHERE id = ?")
                    .bind(&product.name)
                    .bind(product.price)
                    .bind(&product.description)
                    .bind(product.id)
                    .execute(&mut *conn)
                    .await?
            }
            PendingChange::Delete(id) => {
                sqlx::query("DELETE FROM products WHERE id = ?")
                    .bind(id)
                    .execute(&mut *conn)
                    .await?
            }
        };
        affected += result.rows_affected();
    }
    Ok(affected)
}
