//! Transaction slot - Ciclo di vita della transazione esplicita di una unit of work
//!
//! Stati: nessuna transazione -> `begin` -> attiva -> (`commit` | `rollback`) -> nessuna transazione.
//! Il driver concreto (MySQL) è separato dalla macchina a stati, così la
//! macchina a stati si testa senza database.

use sqlx::pool::PoolConnection;
use sqlx::{Executor, MySql, MySqlConnection, MySqlPool};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, instrument, warn};

/// Store-side operations behind a [`TransactionSlot`]
pub trait TransactionDriver: Send + Sync {
    type Handle: Send;

    async fn begin(&self) -> Result<Self::Handle, sqlx::Error>;

    async fn commit(&self, handle: &mut Self::Handle) -> Result<(), sqlx::Error>;

    async fn rollback(&self, handle: &mut Self::Handle) -> Result<(), sqlx::Error>;

    /// Gives the handle back once the transaction is over, whatever the outcome
    fn release(&self, handle: Self::Handle);
}

/// At most one active transaction. The handle is taken out of the slot before
/// commit/rollback run, so the slot is cleared on every path.
pub struct TransactionSlot<D: TransactionDriver> {
    driver: D,
    active: Mutex<Option<D::Handle>>,
}

impl<D: TransactionDriver> TransactionSlot<D> {
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            active: Mutex::new(None),
        }
    }

    pub async fn is_active(&self) -> bool {
        self.active.lock().await.is_some()
    }

    /// Locks the slot. While the guard lives no begin/commit/rollback can run.
    pub async fn lock(&self) -> MutexGuard<'_, Option<D::Handle>> {
        self.active.lock().await
    }

    pub async fn begin(&self) -> Result<(), sqlx::Error> {
        let mut active = self.active.lock().await;
        if active.is_some() {
            debug!("Transaction already active, begin skipped");
            return Ok(());
        }
        *active = Some(self.driver.begin().await?);
        debug!("Transaction started");
        Ok(())
    }

    pub async fn commit(&self) -> Result<(), sqlx::Error> {
        let mut active = self.active.lock().await;
        let Some(mut handle) = active.take() else {
            debug!("No active transaction, commit skipped");
            return Ok(());
        };

        let outcome = match self.driver.commit(&mut handle).await {
            Ok(()) => {
                debug!("Transaction committed");
                Ok(())
            }
            Err(err) => {
                error!("Commit failed, rolling back: {}", err);
                if let Err(rollback_err) = self.driver.rollback(&mut handle).await {
                    error!("Rollback after failed commit also failed: {}", rollback_err);
                }
                Err(err)
            }
        };
        self.driver.release(handle);
        outcome
    }

    pub async fn rollback(&self) -> Result<(), sqlx::Error> {
        let mut active = self.active.lock().await;
        let Some(mut handle) = active.take() else {
            debug!("No active transaction, rollback skipped");
            return Ok(());
        };

        let outcome = self.driver.rollback(&mut handle).await;
        match &outcome {
            Ok(()) => debug!("Transaction rolled back"),
            Err(err) => error!("Rollback failed: {}", err),
        }
        self.driver.release(handle);
        outcome
    }
}

/// Connection checked out of the pool with an open transaction on it.
///
/// If it goes away while still open (failed rollback, dropped future) the
/// connection is closed instead of going back to the pool.
pub struct MySqlTransaction {
    conn: PoolConnection<MySql>,
    open: bool,
}

impl MySqlTransaction {
    pub fn connection(&mut self) -> &mut MySqlConnection {
        &mut self.conn
    }
}

impl Drop for MySqlTransaction {
    fn drop(&mut self) {
        if self.open {
            warn!("Transaction connection released while still open, closing it");
            self.conn.close_on_drop();
        }
    }
}

pub struct MySqlDriver {
    pool: MySqlPool,
}

impl MySqlDriver {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

impl TransactionDriver for MySqlDriver {
    type Handle = MySqlTransaction;

    #[instrument(skip(self))]
    async fn begin(&self) -> Result<MySqlTransaction, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        conn.execute("START TRANSACTION").await?;
        info!("Database transaction started");
        Ok(MySqlTransaction { conn, open: true })
    }

    async fn commit(&self, handle: &mut MySqlTransaction) -> Result<(), sqlx::Error> {
        handle.connection().execute("COMMIT").await?;
        handle.open = false;
        Ok(())
    }

    async fn rollback(&self, handle: &mut MySqlTransaction) -> Result<(), sqlx::Error> {
        handle.connection().execute("ROLLBACK").await?;
        handle.open = false;
        Ok(())
    }

    fn release(&self, handle: MySqlTransaction) {
        drop(handle);
    }
}
