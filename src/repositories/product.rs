//! ProductRepository - Repository per la gestione dei prodotti

use super::context::{DbContext, PendingChange};
use super::traits::ProductStore;
use crate::entities::Product;
use sqlx::Error;
use tracing::instrument;
use uuid::Uuid;

/// Product repository bound to the request's [`DbContext`]
pub struct ProductRepository<'a> {
    ctx: &'a DbContext,
}

impl<'a> ProductRepository<'a> {
    pub fn new(ctx: &'a DbContext) -> Self {
        Self { ctx }
    }
}

impl ProductStore for ProductRepository<'_> {
    #[instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<Product>, Error> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, description FROM products ORDER BY name",
        )
        .fetch_all(self.ctx.pool())
        .await?;

        Ok(products)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &Uuid) -> Result<Option<Product>, Error> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, description FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.ctx.pool())
        .await?;

        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_name(&self, name: &str) -> Result<Option<Product>, Error> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, description FROM products WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(self.ctx.pool())
        .await?;

        Ok(product)
    }

    async fn add(&self, product: Product) {
        self.ctx.stage(PendingChange::Insert(product)).await;
    }

    async fn update(&self, product: Product) {
        self.ctx.stage(PendingChange::Update(product)).await;
    }

    async fn delete(&self, id: &Uuid) {
        self.ctx.stage(PendingChange::Delete(*id)).await;
    }
}
