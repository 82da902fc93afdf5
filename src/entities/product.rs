//! Product entity - Entità prodotto

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
}

impl Product {
    /// Builds a new product with a freshly generated id
    pub fn new(name: String, price: Decimal, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            price,
            description,
        }
    }
}
