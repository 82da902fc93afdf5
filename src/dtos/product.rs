//! Product DTOs - Data Transfer Objects per prodotti

use crate::entities::Product;
use crate::pipeline::{LogRecord, Loggable};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// External representation of a product, returned by the queries
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProductDTO {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub description: String,
}

impl From<Product> for ProductDTO {
    fn from(value: Product) -> Self {
        Self {
            id: value.id,
            name: value.name,
            price: value.price,
            description: value.description.unwrap_or_default(),
        }
    }
}

impl Loggable for ProductDTO {
    fn log_repr(&self) -> String {
        LogRecord::new("ProductDTO")
            .field("id", self.id)
            .field("name", &self.name)
            .field("price", self.price)
            .field("description", &self.description)
            .finish()
    }
}

/// Body di `PUT /api/products/{id}` (l'id arriva dal path)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpdateProductDTO {
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: Option<String>,
}
