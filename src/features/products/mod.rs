//! Product features - Comandi e query sui prodotti
//!
//! Ogni file contiene la richiesta (con i suoi validator e i campi loggabili)
//! e l'handler corrispondente.

pub mod create;
pub mod delete;
pub mod queries;
pub mod update;
pub mod validation;

pub use create::{CreateProductCommand, CreateProductHandler};
pub use delete::{DeleteProductCommand, DeleteProductHandler};
pub use queries::{GetAllProductQuery, GetProductByIdQuery, ProductQueryHandler};
pub use update::{UpdateProductCommand, UpdateProductHandler};
