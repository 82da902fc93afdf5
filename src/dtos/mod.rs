//! DTOs module - Data Transfer Objects
//!
//! Questo modulo contiene tutti i DTOs usati per la comunicazione client-server.
//! I DTOs separano la rappresentazione esterna (API) dalla rappresentazione interna (entities).

pub mod auth;
pub mod product;

pub use auth::LoginResponse;
pub use product::{ProductDTO, UpdateProductDTO};
