//! Features module - Un handler per ogni caso d'uso
//!
//! Le richieste passano sempre da [`crate::pipeline::Pipeline::send`].

pub mod auth;
pub mod products;
