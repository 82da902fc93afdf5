//! Core Module - Componenti infrastrutturali dell'applicazione
//!
//! Questo modulo contiene tutti i componenti "core" dell'applicazione:
//! - Autenticazione e JWT
//! - Configurazione
//! - Gestione errori e risposta uniforme (`ApiResult`)
//! - Stato applicazione

pub mod auth;
pub mod config;
pub mod error;
pub mod result;
pub mod state;

// Re-exports per facilitare l'import
pub use auth::{
    ADMIN_ROLE, Claims, JwtOptions, JwtProvider, TokenIssuer, authentication_middleware,
    decode_jwt, require_role,
};
pub use config::Config;
pub use error::AppError;
pub use result::{ApiResult, FailureKind};
pub use state::AppState;
