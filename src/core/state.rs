//! Application State - Stato globale dell'applicazione
//!
//! Contiene il pool di connessioni, lo store delle identità e le opzioni
//! condivise. Il contesto di persistenza (unit of work) NON vive qui: viene
//! creato per ogni richiesta dai service handler.

use crate::core::auth::JwtOptions;
use crate::core::config::Config;
use crate::features::auth::LockoutPolicy;
use crate::repositories::UserRepository;
use chrono::Duration;
use sqlx::MySqlPool;

/// Stato globale dell'applicazione condiviso tra tutte le route e middleware
pub struct AppState {
    /// Pool di connessioni MySQL condiviso
    pub pool: MySqlPool,

    /// Repository per la gestione degli utenti (identity store)
    pub user: UserRepository,

    /// Opzioni dei token JWT
    pub jwt: JwtOptions,

    /// Politica di blocco dopo tentativi di login falliti
    pub lockout: LockoutPolicy,
}

impl AppState {
    pub fn new(pool: MySqlPool, jwt: JwtOptions, lockout: LockoutPolicy) -> Self {
        Self {
            user: UserRepository::new(pool.clone()),
            pool,
            jwt,
            lockout,
        }
    }

    /// Crea una nuova istanza di AppState a partire dalla configurazione caricata
    pub fn from_config(pool: MySqlPool, config: &Config) -> Self {
        let jwt = JwtOptions {
            issuer: config.jwt_issuer.clone(),
            audience: config.jwt_audience.clone(),
            secret_key: config.jwt_secret.clone(),
        };
        let lockout = LockoutPolicy {
            max_failed_attempts: config.lockout_max_failed_attempts,
            lockout_duration: Duration::minutes(config.lockout_minutes),
            require_confirmed_email: config.require_confirmed_email,
        };
        Self::new(pool, jwt, lockout)
    }
}
