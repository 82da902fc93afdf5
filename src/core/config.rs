use dotenv::dotenv;
use std::env;
use tracing::{info, warn};

const DEFAULT_JWT_SECRET: &str = "un segreto meno bello ma abbastanza lungo per HS512";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub server_host: String,
    pub server_port: u16,
    pub max_connections: u32,
    pub connection_lifetime_secs: u64,
    pub app_env: String,
    pub lockout_max_failed_attempts: i32,
    pub lockout_minutes: i64,
    pub require_confirmed_email: bool,
}

impl Config {
    /// Carica la configurazione dalle variabili d'ambiente
    /// Chiama dotenv() automaticamente
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set in .env file".to_string())?;

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using default (not secure for production!)");
            DEFAULT_JWT_SECRET.to_string()
        });

        let jwt_issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| "product-manager".to_string());

        let jwt_audience =
            env::var("JWT_AUDIENCE").unwrap_or_else(|_| "product-manager-clients".to_string());

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| "Invalid SERVER_PORT: must be a number between 0-65535".to_string())?;

        let max_connections = env::var("MAX_DB_CONNECTIONS")
            .unwrap_or_else(|_| "20".to_string())
            .parse::<u32>()
            .map_err(|_| "Invalid MAX_DB_CONNECTIONS: must be a positive number".to_string())?;

        let connection_lifetime_secs = env::var("DB_CONNECTION_LIFETIME_SECS")
            .unwrap_or_else(|_| "1800".to_string())
            .parse::<u64>()
            .map_err(|_| {
                "Invalid DB_CONNECTION_LIFETIME_SECS: must be a positive number".to_string()
            })?;

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let lockout_max_failed_attempts = env::var("LOCKOUT_MAX_FAILED_ATTEMPTS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<i32>()
            .ok()
            .filter(|attempts| *attempts > 0)
            .ok_or_else(|| {
                "Invalid LOCKOUT_MAX_FAILED_ATTEMPTS: must be a positive number".to_string()
            })?;

        let lockout_minutes = env::var("LOCKOUT_MINUTES")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<i64>()
            .ok()
            .filter(|minutes| *minutes > 0)
            .ok_or_else(|| "Invalid LOCKOUT_MINUTES: must be a positive number".to_string())?;

        let require_confirmed_email = env::var("REQUIRE_CONFIRMED_EMAIL")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .map_err(|_| "Invalid REQUIRE_CONFIRMED_EMAIL: must be true or false".to_string())?;

        Ok(Config {
            database_url,
            jwt_secret,
            jwt_issuer,
            jwt_audience,
            server_host,
            server_port,
            max_connections,
            connection_lifetime_secs,
            app_env,
            lockout_max_failed_attempts,
            lockout_minutes,
            require_confirmed_email,
        })
    }

    /// Stampa la configurazione (nascondendo i segreti)
    pub fn print_info(&self) {
        info!("Server Configuration:");
        info!("   Environment: {}", self.app_env);
        info!("   Server Address: {}:{}", self.server_host, self.server_port);
        info!("   Database: {}", Self::mask_url(&self.database_url));
        info!("   Max DB Connections: {}", self.max_connections);
        info!("   Connection Lifetime: {}s", self.connection_lifetime_secs);
        info!("   JWT Issuer / Audience: {} / {}", self.jwt_issuer, self.jwt_audience);
        info!(
            "   Lockout: {} failed attempts -> {} minutes",
            self.lockout_max_failed_attempts, self.lockout_minutes
        );
        if self.jwt_secret == DEFAULT_JWT_SECRET {
            warn!("   JWT Secret: USING DEFAULT (INSECURE!)");
        } else {
            info!("   JWT Secret: custom secret configured");
        }
    }

    /// Maschera l'URL del database per il logging
    fn mask_url(url: &str) -> String {
        if let Some(at_pos) = url.find('@') {
            if let Some(scheme_end) = url.find("://") {
                let scheme = &url[..scheme_end + 3];
                let after_at = &url[at_pos..];
                return format!("{}***{}", scheme, after_at);
            }
        }
        "***".to_string()
    }
}
