//! Auth DTOs - Credenziali restituite dopo un login riuscito

use crate::pipeline::{LogRecord, Loggable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LoginResponse {
    pub token: String,
    pub refresh_token: String,
    pub refresh_token_expires: DateTime<Utc>,
}

impl Loggable for LoginResponse {
    fn log_repr(&self) -> String {
        LogRecord::new("LoginResponse")
            .masked("token")
            .masked("refresh_token")
            .field("refresh_token_expires", self.refresh_token_expires)
            .finish()
    }
}
