//! User entity - Entità utente con stato delle credenziali

use bcrypt::verify;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Principal that can sign in. Authentication state lives in `credentials`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub credentials: CredentialState,
}

/// Password, lockout and refresh-token state of a [`User`]
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CredentialState {
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email_confirmed: bool,
    pub lockout_enabled: bool,
    pub lockout_end: Option<DateTime<Utc>>,
    pub access_failed_count: i32,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    pub refresh_token_expires: Option<DateTime<Utc>>,
}

impl User {
    /// Verify if target_password matches the stored hashed password
    pub fn verify_password(&self, target_password: &str) -> bool {
        verify(target_password, &self.credentials.password_hash).unwrap_or(false)
    }

    /// True while a lockout is enabled and its end lies in the future
    pub fn is_locked_out(&self, now: DateTime<Utc>) -> bool {
        self.credentials.lockout_enabled
            && self.credentials.lockout_end.is_some_and(|end| end > now)
    }
}

/// Flat row of the `users` table
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub email_confirmed: bool,
    pub lockout_enabled: bool,
    pub lockout_end: Option<DateTime<Utc>>,
    pub access_failed_count: i32,
    pub refresh_token: Option<String>,
    pub refresh_token_expires: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            credentials: CredentialState {
                password_hash: row.password_hash,
                email_confirmed: row.email_confirmed,
                lockout_enabled: row.lockout_enabled,
                lockout_end: row.lockout_end,
                access_failed_count: row.access_failed_count,
                refresh_token: row.refresh_token,
                refresh_token_expires: row.refresh_token_expires,
            },
        }
    }
}
