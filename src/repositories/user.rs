//! UserRepository - Identity store (utenti, credenziali e ruoli)

use super::traits::UserStore;
use crate::entities::{User, UserRow};
use sqlx::{Error, MySqlPool};
use tracing::{debug, instrument};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, email, password_hash, email_confirmed, lockout_enabled, \
     lockout_end, access_failed_count, refresh_token, refresh_token_expires";

pub struct UserRepository {
    connection_pool: MySqlPool,
}

impl UserRepository {
    pub fn new(connection_pool: MySqlPool) -> UserRepository {
        Self { connection_pool }
    }
}

impl UserStore for UserRepository {
    #[instrument(skip(self))]
    async fn find_by_username_or_email(&self, identifier: &str) -> Result<Option<User>, Error> {
        let query = format!(
            "SELECT {} FROM users WHERE username = ? OR email = ? LIMIT 1",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(identifier)
            .bind(identifier)
            .fetch_optional(&self.connection_pool)
            .await?;

        Ok(row.map(User::from))
    }

    #[instrument(skip(self))]
    async fn roles_of(&self, user_id: &Uuid) -> Result<Vec<String>, Error> {
        let roles = sqlx::query_scalar::<_, String>(
            "SELECT role FROM user_roles WHERE user_id = ? ORDER BY role",
        )
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await?;

        debug!("Found {} roles", roles.len());
        Ok(roles)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: &User) -> Result<(), Error> {
        let credentials = &user.credentials;
        let result = sqlx::query(
            "UPDATE users SET username = ?, email = ?, password_hash = ?, email_confirmed = ?, \
             lockout_enabled = ?, lockout_end = ?, access_failed_count = ?, refresh_token = ?, \
             refresh_token_expires = ? WHERE id = ?",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&credentials.password_hash)
        .bind(credentials.email_confirmed)
        .bind(credentials.lockout_enabled)
        .bind(credentials.lockout_end)
        .bind(credentials.access_failed_count)
        .bind(&credentials.refresh_token)
        .bind(credentials.refresh_token_expires)
        .bind(user.id)
        .execute(&self.connection_pool)
        .await?;

        // MySQL conta solo le righe effettivamente cambiate, quindi controlla l'esistenza
        if result.rows_affected() == 0 {
            let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id = ?")
                .bind(user.id)
                .fetch_one(&self.connection_pool)
                .await?;
            if exists == 0 {
                return Err(Error::RowNotFound);
            }
        }
        Ok(())
    }

    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn create(&self, user: &User, roles: &[String]) -> Result<(), Error> {
        let credentials = &user.credentials;
        let mut tx = self.connection_pool.begin().await?;

        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, email_confirmed, lockout_enabled, \
             lockout_end, access_failed_count, refresh_token, refresh_token_expires) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&credentials.password_hash)
        .bind(credentials.email_confirmed)
        .bind(credentials.lockout_enabled)
        .bind(credentials.lockout_end)
        .bind(credentials.access_failed_count)
        .bind(&credentials.refresh_token)
        .bind(credentials.refresh_token_expires)
        .execute(&mut *tx)
        .await?;

        for role in roles {
            sqlx::query("INSERT INTO user_roles (user_id, role) VALUES (?, ?)")
                .bind(user.id)
                .bind(role)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
