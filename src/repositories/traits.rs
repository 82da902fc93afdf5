//! Common repository traits
//!
//! This module defines the interfaces the handlers consume: the product
//! repository, the identity store and the unit of work.

use crate::entities::{Product, User};
use uuid::Uuid;

/// Data access over products.
///
/// Reads hit the store; mutations are staged and only become durable with
/// [`UnitOfWork::save_changes`].
pub trait ProductStore {
    /// Reads every product
    ///
    /// # Returns
    /// * `Ok(Vec<Product>)` - All products, ordered by name (can be empty)
    /// * `Err(sqlx::Error)` - Error during reading
    async fn get_all(&self) -> Result<Vec<Product>, sqlx::Error>;

    /// Reads a product by its id
    ///
    /// # Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - No product with that ID
    /// * `Err(sqlx::Error)` - Error during reading
    async fn get_by_id(&self, id: &Uuid) -> Result<Option<Product>, sqlx::Error>;

    /// Reads a product by exact name
    async fn get_by_name(&self, name: &str) -> Result<Option<Product>, sqlx::Error>;

    /// Stages the insert of a new product
    async fn add(&self, product: Product);

    /// Stages the update of an existing product (matched by id)
    async fn update(&self, product: Product);

    /// Stages the delete of the product with `id`
    async fn delete(&self, id: &Uuid);
}

/// Identity store: principals, their credential state and their roles
pub trait UserStore {
    /// Finds the user whose username OR email equals `identifier`
    async fn find_by_username_or_email(&self, identifier: &str)
    -> Result<Option<User>, sqlx::Error>;

    /// Role names assigned to the user (can be empty)
    async fn roles_of(&self, user_id: &Uuid) -> Result<Vec<String>, sqlx::Error>;

    /// Persists the credential state of an existing user
    ///
    /// # Returns
    /// * `Ok(())` - User updated
    /// * `Err(sqlx::Error)` - Error during update (`RowNotFound` if the user does not exist)
    async fn update(&self, user: &User) -> Result<(), sqlx::Error>;

    /// Inserts a new user together with its roles
    async fn create(&self, user: &User, roles: &[String]) -> Result<(), sqlx::Error>;
}

/// Batched persistence plus explicit transaction control
pub trait UnitOfWork {
    /// Flushes every staged change as one batch
    ///
    /// On failure the staged changes are kept, so the same context can save
    /// again. Inside an explicit transaction roll back before retrying.
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of affected rows
    /// * `Err(sqlx::Error)` - Store fault (e.g. unique constraint violation), not wrapped
    async fn save_changes(&self) -> Result<u64, sqlx::Error>;

    /// Starts a transaction, unless one is already active
    async fn begin_transaction(&self) -> Result<(), sqlx::Error>;

    /// Commits the active transaction. No-op when none is active.
    async fn commit(&self) -> Result<(), sqlx::Error>;

    /// Rolls back the active transaction. No-op when none is active.
    async fn rollback(&self) -> Result<(), sqlx::Error>;
}
