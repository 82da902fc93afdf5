//! In-memory doubles of the repository traits for handler unit tests

use super::traits::{ProductStore, UnitOfWork, UserStore};
use crate::entities::{Product, User};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

/// Product store over a plain vector. Staged mutations are applied at once
/// and counted, so tests can assert which calls happened.
#[derive(Default)]
pub struct FakeProductStore {
    products: Mutex<Vec<Product>>,
    pub adds: AtomicUsize,
    pub updates: AtomicUsize,
    pub deletes: AtomicUsize,
}

impl FakeProductStore {
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
            ..Default::default()
        }
    }

    pub fn snapshot(&self) -> Vec<Product> {
        self.products.lock().unwrap().clone()
    }

    pub fn calls(&self) -> (usize, usize, usize) {
        (
            self.adds.load(Ordering::SeqCst),
            self.updates.load(Ordering::SeqCst),
            self.deletes.load(Ordering::SeqCst),
        )
    }
}

impl ProductStore for FakeProductStore {
    async fn get_all(&self) -> Result<Vec<Product>, sqlx::Error> {
        Ok(self.snapshot())
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<Product>, sqlx::Error> {
        Ok(self.snapshot().into_iter().find(|p| p.id == *id))
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Product>, sqlx::Error> {
        Ok(self.snapshot().into_iter().find(|p| p.name == name))
    }

    async fn add(&self, product: Product) {
        self.adds.fetch_add(1, Ordering::SeqCst);
        self.products.lock().unwrap().push(product);
    }

    async fn update(&self, product: Product) {
        self.updates.fetch_add(1, Ordering::SeqCst);
        let mut products = self.products.lock().unwrap();
        if let Some(existing) = products.iter_mut().find(|p| p.id == product.id) {
            *existing = product;
        }
    }

    async fn delete(&self, id: &Uuid) {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.products.lock().unwrap().retain(|p| p.id != *id);
    }
}

/// Unit of work that only counts calls; `failing` makes every save fault
#[derive(Default)]
pub struct FakeUnitOfWork {
    pub failing: Option<String>,
    pub saves: AtomicUsize,
}

impl FakeUnitOfWork {
    pub fn failing(message: &str) -> Self {
        Self {
            failing: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl UnitOfWork for FakeUnitOfWork {
    async fn save_changes(&self) -> Result<u64, sqlx::Error> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        match &self.failing {
            Some(message) => Err(sqlx::Error::Protocol(message.clone())),
            None => Ok(1),
        }
    }

    async fn begin_transaction(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }

    async fn commit(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }

    async fn rollback(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}

/// Identity store keyed by user id
#[derive(Default)]
pub struct FakeUserStore {
    users: Mutex<HashMap<Uuid, (User, Vec<String>)>>,
    pub updates: AtomicUsize,
}

impl FakeUserStore {
    pub fn with_user(user: User, roles: Vec<String>) -> Self {
        let store = Self::default();
        store.users.lock().unwrap().insert(user.id, (user, roles));
        store
    }

    pub fn stored(&self, id: &Uuid) -> Option<User> {
        self.users.lock().unwrap().get(id).map(|(user, _)| user.clone())
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

impl UserStore for FakeUserStore {
    async fn find_by_username_or_email(&self, identifier: &str) -> Result<Option<User>, sqlx::Error> {
        let users = self.users.lock().unwrap();
        Ok(users
            .values()
            .map(|(user, _)| user)
            .find(|u| u.username == identifier || u.email == identifier)
            .cloned())
    }

    async fn roles_of(&self, user_id: &Uuid) -> Result<Vec<String>, sqlx::Error> {
        let users = self.users.lock().unwrap();
        Ok(users.get(user_id).map(|(_, roles)| roles.clone()).unwrap_or_default())
    }

    async fn update(&self, user: &User) -> Result<(), sqlx::Error> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        let mut users = self.users.lock().unwrap();
        match users.get_mut(&user.id) {
            Some((stored, _)) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(sqlx::Error::RowNotFound),
        }
    }

    async fn create(&self, user: &User, roles: &[String]) -> Result<(), sqlx::Error> {
        self.users
            .lock()
            .unwrap()
            .insert(user.id, (user.clone(), roles.to_vec()));
        Ok(())
    }
}
