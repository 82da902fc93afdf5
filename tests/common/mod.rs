#![allow(dead_code)]

use axum_test::TestServer;
use product_manager::auth::{ADMIN_ROLE, JwtOptions};
use product_manager::core::AppState;
use product_manager::entities::{CredentialState, User};
use product_manager::features::auth::LockoutPolicy;
use product_manager::repositories::{UserRepository, UserStore};
use serde_json::{Value, json};
use sqlx::MySqlPool;
use std::sync::Arc;
use uuid::Uuid;

pub const KEYBOARD_ID: &str = "11111111-1111-4111-8111-111111111111";
pub const MOUSE_ID: &str = "22222222-2222-4222-8222-222222222222";

pub const ADMIN_PASSWORD: &str = "Admin123!";
pub const USER_PASSWORD: &str = "User123!";

/// Crea un AppState per i test
///
/// # Arguments
/// * `pool` - Connection pool MySQL
///
/// # Returns
/// Arc<AppState> configurato con le opzioni JWT di test e la lockout policy di default
pub fn create_test_state(pool: MySqlPool) -> Arc<AppState> {
    let jwt = JwtOptions {
        issuer: "product-manager-tests".to_string(),
        audience: "product-manager-tests-clients".to_string(),
        secret_key: "ilmiobellissimosegretochevaassolutamentecambiato".to_string(),
    };
    Arc::new(AppState::new(pool, jwt, LockoutPolicy::default()))
}

/// Crea un TestServer per i test
///
/// # Arguments
/// * `state` - AppState da utilizzare per il server
///
/// # Returns
/// TestServer configurato e pronto per eseguire richieste
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = product_manager::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Inserisce un utente con password hashata (costo bcrypt minimo) e ruoli
pub async fn seed_user(pool: &MySqlPool, username: &str, password: &str, roles: &[&str]) -> User {
    let user = User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: format!("{}@example.com", username),
        credentials: CredentialState {
            password_hash: bcrypt::hash(password, 4).expect("Failed to hash password"),
            email_confirmed: true,
            lockout_enabled: true,
            ..Default::default()
        },
    };
    let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
    UserRepository::new(pool.clone())
        .create(&user, &roles)
        .await
        .expect("Failed to seed user");
    user
}

/// Utente "admin" con ruolo Admin e utente "bob" senza ruoli
pub async fn seed_users(pool: &MySqlPool) -> (User, User) {
    let admin = seed_user(pool, "admin", ADMIN_PASSWORD, &[ADMIN_ROLE]).await;
    let bob = seed_user(pool, "bob", USER_PASSWORD, &[]).await;
    (admin, bob)
}

/// Fa login via API e ritorna il bearer token
pub async fn login_token(server: &TestServer, identifier: &str, password: &str) -> String {
    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email_or_username": identifier, "password": password }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["data"]["token"]
        .as_str()
        .expect("token missing from login response")
        .to_string()
}
