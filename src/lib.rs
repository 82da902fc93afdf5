//! Server library - espone i moduli principali per i test

pub mod core;
pub mod dtos;
pub mod entities;
pub mod features;
pub mod pipeline;
pub mod repositories;
pub mod services;

// Re-export dei tipi principali per facilitare l'import
pub use crate::core::{AppError, AppState, auth, config};
pub use services::root;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Crea il router principale dell'applicazione
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/api/auth", configure_auth_routes())
        .nest("/api/products", configure_product_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Configura le routes di autenticazione (login)
fn configure_auth_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new().route("/login", post(login))
}

/// Configura le routes dei prodotti: lettura e creazione pubbliche,
/// modifica e cancellazione solo con token (ruolo verificato nel service)
fn configure_product_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    let protected = put(update_product)
        .delete(delete_product)
        .route_layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ));

    Router::new()
        .route("/", get(get_all_products).post(create_product))
        .route("/{id}", get(get_product_by_id).merge(protected))
}
