//! Services module - Coordinatore per tutti i service handler HTTP
//!
//! Questo modulo organizza i service handlers in sotto-moduli separati per una migliore manutenibilità.
//! Ogni handler crea lo scope della richiesta (DbContext + repository) e
//! manda il comando nella pipeline.

pub mod auth;
pub mod products;

// Re-exports per facilitare l'import
pub use auth::login;
pub use products::{create_product, delete_product, get_all_products, get_product_by_id, update_product};

use crate::AppState;
use crate::core::ApiResult;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}

fn status_of<T>(result: &ApiResult<T>) -> StatusCode {
    StatusCode::from_u16(result.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Successo: `success` + data. Fallimento: status del risultato + lista dei messaggi.
pub(crate) fn data_or_errors<T: Serialize>(result: ApiResult<T>, success: StatusCode) -> Response {
    if result.is_successful {
        (success, Json(result.data)).into_response()
    } else {
        (status_of(&result), Json(result.error_messages)).into_response()
    }
}

/// Come [`data_or_errors`] ma senza body in caso di successo
pub(crate) fn status_or_errors<T>(result: ApiResult<T>) -> Response {
    if result.is_successful {
        StatusCode::OK.into_response()
    } else {
        (status_of(&result), Json(result.error_messages)).into_response()
    }
}

/// L'envelope completo, con lo status del risultato
pub(crate) fn envelope<T: Serialize>(result: ApiResult<T>) -> Response {
    (status_of(&result), Json(result)).into_response()
}
