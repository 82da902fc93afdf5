use crate::pipeline::ValidationFailure;
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use tracing::{error, warn};

const GENERIC_DETAIL: &str = "An unexpected error occurred.";

#[derive(Serialize)]
struct ErrorResponse<'a> {
    title: &'static str,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [ValidationFailure]>,
}

/// Fault that crossed a handler boundary. Rendered by the global responder.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: &'static str,
    details: Option<String>,
    errors: Vec<ValidationFailure>,
}

impl AppError {
    pub fn new(status: StatusCode, message: &'static str) -> Self {
        Self {
            status,
            message,
            details: None,
            errors: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn errors(&self) -> &[ValidationFailure] {
        &self.errors
    }

    pub fn is_validation(&self) -> bool {
        !self.errors.is_empty()
    }

    // Common error constructors
    pub fn validation(failures: Vec<ValidationFailure>) -> Self {
        let details = failures
            .iter()
            .map(|f| format!("{}: {}", f.field, f.message))
            .collect::<Vec<_>>()
            .join("; ");
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Validation error",
            details: Some(format!("Validation failed: {}", details)),
            errors: failures,
        }
    }

    pub fn unauthorized(message: &'static str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: &'static str) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn internal_server_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            .with_details(GENERIC_DETAIL)
    }

    pub fn service_unavailable(message: &'static str) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        error!("Unhandled database error: {}", err);
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                Self::service_unavailable("Database unavailable")
            }
            _ => Self::internal_server_error(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        error!("Unhandled token error: {}", err);
        Self::internal_server_error()
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        error!("Unhandled password hashing error: {}", err);
        Self::internal_server_error()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::validation(crate::pipeline::validation::failures_from(&err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if self.is_validation() {
            warn!("Validation error occurred: {}", self.details.as_deref().unwrap_or_default());
        }
        let body = Json(ErrorResponse {
            title: self.message,
            status: self.status.as_u16(),
            detail: self.details.as_deref(),
            errors: (!self.errors.is_empty()).then_some(self.errors.as_slice()),
        });
        (self.status, body).into_response()
    }
}
