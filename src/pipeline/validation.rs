//! Validation stage - Esegue tutti i validator registrati prima dell'handler

use crate::core::AppError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use validator::{Validate, ValidationErrors};

/// One failed rule on one field
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    pub field: String,
    pub rule: String,
    pub message: String,
}

impl ValidationFailure {
    pub fn new(field: impl Into<String>, rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
            message: message.into(),
        }
    }
}

/// A rule set checked against requests of type `R`
pub trait Validator<R>: Send + Sync {
    fn validate(&self, request: &R) -> Vec<ValidationFailure>;
}

/// Runs the `#[derive(Validate)]` rules of a request
pub struct DeriveValidator;

impl<R: Validate> Validator<R> for DeriveValidator {
    fn validate(&self, request: &R) -> Vec<ValidationFailure> {
        match Validate::validate(request) {
            Ok(()) => Vec::new(),
            Err(errors) => failures_from(&errors),
        }
    }
}

/// Flattens `validator` errors into failures, ordered by field name
pub fn failures_from(errors: &ValidationErrors) -> Vec<ValidationFailure> {
    let mut failures: Vec<ValidationFailure> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            let field = field.to_string();
            field_errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                ValidationFailure::new(field.clone(), error.code.to_string(), message)
            })
        })
        .collect();
    failures.sort_by(|a, b| a.field.cmp(&b.field));
    failures
}

/// Runs every validator and fails with all collected failures
pub fn run<R>(validators: &[Box<dyn Validator<R>>], request: &R) -> Result<(), AppError> {
    if validators.is_empty() {
        return Ok(());
    }

    let failures: Vec<ValidationFailure> = validators
        .iter()
        .flat_map(|validator| validator.validate(request))
        .collect();

    if failures.is_empty() {
        debug!("Request passed {} validator(s)", validators.len());
        return Ok(());
    }

    warn!("Request rejected with {} validation failure(s)", failures.len());
    Err(AppError::validation(failures))
}
