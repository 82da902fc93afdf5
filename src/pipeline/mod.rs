//! Request pipeline - Catena di comportamenti attorno ad ogni operazione
//!
//! Ogni comando/query implementa [`Request`] e viene eseguito da un [`Handler`]
//! dedicato. [`Pipeline::send`] applica, in ordine:
//! - validazione (tutti i validator registrati per il tipo di richiesta)
//! - logging prima e dopo l'handler, con i campi sensibili mascherati
//! - l'handler vero e proprio

pub mod logging;
pub mod validation;

pub use logging::{LogRecord, Loggable, MASK};
pub use validation::{DeriveValidator, ValidationFailure, Validator};

use crate::core::{ApiResult, AppError};

/// A command or query travelling through the pipeline
pub trait Request: Loggable + Send + Sync + Sized {
    /// Payload carried by a successful [`ApiResult`]
    type Data: Loggable + Send;

    /// Name used in log lines
    const NAME: &'static str;

    /// Validators registered for this request type. Defaults to none.
    fn validators() -> Vec<Box<dyn Validator<Self>>> {
        Vec::new()
    }
}

/// Business logic for one request type.
///
/// Expected failures are returned as `Ok(ApiResult::failure(..))`; `Err` is an
/// unhandled fault that only the HTTP boundary turns into a response.
pub trait Handler<R: Request> {
    async fn handle(&self, request: R) -> Result<ApiResult<R::Data>, AppError>;
}

pub struct Pipeline<R: Request> {
    validators: Vec<Box<dyn Validator<R>>>,
}

impl<R: Request> Pipeline<R> {
    /// Pipeline with the validators registered by `R`
    pub fn new() -> Self {
        Self {
            validators: R::validators(),
        }
    }

    pub fn with_validator(mut self, validator: impl Validator<R> + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn validator_count(&self) -> usize {
        self.validators.len()
    }

    pub async fn send<H: Handler<R>>(
        &self,
        handler: &H,
        request: R,
    ) -> Result<ApiResult<R::Data>, AppError> {
        validation::run(&self.validators, &request)?;
        logging::log_around(request, |request| handler.handle(request)).await
    }
}

impl<R: Request> Default for Pipeline<R> {
    fn default() -> Self {
        Self::new()
    }
}
