//! Logging stage - Logga richiesta e risposta attorno all'handler
//!
//! I campi loggabili sono dichiarati staticamente da ogni tipo tramite
//! [`Loggable`]; i campi sensibili vengono dichiarati con [`LogRecord::masked`].

use super::Request;
use crate::core::{ApiResult, AppError};
use std::fmt::Display;
use std::future::Future;
use tracing::info;

pub const MASK: &str = "***MASKED***";

/// Static declaration of what a value shows in the logs
pub trait Loggable {
    fn log_repr(&self) -> String;
}

/// Builder for `Name { field = value, secret = ***MASKED*** }`
pub struct LogRecord {
    name: &'static str,
    fields: Vec<(&'static str, String)>,
}

impl LogRecord {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: &'static str, value: impl Display) -> Self {
        self.fields.push((name, value.to_string()));
        self
    }

    pub fn optional<T: Display>(mut self, name: &'static str, value: Option<T>) -> Self {
        let value = value.map_or_else(|| "null".to_string(), |v| v.to_string());
        self.fields.push((name, value));
        self
    }

    pub fn masked(mut self, name: &'static str) -> Self {
        self.fields.push((name, MASK.to_string()));
        self
    }

    pub fn finish(self) -> String {
        if self.fields.is_empty() {
            return format!("{} {{}}", self.name);
        }
        let fields = self
            .fields
            .iter()
            .map(|(name, value)| format!("{} = {}", name, value))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} {{ {} }}", self.name, fields)
    }
}

impl Loggable for String {
    fn log_repr(&self) -> String {
        self.clone()
    }
}

impl<T: Loggable> Loggable for Vec<T> {
    fn log_repr(&self) -> String {
        let items = self.iter().map(Loggable::log_repr).collect::<Vec<_>>();
        format!("[{}]", items.join(", "))
    }
}

impl<T: Loggable> Loggable for ApiResult<T> {
    fn log_repr(&self) -> String {
        LogRecord::new("ApiResult")
            .field("status_code", self.status_code)
            .field("is_successful", self.is_successful)
            .optional("data", self.data.as_ref().map(Loggable::log_repr))
            .field("error_messages", format!("{:?}", self.error_messages))
            .finish()
    }
}

/// Logs the request, runs `next` and logs the response. A fault from `next`
/// is returned as is and the second line is not written.
pub async fn log_around<R, F, Fut>(request: R, next: F) -> Result<ApiResult<R::Data>, AppError>
where
    R: Request,
    F: FnOnce(R) -> Fut,
    Fut: Future<Output = Result<ApiResult<R::Data>, AppError>>,
{
    info!("Handling {} with data: {}", R::NAME, request.log_repr());

    let response = next(request).await?;

    info!(
        "Handled {} successfully with response: {}",
        R::NAME,
        response.log_repr()
    );
    Ok(response)
}
