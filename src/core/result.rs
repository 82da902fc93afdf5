//! Result envelope - Risposta uniforme restituita da ogni handler
//!
//! Gli esiti di business attesi (non trovato, duplicato, validazione lato client)
//! non sono errori Rust: viaggiano dentro `ApiResult` con uno status code.

use serde::{Deserialize, Serialize};

/// Classification of an expected business failure
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    Duplicate,
    Client,
    Internal,
}

impl FailureKind {
    pub fn status_code(self) -> u16 {
        match self {
            FailureKind::NotFound => 404,
            FailureKind::Duplicate | FailureKind::Client => 400,
            FailureKind::Internal => 500,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApiResult<T> {
    pub status_code: u16,
    pub is_successful: bool,
    pub data: Option<T>,
    pub error_messages: Vec<String>,
    #[serde(skip)]
    pub failure: Option<FailureKind>,
}

impl<T> ApiResult<T> {
    pub fn succeed(data: T) -> Self {
        Self {
            status_code: 200,
            is_successful: true,
            data: Some(data),
            error_messages: Vec::new(),
            failure: None,
        }
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::failures(kind, vec![message.into()])
    }

    pub fn failures(kind: FailureKind, messages: Vec<String>) -> Self {
        Self {
            status_code: kind.status_code(),
            is_successful: false,
            data: None,
            error_messages: messages,
            failure: Some(kind),
        }
    }

    pub fn is_failure_of(&self, kind: FailureKind) -> bool {
        self.failure == Some(kind)
    }
}
