//! Error types for the relay core.

use http::StatusCode;
use thiserror::Error;

/// The inbound request cannot be turned into an upstream request.
///
/// Always answered locally; the upstream is never contacted.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("path '{0}' is not under the relay mount")]
    OutsideMount(String),

    #[error("body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("form body is not valid UTF-8: {0}")]
    InvalidFormEncoding(#[from] std::str::Utf8Error),

    #[error("target '{url}' is not a valid address: {source}")]
    InvalidTarget {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl TranslationError {
    /// Status code reported to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            TranslationError::OutsideMount(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// A transport-level failure of the single upstream call.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    pub code: Option<&'static str>,
}

impl TransportError {
    pub fn new(message: impl Into<String>, code: Option<&'static str>) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }
}
