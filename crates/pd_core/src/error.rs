use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of an [`AppError`].
///
/// Callers branch on the kind (for example to tell "nothing matched" apart from
/// "that incident does not exist"); the `code` stays free-form for diagnostics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Config,
    Lookup,
    NotFound,
    Transport,
    Decode,
    InvalidRequest,
    Cancelled,
}

/// Single structured error shape used across adapter layers and reported over the plugin protocol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    /// HTTP status of the failed provider call, when there was one.
    pub status: Option<u16>,
    pub retryable: bool,
}

impl AppError {
    pub fn new(kind: ErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            details: None,
            status: None,
            retryable: false,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, "CONFIG_INVALID", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, "NOT_FOUND", message)
    }

    /// Non-2xx provider response. The body is kept verbatim.
    pub fn transport_status(status: u16, body: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::Transport,
            "PAGERDUTY_API_ERROR",
            format!("pagerduty api error: {status}"),
        )
        .with_status(status)
        .with_details(body)
    }

    /// Failure before any HTTP status was received (connect, TLS, timeout).
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, "PAGERDUTY_UNREACHABLE", message).with_retryable(true)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, "DECODE_FAILED", message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, "INVALID_REQUEST", message)
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cancelled, "REQUEST_CANCELLED", message)
    }

    /// Wraps a failed name lookup, naming what was being resolved.
    pub fn lookup(entity: &str, name: &str, cause: AppError) -> Self {
        Self {
            kind: ErrorKind::Lookup,
            code: "LOOKUP_FAILED".to_string(),
            message: format!("lookup {entity} by name {name:?}"),
            details: Some(cause.to_string()),
            status: cause.status,
            retryable: cause.retryable,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, ": {details}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}
