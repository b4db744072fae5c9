use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable classification of an upstream failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    RateLimited,
    NotFound,
    UpstreamServerError,
    TransportError,
    Unknown,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::NotFound => "not_found",
            Self::UpstreamServerError => "upstream_server_error",
            Self::TransportError => "transport_error",
            Self::Unknown => "unknown",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure returned by the dispatcher. The message is safe to show to an end user.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ClassifiedError {
    kind: ErrorKind,
    message: String,
}

impl ClassifiedError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn rate_limited() -> Self {
        Self::new(
            ErrorKind::RateLimited,
            "Rate limit exceeded. Consider using an API key for more requests.",
        )
    }

    pub fn not_found() -> Self {
        Self::new(
            ErrorKind::NotFound,
            "Not found. The requested resource doesn't exist.",
        )
    }

    pub fn upstream_server_error() -> Self {
        Self::new(
            ErrorKind::UpstreamServerError,
            "OpenDota API server error. Please try again later.",
        )
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TransportError, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, message)
    }

    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether a caller could reasonably try again later. The core never retries on its own.
    pub const fn retryable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::RateLimited | ErrorKind::UpstreamServerError | ErrorKind::TransportError
        )
    }
}

/// Invalid configuration read at startup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("base url cannot be empty")]
    EmptyBaseUrl,
    #[error("{name} must be a positive integer: '{value}'")]
    InvalidNumber { name: &'static str, value: String },
    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },
}

/// Caller mistakes rejected before any request is dispatched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("search query cannot be empty")]
    EmptySearch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_shows_only_the_message() {
        let error = ClassifiedError::not_found();

        assert_eq!(
            error.to_string(),
            "Not found. The requested resource doesn't exist."
        );
    }

    #[test]
    fn retryable_follows_kind() {
        assert!(ClassifiedError::rate_limited().retryable());
        assert!(ClassifiedError::upstream_server_error().retryable());
        assert!(ClassifiedError::transport("timed out").retryable());
        assert!(!ClassifiedError::not_found().retryable());
        assert!(!ClassifiedError::unknown("boom").retryable());
    }

    #[test]
    fn serializes_kind_as_snake_case() {
        let value = serde_json::to_value(ClassifiedError::upstream_server_error())
            .expect("error serializes");

        assert_eq!(value["kind"], "upstream_server_error");
        assert_eq!(
            value["message"],
            "OpenDota API server error. Please try again later."
        );
    }
}
