//! Error types for the HRMS client core.
//!
//! # Design
//! `Transport`, `Http` and `Deserialization` are the three per-attempt
//! failures the pipeline retries. When the budget runs out they are wrapped in
//! `RetriesExhausted`, which keeps the last underlying error so the caller can
//! still show the server's own message. A 401 never becomes an `ApiError`;
//! the pipeline returns its body as an ordinary result.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned by the pipeline, the calendar helpers and the client
/// builders.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (connect, DNS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status other than 401.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The response body was not valid JSON or did not fit the expected shape.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// Every attempt in the retry budget failed.
    #[error("request failed after {attempts} attempt(s): {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<ApiError>,
    },

    /// A date string was not a valid `YYYY-MM-DD` calendar date.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Comp-off can only be earned on a weekend or a holiday.
    #[error("{0} is a working day; comp-off is only earned on weekends or holidays")]
    NotCompoffEligible(NaiveDate),

    /// Configuration could not be loaded or was malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// The text a UI should show for this error. For an exhausted call this
    /// is the last attempt's message, e.g. the server's `message` field.
    pub fn message(&self) -> String {
        match self {
            ApiError::RetriesExhausted { last, .. } => last.message(),
            ApiError::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status carried by this error, looking through `RetriesExhausted`.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::RetriesExhausted { last, .. } => last.status(),
            _ => None,
        }
    }

    /// Whether the pipeline may try the request again after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::Transport(_) | ApiError::Http { .. } | ApiError::DeserializationError(_)
        )
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(e: config::ConfigError) -> Self {
        ApiError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_message_is_last_server_message() {
        let err = ApiError::RetriesExhausted {
            attempts: 3,
            last: Box::new(ApiError::Http {
                status: 400,
                message: "Invalid action".to_string(),
            }),
        };
        assert_eq!(err.message(), "Invalid action");
        assert_eq!(err.status(), Some(400));
        assert_eq!(
            err.to_string(),
            "request failed after 3 attempt(s): Invalid action"
        );
    }

    #[test]
    fn http_display_is_bare_message() {
        let err = ApiError::Http {
            status: 500,
            message: "HTTP error, status 500".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error, status 500");
    }

    #[test]
    fn only_attempt_failures_are_retryable() {
        assert!(ApiError::Transport("refused".into()).is_retryable());
        assert!(ApiError::DeserializationError("eof".into()).is_retryable());
        assert!(!ApiError::SerializationError("x".into()).is_retryable());
        assert!(!ApiError::InvalidDate("2025-02-30".into()).is_retryable());
    }
}
