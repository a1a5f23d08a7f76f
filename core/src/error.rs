#![deny(missing_docs)]

//! # Error Handling
//!
//! Provides the unified `AppError` enum returned by every resolution path.

use crate::transport::TransportError;
use derive_more::Display;

/// The Global Error Enum.
///
/// `InvalidQuery` is always raised before any network access.
/// `NotFound` covers both a remote 404 and a local filter with no match.
#[derive(Debug, Display)]
pub enum AppError {
    /// The query violated the schema of the requested operation.
    #[display("Invalid query: {_0}")]
    InvalidQuery(String),

    /// The requested resource does not exist.
    #[display("Not found: {_0}")]
    NotFound(String),

    /// Any other transport failure, propagated unmodified.
    #[display("Transport Error: {_0}")]
    Transport(TransportError),

    /// Invalid settings.
    #[display("Configuration Error: {_0}")]
    Config(String),
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

/// The remote "not found" signal becomes `NotFound` with its message intact.
impl From<TransportError> for AppError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::NotFound(msg) => AppError::NotFound(msg),
            other => AppError::Transport(other),
        }
    }
}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Shorthand for building an `InvalidQuery` error.
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        AppError::InvalidQuery(msg.into())
    }

    /// Returns true for `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// Returns true for `InvalidQuery`.
    pub fn is_invalid_query(&self) -> bool {
        matches!(self, AppError::InvalidQuery(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_not_found_keeps_message() {
        let err: AppError = TransportError::NotFound("champion 999 missing".into()).into();
        match err {
            AppError::NotFound(msg) => assert_eq!(msg, "champion 999 missing"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_other_transport_errors_are_wrapped() {
        let err: AppError = TransportError::Io("connection reset".into()).into();
        assert!(matches!(err, AppError::Transport(TransportError::Io(_))));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_display() {
        let err = AppError::invalid("missing 'platform'");
        assert_eq!(format!("{}", err), "Invalid query: missing 'platform'");
        assert!(err.is_invalid_query());
        assert!(!err.is_not_found());
    }
}
