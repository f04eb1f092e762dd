//! Error types for the parse entry points.
//!
//! Two families of failure leave an entry point, and callers usually want to
//! tell them apart:
//!
//! - **Data issues**: the input did not match the schema
//!   ([`ParseError::Validation`]).
//! - **Protocol misuse**: the schema was used incorrectly, e.g. a schema that
//!   suspended was handed to a synchronous entry point
//!   ([`ParseError::Async`]).
//!
//! # Example
//! ```rust
//! use conform::{parse, schemas::string, ErrorCode};
//!
//! let err = parse(&string(), 42).unwrap_err();
//! assert_eq!(err.code(), ErrorCode::ValidationFailed);
//! assert_eq!(err.to_string(), "Not a valid string");
//! assert!(!err.code().is_protocol_misuse());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::issue::Issues;
use crate::schema::PROTOCOL_VERSION;

/// Type-safe error codes for parse failures.
///
/// Serialized as SCREAMING_SNAKE_CASE strings (e.g. `AsyncValidation`
/// becomes `"ASYNC_VALIDATION"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The input failed validation
    ValidationFailed,
    /// A synchronous entry point met a suspended validation
    AsyncValidation,
    /// The schema speaks an unsupported protocol version
    UnsupportedVersion,
    /// The validated value could not be converted to the requested type
    ConversionFailed,
}

impl ErrorCode {
    /// Returns the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::AsyncValidation => "ASYNC_VALIDATION",
            Self::UnsupportedVersion => "UNSUPPORTED_VERSION",
            Self::ConversionFailed => "CONVERSION_FAILED",
        }
    }

    /// Returns true if the API was used incorrectly, as opposed to the input
    /// being invalid. Retrying with other input will not help.
    pub fn is_protocol_misuse(&self) -> bool {
        matches!(self, Self::AsyncValidation | Self::UnsupportedVersion)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error raised by the parse entry points.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The input failed validation; the message joins every issue.
    #[error("{0}")]
    Validation(Issues),
    /// The schema suspended but the caller only supports synchronous validation.
    #[error("Schema validation is async")]
    Async,
    /// The schema reports a protocol version this crate does not speak.
    #[error("Unsupported schema version {found} (supported: {PROTOCOL_VERSION})")]
    UnsupportedVersion {
        /// Version reported by the schema
        found: u32,
    },
    /// The validated value did not fit the requested output type.
    #[error("Failed to convert validated value: {0}")]
    Conversion(#[from] serde_json::Error),
}

impl ParseError {
    /// The error's code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::Async => ErrorCode::AsyncValidation,
            Self::UnsupportedVersion { .. } => ErrorCode::UnsupportedVersion,
            Self::Conversion(_) => ErrorCode::ConversionFailed,
        }
    }

    /// The validation issues, if the input was invalid.
    pub fn issues(&self) -> Option<&Issues> {
        match self {
            Self::Validation(issues) => Some(issues),
            _ => None,
        }
    }

    /// Consume the error, keeping the validation issues if there are any.
    pub fn into_issues(self) -> Option<Issues> {
        match self {
            Self::Validation(issues) => Some(issues),
            _ => None,
        }
    }
}

impl From<Issues> for ParseError {
    fn from(issues: Issues) -> Self {
        Self::Validation(issues)
    }
}

/// Result type alias for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::Issue;

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::AsyncValidation).unwrap();
        assert_eq!(json, "\"ASYNC_VALIDATION\"");
        let code: ErrorCode = serde_json::from_str("\"UNSUPPORTED_VERSION\"").unwrap();
        assert_eq!(code, ErrorCode::UnsupportedVersion);
    }

    #[test]
    fn test_protocol_misuse_classification() {
        assert!(ErrorCode::AsyncValidation.is_protocol_misuse());
        assert!(ErrorCode::UnsupportedVersion.is_protocol_misuse());
        assert!(!ErrorCode::ValidationFailed.is_protocol_misuse());
        assert!(!ErrorCode::ConversionFailed.is_protocol_misuse());
    }

    #[test]
    fn test_validation_message_joins_issues() {
        let mut issues = Issues::message("Not a valid string");
        issues.push(Issue::new("Wrong length"));
        let err = ParseError::from(issues);
        assert_eq!(err.to_string(), "Not a valid string, Wrong length");
        assert_eq!(err.issues().map(Issues::len), Some(2));
    }

    #[test]
    fn test_misuse_messages() {
        assert_eq!(ParseError::Async.to_string(), "Schema validation is async");
        let err = ParseError::UnsupportedVersion { found: 2 };
        assert_eq!(err.code(), ErrorCode::UnsupportedVersion);
        assert!(err.to_string().contains('2'));
        assert!(err.issues().is_none());
    }
}
