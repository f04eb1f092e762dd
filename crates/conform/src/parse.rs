//! Entry points: run a schema against a top-level input.
//!
//! Every entry point checks the schema's protocol version before calling
//! `validate`. The synchronous entries refuse a schema that suspends instead of
//! blocking on it; the `_async` entries await suspension.
//!
//! # Example
//!
//! ```rust
//! use conform::{parse, safe_parse, schemas::{min, string}};
//!
//! let name = min(string(), 3.0);
//! assert!(parse(&name, "Ada").is_ok());
//!
//! let result = safe_parse(&name, "Al").unwrap();
//! assert!(!result.is_success());
//! ```

use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use crate::error::{ParseError, ParseResult};
use crate::issue::{Issues, ValidationResult};
use crate::schema::{PROTOCOL_VERSION, Schema};
use crate::Value;

/// Non-throwing mirror of a validation result.
///
/// Serializes as `{"success": true, "value": ...}` or
/// `{"success": false, "issues": [...]}`.
#[derive(Debug, Clone, PartialEq)]
pub enum SafeParseResult {
    /// The input was valid
    Success {
        /// The validated output
        value: Value,
    },
    /// The input was invalid
    Failure {
        /// Every reason, in order
        issues: Issues,
    },
}

impl SafeParseResult {
    /// Whether the input was valid.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The validated output, if any.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Success { value } => Some(value),
            Self::Failure { .. } => None,
        }
    }

    /// The issues, if the input was invalid.
    pub fn issues(&self) -> Option<&Issues> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { issues } => Some(issues),
        }
    }

    /// Convert back into a plain result.
    pub fn into_result(self) -> ValidationResult {
        match self {
            Self::Success { value } => Ok(value),
            Self::Failure { issues } => Err(issues),
        }
    }
}

impl From<ValidationResult> for SafeParseResult {
    fn from(result: ValidationResult) -> Self {
        match result {
            Ok(value) => Self::Success { value },
            Err(issues) => Self::Failure { issues },
        }
    }
}

impl Serialize for SafeParseResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        match self {
            Self::Success { value } => {
                map.serialize_entry("success", &true)?;
                map.serialize_entry("value", value)?;
            }
            Self::Failure { issues } => {
                map.serialize_entry("success", &false)?;
                map.serialize_entry("issues", issues)?;
            }
        }
        map.end()
    }
}

fn check_version<S: Schema + ?Sized>(schema: &S) -> ParseResult<()> {
    let found = schema.version();
    if found != PROTOCOL_VERSION {
        warn!(
            kind = %schema.kind(),
            vendor = schema.vendor(),
            found,
            supported = PROTOCOL_VERSION,
            "Rejected schema with unsupported protocol version"
        );
        return Err(ParseError::UnsupportedVersion { found });
    }
    Ok(())
}

fn validate_now<S: Schema + ?Sized>(schema: &S, input: Value) -> ParseResult<ValidationResult> {
    check_version(schema)?;
    schema.validate(input).into_ready().map_err(|_suspended| {
        warn!(kind = %schema.kind(), "Synchronous parse met a suspended validation");
        ParseError::Async
    })
}

async fn validate_eventually<S: Schema + ?Sized>(
    schema: &S,
    input: Value,
) -> ParseResult<ValidationResult> {
    check_version(schema)?;
    Ok(schema.validate(input).resolve().await)
}

fn reject<S: Schema + ?Sized>(schema: &S, issues: Issues) -> ParseError {
    debug!(
        kind = %schema.kind(),
        issue_count = issues.len(),
        "Parse rejected input"
    );
    ParseError::Validation(issues)
}

fn inspect<S: Schema + ?Sized>(schema: &S, result: ValidationResult) -> SafeParseResult {
    if let Err(issues) = &result {
        debug!(
            kind = %schema.kind(),
            issue_count = issues.len(),
            "Safe parse rejected input"
        );
    }
    SafeParseResult::from(result)
}

fn convert<T: DeserializeOwned>(value: Value) -> ParseResult<T> {
    Ok(serde_json::from_value(value.to_json()?)?)
}

/// Validate synchronously and return the output.
///
/// Fails with [`ParseError::Validation`] on invalid input and with
/// [`ParseError::Async`] if the schema suspended.
pub fn parse<S: Schema + ?Sized>(schema: &S, input: impl Into<Value>) -> ParseResult<Value> {
    validate_now(schema, input.into())?.map_err(|issues| reject(schema, issues))
}

/// Validate, awaiting any suspension, and return the output.
pub async fn parse_async<S: Schema + ?Sized>(
    schema: &S,
    input: impl Into<Value>,
) -> ParseResult<Value> {
    validate_eventually(schema, input.into())
        .await?
        .map_err(|issues| reject(schema, issues))
}

/// Validate synchronously, reporting data issues in the envelope.
///
/// Only protocol misuse surfaces as `Err`.
pub fn safe_parse<S: Schema + ?Sized>(
    schema: &S,
    input: impl Into<Value>,
) -> ParseResult<SafeParseResult> {
    let result = validate_now(schema, input.into())?;
    Ok(inspect(schema, result))
}

/// Validate, awaiting any suspension, reporting data issues in the envelope.
pub async fn safe_parse_async<S: Schema + ?Sized>(
    schema: &S,
    input: impl Into<Value>,
) -> ParseResult<SafeParseResult> {
    let result = validate_eventually(schema, input.into()).await?;
    Ok(inspect(schema, result))
}

/// [`parse`], then deserialize the output into `T`.
pub fn parse_into<T, S>(schema: &S, input: impl Into<Value>) -> ParseResult<T>
where
    T: DeserializeOwned,
    S: Schema + ?Sized,
{
    convert(parse(schema, input)?)
}

/// [`parse_async`], then deserialize the output into `T`.
pub async fn parse_into_async<T, S>(schema: &S, input: impl Into<Value>) -> ParseResult<T>
where
    T: DeserializeOwned,
    S: Schema + ?Sized,
{
    convert(parse_async(schema, input).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Outcome;
    use crate::schema::SchemaKind;
    use crate::schemas::{custom_async, string};
    use futures::executor::block_on;
    use serde_json::json;

    struct FutureVersion;

    impl Schema for FutureVersion {
        fn kind(&self) -> SchemaKind {
            SchemaKind::Custom
        }

        fn version(&self) -> u32 {
            2
        }

        fn validate(&self, input: Value) -> Outcome<'_> {
            Outcome::ok(input)
        }
    }

    #[test]
    fn test_parse_returns_value() {
        assert_eq!(parse(&string(), "hi").unwrap(), Value::from("hi"));
    }

    #[test]
    fn test_sync_entries_refuse_suspension() {
        let schema = custom_async(|input| async move { Ok(input) });
        assert!(matches!(parse(&schema, 1), Err(ParseError::Async)));
        assert!(matches!(safe_parse(&schema, 1), Err(ParseError::Async)));
    }

    #[test]
    fn test_async_entries_await_suspension() {
        let schema = custom_async(|input| async move { Ok(input) });
        assert_eq!(block_on(parse_async(&schema, 1)).unwrap(), Value::from(1));
        let result = block_on(safe_parse_async(&schema, 1)).unwrap();
        assert!(result.is_success());
    }

    #[test]
    fn test_unsupported_version_rejected_everywhere() {
        assert!(matches!(
            parse(&FutureVersion, 1),
            Err(ParseError::UnsupportedVersion { found: 2 })
        ));
        assert!(safe_parse(&FutureVersion, 1).is_err());
        assert!(block_on(parse_async(&FutureVersion, 1)).is_err());
    }

    #[test]
    fn test_safe_parse_envelope_serialization() {
        let ok = safe_parse(&string(), "a").unwrap();
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({"success": true, "value": "a"}));

        let failed = safe_parse(&string(), 1).unwrap();
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({"success": false, "issues": [{"message": "Not a valid string"}]})
        );
    }

    #[test]
    fn test_parse_into_conversion_error() {
        let err = parse_into::<u32, _>(&string(), "not a number").unwrap_err();
        assert!(matches!(err, ParseError::Conversion(_)));
    }
}
