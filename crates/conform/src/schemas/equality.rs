//! Equality leaves.
//!
//! Comparison uses [`Value`] equality: structural, with SameValueZero numbers.

use crate::outcome::Outcome;
use crate::schema::{Schema, SchemaKind};
use crate::Value;

/// Accepts only values equal to the configured one.
#[derive(Debug, Clone)]
pub struct EqSchema {
    value: Value,
    message: String,
}

impl EqSchema {
    /// Replace the failure message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// The expected value.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Schema for EqSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Eq
    }

    fn message(&self) -> Option<&str> {
        Some(&self.message)
    }

    // Success yields a detached copy of the configured value, not the input.
    fn validate(&self, input: Value) -> Outcome<'_> {
        if input == self.value {
            Outcome::ok(self.value.deep_clone())
        } else {
            Outcome::issue(&self.message)
        }
    }
}

/// Accepts `value` only.
///
/// The schema keeps its own copy of `value`; later changes to containers the
/// caller still holds do not affect it.
pub fn eq(value: impl Into<Value>) -> EqSchema {
    EqSchema {
        value: Into::<Value>::into(value).deep_clone(),
        message: "Not equal to value".to_string(),
    }
}

/// Rejects values equal to the configured one.
#[derive(Debug, Clone)]
pub struct NotEqSchema {
    value: Value,
    message: String,
}

impl NotEqSchema {
    /// Replace the failure message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl Schema for NotEqSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::NotEq
    }

    fn message(&self) -> Option<&str> {
        Some(&self.message)
    }

    fn validate(&self, input: Value) -> Outcome<'_> {
        if input == self.value {
            Outcome::issue(&self.message)
        } else {
            Outcome::ok(input)
        }
    }
}

/// Accepts anything except `value`.
pub fn not_eq(value: impl Into<Value>) -> NotEqSchema {
    NotEqSchema {
        value: Into::<Value>::into(value).deep_clone(),
        message: "Equal to value".to_string(),
    }
}

/// Accepts one of a fixed list of values.
#[derive(Debug, Clone)]
pub struct EnumSchema {
    values: Vec<Value>,
    message: String,
}

impl EnumSchema {
    /// Replace the failure message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// The allowed values, in declaration order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl Schema for EnumSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Enum
    }

    fn message(&self) -> Option<&str> {
        Some(&self.message)
    }

    fn validate(&self, input: Value) -> Outcome<'_> {
        if self.values.contains(&input) {
            Outcome::ok(input)
        } else {
            Outcome::issue(&self.message)
        }
    }
}

/// Accepts any of `values`.
pub fn enum_values<I, T>(values: I) -> EnumSchema
where
    I: IntoIterator<Item = T>,
    T: Into<Value>,
{
    EnumSchema {
        values: values
            .into_iter()
            .map(|value| Into::<Value>::into(value).deep_clone())
            .collect(),
        message: "Not a valid enum value".to_string(),
    }
}
