//! Primitive type checks.

use serde::{Deserialize, Serialize};

use crate::outcome::Outcome;
use crate::schema::{Schema, SchemaKind};
use crate::Value;

/// Which non-finite numbers a number schema lets through.
///
/// Both default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberOptions {
    /// Accept `NaN`
    pub allow_nan: bool,
    /// Accept positive and negative infinity
    pub allow_infinity: bool,
}

impl NumberOptions {
    /// Finite numbers only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether `NaN` is accepted.
    pub fn with_allow_nan(mut self, allow: bool) -> Self {
        self.allow_nan = allow;
        self
    }

    /// Set whether infinities are accepted.
    pub fn with_allow_infinity(mut self, allow: bool) -> Self {
        self.allow_infinity = allow;
        self
    }

    fn accepts(&self, n: f64) -> bool {
        if n.is_nan() {
            return self.allow_nan;
        }
        n.is_finite() || self.allow_infinity
    }
}

/// Accepts one primitive variant and passes it through unchanged.
#[derive(Debug, Clone)]
pub struct PrimitiveSchema {
    kind: SchemaKind,
    message: String,
    options: NumberOptions,
}

impl PrimitiveSchema {
    fn new(kind: SchemaKind, message: &str) -> Self {
        Self {
            kind,
            message: message.to_string(),
            options: NumberOptions::default(),
        }
    }

    /// Replace the failure message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Number options; only meaningful for [`number`].
    pub fn options(&self) -> NumberOptions {
        self.options
    }

    fn accepts(&self, input: &Value) -> bool {
        match (self.kind, input) {
            (SchemaKind::String, Value::String(_))
            | (SchemaKind::Boolean, Value::Bool(_))
            | (SchemaKind::BigInt, Value::BigInt(_)) => true,
            (SchemaKind::Number, Value::Number(n)) => self.options.accepts(*n),
            _ => false,
        }
    }
}

impl Schema for PrimitiveSchema {
    fn kind(&self) -> SchemaKind {
        self.kind
    }

    fn message(&self) -> Option<&str> {
        Some(&self.message)
    }

    fn validate(&self, input: Value) -> Outcome<'_> {
        if self.accepts(&input) {
            Outcome::ok(input)
        } else {
            Outcome::issue(&self.message)
        }
    }
}

/// Accepts strings.
pub fn string() -> PrimitiveSchema {
    PrimitiveSchema::new(SchemaKind::String, "Not a valid string")
}

/// Accepts booleans.
pub fn boolean() -> PrimitiveSchema {
    PrimitiveSchema::new(SchemaKind::Boolean, "Not a valid boolean")
}

/// Accepts big integers.
pub fn bigint() -> PrimitiveSchema {
    PrimitiveSchema::new(SchemaKind::BigInt, "Not a valid bigint")
}

/// Accepts finite numbers.
pub fn number() -> PrimitiveSchema {
    number_with(NumberOptions::default())
}

/// Accepts numbers, letting `options` decide about `NaN` and infinities.
pub fn number_with(options: NumberOptions) -> PrimitiveSchema {
    PrimitiveSchema {
        options,
        ..PrimitiveSchema::new(SchemaKind::Number, "Not a valid number")
    }
}
