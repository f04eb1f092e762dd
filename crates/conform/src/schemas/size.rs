//! Bounds on a number or a length.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::issue::Issues;
use crate::outcome::Outcome;
use crate::schema::{Schema, SchemaKind, SchemaRef};
use crate::Value;

/// Comparison a size refinement applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SizeOp {
    /// Measured value must be at least the bound
    Min,
    /// Measured value must be at most the bound
    Max,
    /// Measured value must equal the bound
    Eq,
}

impl SizeOp {
    fn violated(self, measured: f64, bound: f64) -> bool {
        match self {
            Self::Min => measured < bound,
            Self::Max => measured > bound,
            Self::Eq => measured != bound,
        }
    }
}

/// Numbers measure as themselves; strings and arrays by their length.
fn measure(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::BigInt(n) => Some(*n as f64),
        other => other.length().map(|len| len as f64),
    }
}

/// Checks the child's output against a bound.
///
/// The child runs first. Its failure passes through unchanged; on success
/// the output is measured and a violated bound replaces it with a single
/// issue carrying this schema's message.
#[derive(Debug, Clone)]
pub struct SizeSchema {
    child: SchemaRef,
    op: SizeOp,
    bound: f64,
    message: String,
}

impl SizeSchema {
    fn new(child: SchemaRef, op: SizeOp, bound: f64) -> Self {
        Self {
            child,
            op,
            bound,
            message: "Wrong length".to_string(),
        }
    }

    /// Replace the failure message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// The comparison.
    pub fn op(&self) -> SizeOp {
        self.op
    }

    /// The bound.
    pub fn bound(&self) -> f64 {
        self.bound
    }
}

impl Schema for SizeSchema {
    fn kind(&self) -> SchemaKind {
        match self.op {
            SizeOp::Min => SchemaKind::Min,
            SizeOp::Max => SchemaKind::Max,
            SizeOp::Eq => SchemaKind::LengthEq,
        }
    }

    fn message(&self) -> Option<&str> {
        Some(&self.message)
    }

    fn validate(&self, input: Value) -> Outcome<'_> {
        self.child.validate(input).map(move |result| {
            let value = result?;
            match measure(&value) {
                Some(measured) if !self.op.violated(measured, self.bound) => Ok(value),
                measured => {
                    trace!(
                        op = ?self.op,
                        bound = self.bound,
                        ?measured,
                        "Size refinement violated"
                    );
                    Err(Issues::message(&self.message))
                }
            }
        })
    }
}

/// `child`'s output must measure at least `bound`.
pub fn min<S: Schema + 'static>(child: S, bound: f64) -> SizeSchema {
    SizeSchema::new(child.into_ref(), SizeOp::Min, bound)
}

/// `child`'s output must measure at most `bound`.
pub fn max<S: Schema + 'static>(child: S, bound: f64) -> SizeSchema {
    SizeSchema::new(child.into_ref(), SizeOp::Max, bound)
}

/// `child`'s output must measure exactly `length`.
pub fn length_eq<S: Schema + 'static>(child: S, length: f64) -> SizeSchema {
    SizeSchema::new(child.into_ref(), SizeOp::Eq, length)
}
