//! Sequence combinators.

use crate::outcome::{Outcome, collect_all, join_all};
use crate::schema::{Schema, SchemaKind, SchemaRef};
use crate::Value;

/// Validates every element of an array with one child schema.
#[derive(Debug, Clone)]
pub struct ArraySchema {
    child: SchemaRef,
    message: String,
}

impl ArraySchema {
    /// Replace the failure message for non-array input.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// The element schema.
    pub fn child(&self) -> &SchemaRef {
        &self.child
    }
}

impl Schema for ArraySchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Array
    }

    fn message(&self) -> Option<&str> {
        Some(&self.message)
    }

    fn validate(&self, input: Value) -> Outcome<'_> {
        let Value::Array(items) = input else {
            return Outcome::issue(&self.message);
        };
        let items = items.borrow().clone();
        let outcomes = items
            .into_iter()
            .map(|item| self.child.validate(item))
            .collect();
        join_all(outcomes, |results| collect_all(results).map(Value::array))
    }
}

/// Arrays whose elements all satisfy `child`. The output is a new array.
pub fn array<S: Schema + 'static>(child: S) -> ArraySchema {
    ArraySchema {
        child: child.into_ref(),
        message: "Not a valid array".to_string(),
    }
}

/// Validates a fixed-length array position by position.
#[derive(Debug, Clone)]
pub struct TupleSchema {
    children: Vec<SchemaRef>,
    message: String,
}

impl TupleSchema {
    /// Replace the failure message for non-array input or wrong arity.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Number of positions.
    pub fn arity(&self) -> usize {
        self.children.len()
    }
}

impl Schema for TupleSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Tuple
    }

    fn message(&self) -> Option<&str> {
        Some(&self.message)
    }

    fn validate(&self, input: Value) -> Outcome<'_> {
        let Value::Array(items) = input else {
            return Outcome::issue(&self.message);
        };
        let items = items.borrow().clone();
        if items.len() != self.children.len() {
            return Outcome::issue(&self.message);
        }
        let outcomes = self
            .children
            .iter()
            .zip(items)
            .map(|(child, item)| child.validate(item))
            .collect();
        join_all(outcomes, |results| collect_all(results).map(Value::array))
    }
}

/// Arrays of exactly `children.len()` elements, element `i` checked by
/// `children[i]`.
///
/// ```rust
/// use conform::{parse, schemas::{number, string, tuple}, Schema, Value};
///
/// let pair = tuple([string().into_ref(), number().into_ref()]);
/// assert!(parse(&pair, Value::array([Value::from("a"), Value::from(1)])).is_ok());
/// assert!(parse(&pair, Value::array(["a"])).is_err());
/// ```
pub fn tuple<I>(children: I) -> TupleSchema
where
    I: IntoIterator<Item = SchemaRef>,
{
    TupleSchema {
        children: children.into_iter().collect(),
        message: "Not a valid tuple".to_string(),
    }
}
