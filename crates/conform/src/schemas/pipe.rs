//! Step-by-step schema composition.

use std::fmt;

use crate::outcome::Outcome;
use crate::schema::{Schema, SchemaKind, SchemaRef};
use crate::Value;

/// A schema assembled by applying builder steps to a root schema.
///
/// Each step receives the schema built so far and returns a new one.
/// Validation delegates to the final schema.
///
/// ```rust
/// use conform::{parse, schemas::{max, min, pipe, string}};
///
/// let username = pipe(string()).step_with(min, 3.0).step_with(max, 8.0);
/// assert!(parse(&username, "ada_l").is_ok());
/// assert!(parse(&username, "al").is_err());
/// assert!(parse(&username, "a_very_long_name").is_err());
/// ```
#[derive(Clone)]
pub struct Pipe {
    root: SchemaRef,
    composed: SchemaRef,
    steps: usize,
}

impl Pipe {
    /// Apply one step to the schema built so far.
    pub fn step<F, S>(mut self, build: F) -> Self
    where
        F: FnOnce(SchemaRef) -> S,
        S: Schema + 'static,
    {
        self.composed = build(self.composed).into_ref();
        self.steps += 1;
        self
    }

    /// Apply a step that takes one extra argument, e.g. `min` with its bound.
    pub fn step_with<F, A, S>(self, build: F, argument: A) -> Self
    where
        F: FnOnce(SchemaRef, A) -> S,
        S: Schema + 'static,
    {
        self.step(|schema| build(schema, argument))
    }

    /// The schema the pipe started from.
    pub fn root(&self) -> &SchemaRef {
        &self.root
    }

    /// Number of steps applied.
    pub fn len(&self) -> usize {
        self.steps
    }

    /// Whether no step has been applied.
    pub fn is_empty(&self) -> bool {
        self.steps == 0
    }
}

impl fmt::Debug for Pipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipe")
            .field("root", &self.root.kind())
            .field("composed", &self.composed.kind())
            .field("steps", &self.steps)
            .finish()
    }
}

impl Schema for Pipe {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Pipe
    }

    fn validate(&self, input: Value) -> Outcome<'_> {
        self.composed.validate(input)
    }
}

/// Start a pipe from `root`.
pub fn pipe<S: Schema + 'static>(root: S) -> Pipe {
    let root = root.into_ref();
    Pipe {
        composed: root.clone(),
        root,
        steps: 0,
    }
}
