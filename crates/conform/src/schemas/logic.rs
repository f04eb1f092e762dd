//! Union and intersection.
//!
//! Both run their schemas one after another, in declaration order. Once a
//! schema suspends, the rest of the chain is awaited step by step; schemas
//! are never raced.

use tracing::trace;

use crate::issue::{IssueAccumulator, ValidationResult};
use crate::outcome::Outcome;
use crate::schema::{Schema, SchemaKind, SchemaRef};
use crate::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Policy {
    /// Stop at the first success; every schema sees the original input.
    FirstSuccess,
    /// Thread each success into the next schema; keep going past failures.
    Narrow,
}

struct Chain {
    policy: Policy,
    current: Value,
    issues: IssueAccumulator,
}

impl Chain {
    /// Fold one step into the chain. Returns the final result if the chain
    /// is decided.
    fn absorb(&mut self, result: ValidationResult) -> Option<ValidationResult> {
        match (result, self.policy) {
            (Ok(value), Policy::FirstSuccess) => Some(Ok(value)),
            (Ok(value), Policy::Narrow) => {
                self.current = value;
                None
            }
            (Err(issues), _) => {
                self.issues.record(issues);
                None
            }
        }
    }

    fn finish(self) -> ValidationResult {
        self.issues.finish(self.current)
    }
}

fn run_chain(schemas: &[SchemaRef], policy: Policy, input: Value) -> Outcome<'_> {
    let mut chain = Chain {
        policy,
        current: input,
        issues: IssueAccumulator::new(),
    };

    for (position, schema) in schemas.iter().enumerate() {
        match schema.validate(chain.current.clone()) {
            Outcome::Ready(result) => {
                if let Some(decided) = chain.absorb(result) {
                    return Outcome::Ready(decided);
                }
            }
            Outcome::Pending(suspended) => {
                trace!(
                    ?policy,
                    position,
                    schemas = schemas.len(),
                    "Chain step suspended, continuing asynchronously"
                );
                let rest = &schemas[position + 1..];
                return Outcome::pending(async move {
                    if let Some(decided) = chain.absorb(suspended.await) {
                        return decided;
                    }
                    for schema in rest {
                        let result = schema.validate(chain.current.clone()).resolve().await;
                        if let Some(decided) = chain.absorb(result) {
                            return decided;
                        }
                    }
                    chain.finish()
                });
            }
        }
    }

    Outcome::Ready(chain.finish())
}

/// Succeeds with the first schema that accepts the input.
#[derive(Debug, Clone)]
pub struct UnionSchema {
    schemas: Vec<SchemaRef>,
    message: String,
}

impl UnionSchema {
    /// Append another alternative.
    pub fn or<S: Schema + 'static>(mut self, schema: S) -> Self {
        self.schemas.push(schema.into_ref());
        self
    }

    /// Replace the message reported when there are no alternatives.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// The alternatives, in trial order.
    pub fn schemas(&self) -> &[SchemaRef] {
        &self.schemas
    }
}

impl Schema for UnionSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Union
    }

    fn message(&self) -> Option<&str> {
        Some(&self.message)
    }

    fn validate(&self, input: Value) -> Outcome<'_> {
        if self.schemas.is_empty() {
            return Outcome::issue(&self.message);
        }
        run_chain(&self.schemas, Policy::FirstSuccess, input)
    }
}

/// Try `schemas` in order against the original input; the first success
/// wins and later schemas are not run. If all fail, every issue is reported
/// in trial order.
///
/// ```rust
/// use conform::{parse, schemas::{number, string, union}, Schema};
///
/// let id = union([string().into_ref()]).or(number());
/// assert!(parse(&id, "abc").is_ok());
/// assert!(parse(&id, 7).is_ok());
/// assert_eq!(
///     parse(&id, true).unwrap_err().to_string(),
///     "Not a valid string, Not a valid number"
/// );
/// ```
pub fn union<I>(schemas: I) -> UnionSchema
where
    I: IntoIterator<Item = SchemaRef>,
{
    UnionSchema {
        schemas: schemas.into_iter().collect(),
        message: "No schema to match".to_string(),
    }
}

/// Threads a value through every schema in turn.
#[derive(Debug, Clone)]
pub struct IntersectionSchema {
    schemas: Vec<SchemaRef>,
}

impl IntersectionSchema {
    /// Append another stage.
    pub fn and<S: Schema + 'static>(mut self, schema: S) -> Self {
        self.schemas.push(schema.into_ref());
        self
    }

    /// The stages, in order.
    pub fn schemas(&self) -> &[SchemaRef] {
        &self.schemas
    }
}

impl Schema for IntersectionSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Intersection
    }

    fn validate(&self, input: Value) -> Outcome<'_> {
        run_chain(&self.schemas, Policy::Narrow, input)
    }
}

/// Run `schemas` in order, each on the output of the last successful one
/// (the original input to begin with). A failing schema does not stop the
/// chain: the next one sees the last good value. Fails with every recorded
/// issue if any schema failed; an empty intersection accepts anything.
pub fn intersection<I>(schemas: I) -> IntersectionSchema
where
    I: IntoIterator<Item = SchemaRef>,
{
    IntersectionSchema {
        schemas: schemas.into_iter().collect(),
    }
}
