//! Set combinator.

use crate::outcome::{Outcome, collect_all, join_all};
use crate::schema::{Schema, SchemaKind, SchemaRef};
use crate::Value;

/// Validates every member of a set with one child schema.
#[derive(Debug, Clone)]
pub struct SetSchema {
    child: SchemaRef,
    accept_arrays: bool,
    message: String,
}

impl SetSchema {
    /// Also accept arrays, treating their elements as members.
    pub fn accept_arrays(mut self, accept: bool) -> Self {
        self.accept_arrays = accept;
        self
    }

    /// Replace the failure message for input that is not a set.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    fn members(&self, input: &Value) -> Option<Vec<Value>> {
        match input {
            Value::Set(members) => Some(members.borrow().iter().cloned().collect()),
            Value::Array(items) if self.accept_arrays => Some(items.borrow().clone()),
            _ => None,
        }
    }
}

impl Schema for SetSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Set
    }

    fn message(&self) -> Option<&str> {
        Some(&self.message)
    }

    fn validate(&self, input: Value) -> Outcome<'_> {
        let Some(members) = self.members(&input) else {
            return Outcome::issue(&self.message);
        };
        let outcomes = members
            .into_iter()
            .map(|member| self.child.validate(member))
            .collect();
        // Equal outputs collapse into one member.
        join_all(outcomes, |results| collect_all(results).map(Value::set))
    }
}

/// Sets whose members all satisfy `child`. The output is a new set.
pub fn set<S: Schema + 'static>(child: S) -> SetSchema {
    SetSchema {
        child: child.into_ref(),
        accept_arrays: false,
        message: "Not a valid set".to_string(),
    }
}
