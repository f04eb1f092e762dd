//! Object combinators.
//!
//! An object schema declares a schema per property. Every property present in
//! the input is validated by its schema; declared properties missing from the
//! input are validated with [`Value::Undefined`], so a property schema decides
//! whether absence is acceptable. A property whose schema outputs
//! `Undefined` is treated as absent in the output.

use serde::{Deserialize, Serialize};

use crate::issue::{IssueAccumulator, ValidationResult};
use crate::outcome::{Outcome, join_all};
use crate::schema::{Schema, SchemaKind, SchemaRef};
use crate::value::{Object, OrderedMap, Shared};
use crate::Value;

/// Where a keyed combinator writes its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WriteMode {
    /// Build a new container; the input is never touched
    Clone,
    /// Write results back into the input container and return it
    Mutate,
}

/// One entry of the output, in input order.
enum Slot {
    Checked(String),
    Passthrough(String, Value),
}

/// Validates an object property by property.
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    mode: WriteMode,
    properties: OrderedMap<String, SchemaRef>,
    ignore_extra_keys: bool,
    message: String,
}

impl ObjectSchema {
    fn new(mode: WriteMode) -> Self {
        Self {
            mode,
            properties: OrderedMap::new(),
            ignore_extra_keys: false,
            message: "Not a valid object".to_string(),
        }
    }

    /// Declare a property. Declaring the same name again replaces its schema.
    pub fn field<S: Schema + 'static>(mut self, name: impl Into<String>, schema: S) -> Self {
        self.properties.insert(name.into(), schema.into_ref());
        self
    }

    /// Drop undeclared keys instead of passing them through.
    pub fn ignore_extra_keys(mut self, ignore: bool) -> Self {
        self.ignore_extra_keys = ignore;
        self
    }

    /// Replace the failure message for non-object input.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Clone or mutate.
    pub fn mode(&self) -> WriteMode {
        self.mode
    }

    /// Declared property names, in declaration order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }
}

impl Schema for ObjectSchema {
    fn kind(&self) -> SchemaKind {
        match self.mode {
            WriteMode::Clone => SchemaKind::ClonedObject,
            WriteMode::Mutate => SchemaKind::MutatesObject,
        }
    }

    fn message(&self) -> Option<&str> {
        Some(&self.message)
    }

    fn validate(&self, input: Value) -> Outcome<'_> {
        let Value::Object(target) = input else {
            return Outcome::issue(&self.message);
        };
        let entries: Vec<(String, Value)> = target
            .borrow()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let mut declared_seen = vec![false; self.properties.len()];
        let mut slots = Vec::with_capacity(entries.len() + self.properties.len());
        let mut outcomes = Vec::with_capacity(slots.capacity());
        let mut extra_keys = Vec::new();

        for (key, value) in entries {
            match self.properties.get_full(key.as_str()) {
                Some((index, _, schema)) => {
                    declared_seen[index] = true;
                    outcomes.push(schema.validate(value));
                    slots.push(Slot::Checked(key));
                }
                None if self.ignore_extra_keys => extra_keys.push(key),
                None => slots.push(Slot::Passthrough(key, value)),
            }
        }

        for ((name, schema), seen) in self.properties.iter().zip(declared_seen) {
            if !seen {
                outcomes.push(schema.validate(Value::Undefined));
                slots.push(Slot::Checked(name.clone()));
            }
        }

        if self.mode == WriteMode::Mutate && !extra_keys.is_empty() {
            let mut object = target.borrow_mut();
            for key in &extra_keys {
                object.remove(key.as_str());
            }
        }

        let mode = self.mode;
        join_all(outcomes, move |results| match mode {
            WriteMode::Clone => assemble(slots, results),
            WriteMode::Mutate => write_back(&target, slots, results),
        })
    }
}

fn assemble(slots: Vec<Slot>, results: Vec<ValidationResult>) -> ValidationResult {
    let mut issues = IssueAccumulator::new();
    let mut output = Object::with_capacity(slots.len());
    let mut results = results.into_iter();
    for slot in slots {
        match slot {
            Slot::Passthrough(key, value) => {
                output.insert(key, value);
            }
            Slot::Checked(key) => {
                let Some(value) = results.next().and_then(|result| issues.take(result)) else {
                    continue;
                };
                if !value.is_undefined() {
                    output.insert(key, value);
                }
            }
        }
    }
    issues.finish(Value::from(output))
}

// Successful properties are written even when others fail.
fn write_back(
    target: &Shared<Object>,
    slots: Vec<Slot>,
    results: Vec<ValidationResult>,
) -> ValidationResult {
    let mut issues = IssueAccumulator::new();
    let mut results = results.into_iter();
    {
        let mut object = target.borrow_mut();
        for slot in slots {
            let Slot::Checked(key) = slot else {
                continue;
            };
            let Some(value) = results.next().and_then(|result| issues.take(result)) else {
                continue;
            };
            if value.is_undefined() {
                object.remove(key.as_str());
            } else {
                object.insert(key, value);
            }
        }
    }
    issues.finish(Value::Object(target.clone()))
}

/// Object schema that builds a new object.
///
/// Undeclared keys pass through unless [`ObjectSchema::ignore_extra_keys`]
/// is set.
pub fn cloned_object() -> ObjectSchema {
    ObjectSchema::new(WriteMode::Clone)
}

/// Object schema that writes validated properties back into the input and
/// returns the same object.
///
/// With [`ObjectSchema::ignore_extra_keys`], undeclared keys are removed
/// from the input.
pub fn mutates_object() -> ObjectSchema {
    ObjectSchema::new(WriteMode::Mutate)
}
