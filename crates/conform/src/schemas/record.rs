//! Record and map combinators.
//!
//! Both apply one key schema and one value schema to every entry. A key
//! schema may rewrite keys: the entry is stored under the validated key, and
//! in place the original entry is removed when the key changed. When two
//! entries end up under the same key, the later one in iteration order wins.

use crate::issue::{IssueAccumulator, Issues, ValidationResult};
use crate::outcome::{Outcome, join_all};
use crate::schema::{Schema, SchemaKind, SchemaRef};
use crate::value::{Object, ValueMap, shared};
use crate::Value;

use super::object::WriteMode;

/// Validate every entry, producing outcomes laid out as
/// `[key0, value0, key1, value1, ...]`.
fn validate_entries<'a>(
    key_schema: &'a SchemaRef,
    value_schema: &'a SchemaRef,
    entries: Vec<(Value, Value)>,
) -> (Vec<Value>, Vec<Outcome<'a>>) {
    let mut originals = Vec::with_capacity(entries.len());
    let mut outcomes = Vec::with_capacity(entries.len() * 2);
    for (key, value) in entries {
        outcomes.push(key_schema.validate(key.clone()));
        outcomes.push(value_schema.validate(value));
        originals.push(key);
    }
    (originals, outcomes)
}

/// Walk the entry results in order, handing each fully valid entry to
/// `apply`. Key issues are recorded before value issues.
fn settle<F>(originals: Vec<Value>, results: Vec<ValidationResult>, mut apply: F) -> IssueAccumulator
where
    F: FnMut(Value, Value, Value) -> Result<(), Issues>,
{
    let mut issues = IssueAccumulator::new();
    let mut results = results.into_iter();
    for original in originals {
        let (Some(key), Some(value)) = (results.next(), results.next()) else {
            break;
        };
        let key = issues.take(key);
        let value = issues.take(value);
        if let (Some(key), Some(value)) = (key, value) {
            if let Err(rejected) = apply(original, key, value) {
                issues.record(rejected);
            }
        }
    }
    issues
}

// =============================================================================
// Record
// =============================================================================

/// Validates every key and value of an object.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    mode: WriteMode,
    key: SchemaRef,
    value: SchemaRef,
    message: String,
}

impl RecordSchema {
    /// Replace the failure message for non-object input and non-string keys.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Clone or mutate.
    pub fn mode(&self) -> WriteMode {
        self.mode
    }
}

impl Schema for RecordSchema {
    fn kind(&self) -> SchemaKind {
        match self.mode {
            WriteMode::Clone => SchemaKind::ClonedRecord,
            WriteMode::Mutate => SchemaKind::MutatedRecord,
        }
    }

    fn message(&self) -> Option<&str> {
        Some(&self.message)
    }

    fn validate(&self, input: Value) -> Outcome<'_> {
        let Value::Object(target) = input else {
            return Outcome::issue(&self.message);
        };
        let entries: Vec<(Value, Value)> = target
            .borrow()
            .iter()
            .map(|(key, value)| (Value::String(key.clone()), value.clone()))
            .collect();
        let (originals, outcomes) = validate_entries(&self.key, &self.value, entries);
        let mode = self.mode;
        let message = self.message.as_str();

        join_all(outcomes, move |results| {
            let in_place = mode == WriteMode::Mutate;
            let output = if in_place {
                target
            } else {
                shared(Object::new())
            };
            let issues = {
                let mut object = output.borrow_mut();
                settle(originals, results, |original, key, value| {
                    let Value::String(key) = key else {
                        return Err(Issues::message(message));
                    };
                    match original.as_str() {
                        Some(original) if in_place && original != key => {
                            object.remove(original);
                        }
                        _ => {}
                    }
                    object.insert(key, value);
                    Ok(())
                })
            };
            issues.finish(Value::Object(output))
        })
    }
}

fn record(mode: WriteMode, key: SchemaRef, value: SchemaRef) -> RecordSchema {
    RecordSchema {
        mode,
        key,
        value,
        message: "Invalid record".to_string(),
    }
}

/// Record schema that builds a new object from the validated entries.
///
/// Keys are presented to `key` as strings, and `key` must output a string.
pub fn cloned_record<K, V>(key: K, value: V) -> RecordSchema
where
    K: Schema + 'static,
    V: Schema + 'static,
{
    record(WriteMode::Clone, key.into_ref(), value.into_ref())
}

/// Record schema that writes validated entries back into the input.
///
/// Valid entries are written even when other entries fail.
pub fn mutated_record<K, V>(key: K, value: V) -> RecordSchema
where
    K: Schema + 'static,
    V: Schema + 'static,
{
    record(WriteMode::Mutate, key.into_ref(), value.into_ref())
}

// =============================================================================
// Map
// =============================================================================

/// Validates every key and value of a map.
#[derive(Debug, Clone)]
pub struct MapSchema {
    mode: WriteMode,
    key: SchemaRef,
    value: SchemaRef,
    convert_object_to_map: bool,
    message: String,
}

impl MapSchema {
    /// Also accept plain objects, treating their entries as string-keyed map
    /// entries. The output is always a map.
    pub fn convert_object_to_map(mut self, convert: bool) -> Self {
        self.convert_object_to_map = convert;
        self
    }

    /// Replace the failure message for input that is not a map.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Clone or mutate.
    pub fn mode(&self) -> WriteMode {
        self.mode
    }
}

impl Schema for MapSchema {
    fn kind(&self) -> SchemaKind {
        match self.mode {
            WriteMode::Clone => SchemaKind::ClonedMap,
            WriteMode::Mutate => SchemaKind::MutatedMap,
        }
    }

    fn message(&self) -> Option<&str> {
        Some(&self.message)
    }

    fn validate(&self, input: Value) -> Outcome<'_> {
        let (entries, source): (Vec<(Value, Value)>, _) = match input {
            Value::Map(map) => {
                let entries = map
                    .borrow()
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect();
                (entries, Some(map))
            }
            Value::Object(object) if self.convert_object_to_map => {
                let entries = object
                    .borrow()
                    .iter()
                    .map(|(key, value)| (Value::String(key.clone()), value.clone()))
                    .collect();
                (entries, None)
            }
            _ => return Outcome::issue(&self.message),
        };
        // A converted object has no map to write into.
        let target = match self.mode {
            WriteMode::Mutate => source,
            WriteMode::Clone => None,
        };
        let (originals, outcomes) = validate_entries(&self.key, &self.value, entries);

        join_all(outcomes, move |results| {
            let in_place = target.is_some();
            let output = target.unwrap_or_else(|| shared(ValueMap::new()));
            let issues = {
                let mut map = output.borrow_mut();
                settle(originals, results, |original, key, value| {
                    if in_place && key != original {
                        map.remove(&original);
                    }
                    map.insert(key, value);
                    Ok(())
                })
            };
            issues.finish(Value::Map(output))
        })
    }
}

fn keyed_map(mode: WriteMode, key: SchemaRef, value: SchemaRef) -> MapSchema {
    MapSchema {
        mode,
        key,
        value,
        convert_object_to_map: false,
        message: "Invalid map".to_string(),
    }
}

/// Map schema that builds a new map from the validated entries.
pub fn cloned_map<K, V>(key: K, value: V) -> MapSchema
where
    K: Schema + 'static,
    V: Schema + 'static,
{
    keyed_map(WriteMode::Clone, key.into_ref(), value.into_ref())
}

/// Map schema that writes validated entries back into the input map.
///
/// With [`MapSchema::convert_object_to_map`], an object input produces a new
/// map.
pub fn mutated_map<K, V>(key: K, value: V) -> MapSchema
where
    K: Schema + 'static,
    V: Schema + 'static,
{
    keyed_map(WriteMode::Mutate, key.into_ref(), value.into_ref())
}
