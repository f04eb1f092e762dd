//! Tests for object, record and map combinators

use super::support::{async_string, deferred};
use crate::schemas::{
    WriteMode, cloned_map, cloned_object, cloned_record, custom, mutated_map, mutated_record,
    mutates_object, number, string, undefinedable,
};
use crate::{Issues, Schema, SchemaKind, Value, parse, parse_async};
use futures::executor::block_on;

fn upper_key() -> crate::schemas::CustomSchema {
    custom(|input| match input.as_str() {
        Some(key) => Ok(Value::from(key.to_uppercase())),
        None => Err(Issues::message("Not a valid key")),
    })
}

fn keys(value: &Value) -> Vec<String> {
    match value {
        Value::Object(object) => object.borrow().keys().cloned().collect(),
        other => panic!("expected an object, got {:?}", other),
    }
}

// =============================================================================
// Object
// =============================================================================

#[test]
fn test_cloned_object_returns_distinct_container() {
    let schema = cloned_object().field("name", string());
    let input = Value::object([("name", "John")]);
    let output = parse(&schema, input.clone()).unwrap();

    assert_eq!(output, input);
    assert!(!output.same_ref(&input));

    if let Value::Object(object) = &output {
        object.borrow_mut().insert("name".into(), Value::from("Jane"));
    }
    assert_eq!(input.get("name"), Some(Value::from("John")));
}

#[test]
fn test_mutates_object_returns_same_container() {
    let schema = mutates_object().field("name", string());
    let input = Value::object([("name", "John")]);
    let output = parse(&schema, input.clone()).unwrap();
    assert!(output.same_ref(&input));
    assert_eq!(schema.kind(), SchemaKind::MutatesObject);
    assert_eq!(schema.mode(), WriteMode::Mutate);
}

#[test]
fn test_object_rejects_non_objects() {
    let schema = cloned_object().field("name", string());
    for input in [Value::Null, Value::array(["a"]), Value::from("x"), Value::map([("name", "x")])] {
        assert_eq!(parse(&schema, input).unwrap_err().to_string(), "Not a valid object");
    }
}

#[test]
fn test_object_aggregates_property_issues_in_order() {
    let schema = cloned_object()
        .field("a", string().with_message("bad a"))
        .field("b", number().with_message("bad b"))
        .field("c", string().with_message("bad c"));
    let input = Value::object([
        ("c", Value::from(1)),
        ("a", Value::from(2)),
        ("b", Value::from("x")),
    ]);
    let issues = parse(&schema, input).unwrap_err().into_issues().unwrap();
    // Input order, not declaration order.
    assert_eq!(issues.messages(), vec!["bad c", "bad a", "bad b"]);
}

#[test]
fn test_missing_keys_are_validated_as_undefined() {
    let schema = cloned_object()
        .field("name", string())
        .field("nickname", undefinedable(string()));

    let output = parse(&schema, Value::object([("name", "John")])).unwrap();
    assert_eq!(keys(&output), vec!["name"]);

    let err = parse(&schema, Value::object(Vec::<(String, Value)>::new())).unwrap_err();
    assert_eq!(err.to_string(), "Not a valid string");
}

#[test]
fn test_absent_key_issues_come_after_present_keys() {
    let schema = cloned_object().field("missing", string()).field("present", number());
    let issues = parse(&schema, Value::object([("present", "x")]))
        .unwrap_err()
        .into_issues()
        .unwrap();
    assert_eq!(issues.messages(), vec!["Not a valid number", "Not a valid string"]);
}

#[test]
fn test_cloned_object_extra_keys() {
    let input = Value::object([("name", "John"), ("role", "admin")]);

    let passthrough = cloned_object().field("name", string());
    assert_eq!(keys(&parse(&passthrough, input.clone()).unwrap()), vec!["name", "role"]);

    let strict = cloned_object().field("name", string()).ignore_extra_keys(true);
    assert_eq!(keys(&parse(&strict, input.clone()).unwrap()), vec!["name"]);
    // Input untouched.
    assert_eq!(keys(&input), vec!["name", "role"]);
}

#[test]
fn test_mutates_object_extra_keys_removed_in_place() {
    let input = Value::object([("name", "John"), ("role", "admin")]);
    let schema = mutates_object().field("name", string()).ignore_extra_keys(true);
    parse(&schema, input.clone()).unwrap();
    assert_eq!(keys(&input), vec!["name"]);
}

#[test]
fn test_mutates_object_writes_transformed_values() {
    let trimmed = custom(|input| match input.as_str() {
        Some(text) => Ok(Value::from(text.trim())),
        None => Err(Issues::message("Not a valid string")),
    });
    let schema = mutates_object().field("name", trimmed).field("age", number());
    let input = Value::object([("name", Value::from("  John ")), ("age", Value::from("x"))]);

    assert!(parse(&schema, input.clone()).is_err());
    // Valid properties are written back even though another failed.
    assert_eq!(input.get("name"), Some(Value::from("John")));
    assert_eq!(input.get("age"), Some(Value::from("x")));
}

#[test]
fn test_mutates_object_removes_undefined_outputs() {
    let drop_it = custom(|_| Ok(Value::Undefined));
    let schema = mutates_object().field("secret", drop_it);
    let input = Value::object([("secret", "hunter2"), ("id", "1")]);
    parse(&schema, input.clone()).unwrap();
    assert_eq!(keys(&input), vec!["id"]);
}

#[test]
fn test_object_with_async_property() {
    let schema = cloned_object().field("name", async_string()).field("age", number());
    let input = Value::object([("name", Value::from("John")), ("age", Value::from(30))]);
    assert!(schema.validate(input.clone()).is_pending());
    assert_eq!(block_on(parse_async(&schema, input.clone())).unwrap(), input);

    let bad = Value::object([("name", Value::from(1)), ("age", Value::from("x"))]);
    let err = block_on(parse_async(&schema, bad)).unwrap_err();
    assert_eq!(err.to_string(), "Not a valid string, Not a valid number");
}

#[test]
fn test_mutates_object_async_writes_after_join() {
    let schema = mutates_object().field("count", deferred(custom(|input| match input.as_f64() {
        Some(n) => Ok(Value::from(n + 1.0)),
        None => Err(Issues::message("Not a valid number")),
    })));
    let input = Value::object([("count", 1)]);
    let output = block_on(parse_async(&schema, input.clone())).unwrap();
    assert!(output.same_ref(&input));
    assert_eq!(input.get("count"), Some(Value::from(2)));
}

#[test]
fn test_nested_objects() {
    let schema = cloned_object().field("user", cloned_object().field("name", string()));
    let input = Value::object([("user", Value::object([("name", 1)]))]);
    assert_eq!(parse(&schema, input).unwrap_err().to_string(), "Not a valid string");
}

// =============================================================================
// Record
// =============================================================================

#[test]
fn test_record_validates_keys_and_values() {
    let schema = cloned_record(string(), number());
    let input = Value::object([("a", 1), ("b", 2)]);
    let output = parse(&schema, input.clone()).unwrap();
    assert_eq!(output, input);
    assert!(!output.same_ref(&input));
    assert_eq!(parse(&schema, Value::array([1])).unwrap_err().to_string(), "Invalid record");
}

#[test]
fn test_record_key_rewrite() {
    let input = Value::object([("a", 1)]);
    let output = parse(&cloned_record(upper_key(), number()), input.clone()).unwrap();
    assert_eq!(output, Value::object([("A", 1)]));
    assert_eq!(input, Value::object([("a", 1)]));

    let output = parse(&mutated_record(upper_key(), number()), input.clone()).unwrap();
    assert!(output.same_ref(&input));
    assert_eq!(input, Value::object([("A", 1)]));

    // Already-normalised keys come back unchanged.
    let normalised = Value::object([("A", 1)]);
    assert_eq!(parse(&cloned_record(upper_key(), number()), normalised.clone()).unwrap(), normalised);
    let normalised = Value::map([("A", 1)]);
    assert_eq!(parse(&cloned_map(upper_key(), number()), normalised.clone()).unwrap(), normalised);
}

#[test]
fn test_record_key_collision_last_write_wins() {
    let input = Value::object([("a", 1), ("A", 2)]);
    let output = parse(&cloned_record(upper_key(), number()), input).unwrap();
    assert_eq!(output, Value::object([("A", 2)]));
}

#[test]
fn test_record_reports_key_then_value_issues() {
    let only_a = custom(|input| match input.as_str() {
        Some("a") => Ok(input),
        _ => Err(Issues::message("Bad key")),
    });
    let schema = cloned_record(only_a, number());
    let input = Value::object([("b", Value::from("x")), ("a", Value::from(1))]);
    let issues = parse(&schema, input).unwrap_err().into_issues().unwrap();
    assert_eq!(issues.messages(), vec!["Bad key", "Not a valid number"]);
}

#[test]
fn test_record_key_must_stay_a_string() {
    let to_number = custom(|_| Ok(Value::from(1)));
    let schema = cloned_record(to_number, number());
    let err = parse(&schema, Value::object([("a", 1)])).unwrap_err();
    assert_eq!(err.to_string(), "Invalid record");
}

#[test]
fn test_mutated_record_partial_writes() {
    let schema = mutated_record(upper_key(), number());
    let input = Value::object([("a", Value::from(1)), ("b", Value::from("x"))]);
    assert!(parse(&schema, input.clone()).is_err());
    assert_eq!(keys(&input), vec!["b", "A"]);
}

// =============================================================================
// Map
// =============================================================================

#[test]
fn test_cloned_map_builds_new_map() {
    let schema = cloned_map(number(), string());
    let input = Value::map([(Value::from(1), Value::from("one"))]);
    let output = parse(&schema, input.clone()).unwrap();
    assert_eq!(output, input);
    assert!(!output.same_ref(&input));
    assert_eq!(schema.kind(), SchemaKind::ClonedMap);
}

#[test]
fn test_map_rejects_objects_unless_converting() {
    let object = Value::object([("a", "x")]);
    let err = parse(&cloned_map(string(), string()), object.clone()).unwrap_err();
    assert_eq!(err.to_string(), "Invalid map");

    let schema = cloned_map(string(), string()).convert_object_to_map(true);
    let output = parse(&schema, object).unwrap();
    assert_eq!(output, Value::map([("a", "x")]));
}

#[test]
fn test_mutated_map_key_rewrite_in_place() {
    let input = Value::map([("a", 1)]);
    let output = parse(&mutated_map(upper_key(), number()), input.clone()).unwrap();
    assert!(output.same_ref(&input));
    assert_eq!(input, Value::map([("A", 1)]));
}

#[test]
fn test_mutated_map_from_object_builds_new_map() {
    let input = Value::object([("a", 1)]);
    let schema = mutated_map(upper_key(), number()).convert_object_to_map(true);
    let output = parse(&schema, input.clone()).unwrap();
    assert_eq!(output, Value::map([("A", 1)]));
    assert_eq!(input, Value::object([("a", 1)]));
}

#[test]
fn test_map_async_entries() {
    let schema = cloned_map(async_string(), deferred(number()));
    let input = Value::map([("a", 1), ("b", 2)]);
    assert!(schema.validate(input.clone()).is_pending());
    assert_eq!(block_on(parse_async(&schema, input.clone())).unwrap(), input);

    let bad = Value::map([(Value::from(1), Value::from("x"))]);
    let err = block_on(parse_async(&schema, bad)).unwrap_err();
    assert_eq!(err.to_string(), "Not a valid string, Not a valid number");
}
