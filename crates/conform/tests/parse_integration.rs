//! End-to-end parsing through the public entry points

use std::time::Duration;

use conform::prelude::*;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
struct SignUp {
    username: String,
    email: String,
    age: f64,
    #[serde(default)]
    referrer: Option<String>,
}

fn sign_up() -> ObjectSchema {
    cloned_object()
        .field("username", pipe(string()).step_with(min, 3.0).step_with(max, 16.0))
        .field("email", email())
        .field("age", min(number(), 13.0))
        .field("referrer", undefinedable(string()))
}

/// Username check backed by a slow lookup.
fn available_username() -> CustomSchema {
    custom_async(|input| async move {
        tokio::time::sleep(Duration::from_millis(1)).await;
        match input.as_str() {
            Some("taken") => Err(Issues::message("Username is taken")),
            Some(_) => Ok(input),
            None => Err(Issues::message("Not a valid string")),
        }
    })
}

fn input(username: &str, email: &str, age: f64) -> Value {
    Value::object([
        ("username", Value::from(username)),
        ("email", Value::from(email)),
        ("age", Value::from(age)),
    ])
}

#[test]
fn test_parse_into_typed_struct() {
    let parsed: SignUp = parse_into(&sign_up(), input("ada", "ada@example.com", 36.0)).unwrap();
    assert_eq!(
        parsed,
        SignUp {
            username: "ada".into(),
            email: "ada@example.com".into(),
            age: 36.0,
            referrer: None,
        }
    );
}

#[test]
fn test_parse_from_json() {
    let json = serde_json::json!({
        "username": "grace",
        "email": "grace@example.com",
        "age": 45,
        "referrer": "ada",
    });
    let parsed: SignUp = parse_into(&sign_up(), json).unwrap();
    assert_eq!(parsed.referrer.as_deref(), Some("ada"));
}

#[test]
fn test_parse_reports_all_issues() {
    let err = parse(&sign_up(), input("al", "not-an-email", 9.0)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationFailed);
    assert_eq!(
        err.issues().map(|issues| issues.messages()),
        Some(vec!["Wrong length", "Not a valid email address", "Wrong length"])
    );
}

#[test]
fn test_safe_parse_envelope() {
    let ok = safe_parse(&sign_up(), input("ada", "ada@example.com", 36.0)).unwrap();
    assert!(ok.is_success());
    let json = serde_json::to_value(&ok).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["value"]["username"], "ada");

    let failed = safe_parse(&sign_up(), Value::Null).unwrap();
    assert!(!failed.is_success());
    let json = serde_json::to_value(&failed).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["issues"][0]["message"], "Not a valid object");
}

#[test]
fn test_sync_parse_refuses_async_schema() {
    let schema = cloned_object().field("username", available_username());
    let err = parse(&schema, Value::object([("username", "ada")])).unwrap_err();
    assert_eq!(err.code(), ErrorCode::AsyncValidation);
    assert!(err.code().is_protocol_misuse());
    assert!(safe_parse(&schema, Value::object([("username", "ada")])).is_err());
}

#[tokio::test]
async fn test_parse_async_with_slow_check() {
    let schema = cloned_object()
        .field("username", available_username())
        .field("email", email());

    let ok = parse_async(
        &schema,
        Value::object([("username", "ada"), ("email", "ada@example.com")]),
    )
    .await
    .unwrap();
    assert_eq!(ok.get("username"), Some(Value::from("ada")));

    let err = parse_async(
        &schema,
        Value::object([("username", "taken"), ("email", "nope")]),
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "Username is taken, Not a valid email address");
}

#[tokio::test]
async fn test_async_entry_points_accept_sync_schemas() {
    let value = parse_async(&string(), "plain").await.unwrap();
    assert_eq!(value, Value::from("plain"));

    let result = safe_parse_async(&number(), "x").await.unwrap();
    assert_eq!(result.issues().map(|issues| issues.len()), Some(1));
}

#[tokio::test]
async fn test_parse_into_async_mutating_schema() {
    #[derive(Debug, Deserialize)]
    struct Counter {
        count: f64,
    }

    let bump = custom_async(|input| async move {
        tokio::time::sleep(Duration::from_millis(1)).await;
        match input.as_f64() {
            Some(n) => Ok(Value::from(n + 1.0)),
            None => Err(Issues::message("Not a valid number")),
        }
    });
    let schema = mutates_object().field("count", bump);
    let input = Value::object([("count", 1)]);

    let counter: Counter = parse_into_async(&schema, input.clone()).await.unwrap();
    assert_eq!(counter.count, 2.0);
    assert_eq!(input.get("count"), Some(Value::from(2)));
}

#[tokio::test]
async fn test_async_union_of_objects() {
    let user = cloned_object().field("username", available_username());
    let guest = cloned_object().field("guest", eq(true));
    let schema = union([user.into_ref(), guest.into_ref()]);

    assert!(parse_async(&schema, Value::object([("guest", true)])).await.is_ok());
    let err = parse_async(&schema, Value::object([("username", "taken")]))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Username is taken, Not equal to value");
}
