//! Date and duration parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

use crate::outcome::Outcome;
use crate::schema::{Schema, SchemaKind};
use crate::value::Object;
use crate::Value;

static DURATION_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(-?\d+)(y|mo|ms|d|h|m|s)").expect("duration token pattern compiles")
});

/// Field names of a parsed duration, in output order.
const DURATION_FIELDS: [&str; 7] = [
    "years",
    "months",
    "days",
    "hours",
    "minutes",
    "seconds",
    "milliseconds",
];

fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

fn field_index(unit: &str) -> Option<usize> {
    match unit {
        "y" => Some(0),
        "mo" => Some(1),
        "d" => Some(2),
        "h" => Some(3),
        "m" => Some(4),
        "s" => Some(5),
        "ms" => Some(6),
        _ => None,
    }
}

fn parse_duration(text: &str) -> Option<Object> {
    let mut amounts = [0.0_f64; 7];
    let mut matched = false;
    for token in DURATION_TOKEN.captures_iter(text) {
        let (Some(amount), Some(index)) = (
            token[1].parse::<f64>().ok(),
            field_index(&token[2]),
        ) else {
            continue;
        };
        amounts[index] = amount;
        matched = true;
    }
    if !matched {
        return None;
    }
    Some(
        DURATION_FIELDS
            .iter()
            .zip(amounts)
            .map(|(field, amount)| (field.to_string(), Value::Number(amount)))
            .collect(),
    )
}

/// Accepts dates, or strings that parse as one.
#[derive(Debug, Clone)]
pub struct DateSchema {
    message: String,
}

impl DateSchema {
    /// Replace the failure message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl Schema for DateSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Date
    }

    fn message(&self) -> Option<&str> {
        Some(&self.message)
    }

    fn validate(&self, input: Value) -> Outcome<'_> {
        match input {
            Value::Date(when) => Outcome::ok(Value::Date(when)),
            Value::String(text) => match parse_date(&text) {
                Some(parsed) => Outcome::ok(Value::Date(parsed)),
                None => Outcome::issue(&self.message),
            },
            _ => Outcome::issue(&self.message),
        }
    }
}

/// Accepts a [`Value::Date`] unchanged, or an RFC 3339, `YYYY-MM-DDTHH:MM:SS`
/// (UTC) or `YYYY-MM-DD` (midnight UTC) string.
pub fn date() -> DateSchema {
    DateSchema {
        message: "Not a valid date".to_string(),
    }
}

/// Parses duration strings such as `"1y2mo3d"` or `"-5m 30s"`.
#[derive(Debug, Clone)]
pub struct DurationSchema {
    message: String,
}

impl DurationSchema {
    /// Replace the failure message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl Schema for DurationSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Duration
    }

    fn message(&self) -> Option<&str> {
        Some(&self.message)
    }

    fn validate(&self, input: Value) -> Outcome<'_> {
        match input.as_str().and_then(parse_duration) {
            Some(parsed) => Outcome::ok(Value::from(parsed)),
            None => Outcome::issue(&self.message),
        }
    }
}

/// Produces `{years, months, days, hours, minutes, seconds, milliseconds}`
/// from `<integer><unit>` tokens (`y`, `mo`, `d`, `h`, `m`, `s`, `ms`).
/// Missing units are zero; a repeated unit keeps its last token.
pub fn duration() -> DurationSchema {
    DurationSchema {
        message: "Not a valid duration".to_string(),
    }
}
