//! String formats backed by regular expressions.

use regex::Regex;
use std::sync::LazyLock;

use crate::outcome::Outcome;
use crate::schema::{Schema, SchemaKind};
use crate::Value;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[A-Za-z0-9_+-]+(?:\.[A-Za-z0-9_+-]+)*@[0-9a-z]+(?:[.-][0-9a-z]+)*\.[a-z]{2,}$",
    )
    .expect("email pattern compiles")
});

static UUID_V4: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-4[0-9a-fA-F]{3}-[89ABab][0-9a-fA-F]{3}-[0-9a-fA-F]{12}$")
        .expect("uuid v4 pattern compiles")
});

static UUID_V5: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-5[0-9a-fA-F]{3}-[89ABab][0-9a-fA-F]{3}-[0-9a-fA-F]{12}$")
        .expect("uuid v5 pattern compiles")
});

static HEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]+$").expect("hex pattern compiles"));

static BASE64: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9+/]+={0,2}$").expect("base64 pattern compiles"));

// Flag pairs, tag sequences, then ZWJ sequences of emoji with optional
// presentation selector, keycap or skin-tone modifier.
static EMOJI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:[\x{1F1E6}-\x{1F1FF}]{2}",
        r"|\x{1F3F4}[\x{E0061}-\x{E007A}]{2}[\x{E0030}-\x{E0039}\x{E0061}-\x{E007A}]{1,3}\x{E007F}",
        r"|(?:\p{Emoji}\x{FE0F}\x{20E3}?|\p{Emoji_Modifier_Base}\p{Emoji_Modifier}?|\p{Emoji_Presentation})",
        r"(?:\x{200D}(?:\p{Emoji}\x{FE0F}\x{20E3}?|\p{Emoji_Modifier_Base}\p{Emoji_Modifier}?|\p{Emoji_Presentation}))*)+$",
    ))
    .expect("emoji pattern compiles")
});

/// Accepts strings matching a pattern.
#[derive(Debug, Clone)]
pub struct PatternSchema {
    kind: SchemaKind,
    pattern: Regex,
    message: String,
}

impl PatternSchema {
    fn preset(kind: SchemaKind, pattern: &Regex, message: &str) -> Self {
        Self {
            kind,
            pattern: pattern.clone(),
            message: message.to_string(),
        }
    }

    /// Replace the failure message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// The pattern inputs must match.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

impl Schema for PatternSchema {
    fn kind(&self) -> SchemaKind {
        self.kind
    }

    fn message(&self) -> Option<&str> {
        Some(&self.message)
    }

    fn validate(&self, input: Value) -> Outcome<'_> {
        match &input {
            Value::String(text) if self.pattern.is_match(text) => Outcome::ok(input),
            _ => Outcome::issue(&self.message),
        }
    }
}

/// Accepts strings matching `pattern`.
pub fn regex(pattern: Regex) -> PatternSchema {
    PatternSchema {
        kind: SchemaKind::Regex,
        pattern,
        message: "Not a valid string".to_string(),
    }
}

/// Accepts email addresses.
pub fn email() -> PatternSchema {
    PatternSchema::preset(SchemaKind::Email, &EMAIL, "Not a valid email address")
}

/// Accepts version 4 UUIDs in canonical hyphenated form.
pub fn uuid_v4() -> PatternSchema {
    PatternSchema::preset(SchemaKind::UuidV4, &UUID_V4, "Not a valid UUID v4")
}

/// Accepts version 5 UUIDs in canonical hyphenated form.
pub fn uuid_v5() -> PatternSchema {
    PatternSchema::preset(SchemaKind::UuidV5, &UUID_V5, "Not a valid UUID v5")
}

/// Accepts non-empty hexadecimal strings.
pub fn hex() -> PatternSchema {
    PatternSchema::preset(SchemaKind::Hex, &HEX, "Not a valid hex string")
}

/// Accepts standard-alphabet base64 strings.
pub fn base64() -> PatternSchema {
    PatternSchema::preset(SchemaKind::Base64, &BASE64, "Not a valid base64 string")
}

/// Accepts strings made only of emoji.
pub fn emoji() -> PatternSchema {
    PatternSchema::preset(SchemaKind::Emoji, &EMOJI, "Not a valid emoji")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn accepts(schema: &PatternSchema, text: &str) -> bool {
        parse(schema, text).is_ok()
    }

    #[test]
    fn test_regex_requires_string_and_match() {
        let schema = regex(Regex::new(r"^\d{3}$").unwrap());
        assert!(accepts(&schema, "123"));
        assert!(!accepts(&schema, "12a"));
        assert_eq!(parse(&schema, 123).unwrap_err().to_string(), "Not a valid string");
        assert_eq!(schema.kind(), SchemaKind::Regex);
    }

    #[test]
    fn test_email() {
        assert!(accepts(&email(), "john.doe+tag@example.co.uk"));
        assert!(accepts(&email(), "JOHN@EXAMPLE.COM"));
        assert!(!accepts(&email(), "john@"));
        assert!(!accepts(&email(), "john@example"));
        assert!(!accepts(&email(), "john doe@example.com"));
    }

    #[test]
    fn test_uuids() {
        assert!(accepts(&uuid_v4(), "9b2c1f4e-8d3a-4b6f-9c1d-2e3f4a5b6c7d"));
        assert!(!accepts(&uuid_v4(), "9b2c1f4e-8d3a-5b6f-9c1d-2e3f4a5b6c7d"));
        assert!(accepts(&uuid_v5(), "9b2c1f4e-8d3a-5b6f-ac1d-2e3f4a5b6c7d"));
        assert!(!accepts(&uuid_v5(), "9b2c1f4e-8d3a-5b6f-cc1d-2e3f4a5b6c7d"));
    }

    #[test]
    fn test_hex_and_base64() {
        assert!(accepts(&hex(), "deadBEEF01"));
        assert!(!accepts(&hex(), ""));
        assert!(!accepts(&hex(), "0xff"));
        assert!(accepts(&base64(), "aGVsbG8="));
        assert!(accepts(&base64(), "aGk+/w=="));
        assert!(!accepts(&base64(), "aGVsbG8==="));
    }

    #[test]
    fn test_emoji() {
        assert!(accepts(&emoji(), "😀"));
        assert!(accepts(&emoji(), "👍🏽"));
        assert!(accepts(&emoji(), "🇫🇷"));
        assert!(accepts(&emoji(), "👩‍💻"));
        assert!(!accepts(&emoji(), "a"));
        assert!(!accepts(&emoji(), "😀a"));
        assert!(!accepts(&emoji(), "1"));
    }
}
