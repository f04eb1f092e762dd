//! The schema protocol.
//!
//! A schema is anything implementing [`Schema`]: leaves and composites look
//! the same to their callers. Schemas are immutable once built and hold no
//! per-call state, so one schema can validate any number of inputs and be
//! shared by several parents through [`SchemaRef`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

use crate::outcome::Outcome;
use crate::Value;

/// Version of the validation protocol implemented by this crate.
pub const PROTOCOL_VERSION: u32 = 1;

/// Vendor tag reported by every schema built here.
pub const VENDOR: &str = "conform";

/// Discriminant of every schema kind.
///
/// Serializes as the camelCase tag (e.g. `ClonedObject` becomes
/// `"clonedObject"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub enum SchemaKind {
    // Leaves
    /// String leaf
    String,
    /// Number leaf
    Number,
    /// Boolean leaf
    Boolean,
    /// BigInt leaf
    #[serde(rename = "bigint")]
    BigInt,
    /// Regular-expression leaf
    Regex,
    /// Email leaf
    Email,
    /// UUID v4 leaf
    UuidV4,
    /// UUID v5 leaf
    UuidV5,
    /// Hex string leaf
    Hex,
    /// Base64 string leaf
    Base64,
    /// Emoji leaf
    Emoji,
    /// Date leaf
    Date,
    /// Duration leaf
    Duration,
    /// Equality leaf
    Eq,
    /// Inequality leaf
    NotEq,
    /// Enumeration leaf
    Enum,
    /// User-supplied validation function
    Custom,

    // Structural
    /// Homogeneous sequence
    Array,
    /// Fixed-arity sequence
    Tuple,
    /// Set of members
    Set,

    // Keyed
    /// Object built into a new container
    ClonedObject,
    /// Object written back into the input
    MutatesObject,
    /// Record built into a new container
    ClonedRecord,
    /// Record written back into the input
    MutatedRecord,
    /// Map built into a new container
    ClonedMap,
    /// Map written back into the input
    MutatedMap,

    // Logical
    /// First success wins
    Union,
    /// Sequential narrowing
    Intersection,

    // Refinement
    /// Lower bound
    Min,
    /// Upper bound
    Max,
    /// Exact length
    LengthEq,
    /// Composed steps
    Pipe,
}

impl SchemaKind {
    /// The tag string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::BigInt => "bigint",
            Self::Regex => "regex",
            Self::Email => "email",
            Self::UuidV4 => "uuidV4",
            Self::UuidV5 => "uuidV5",
            Self::Hex => "hex",
            Self::Base64 => "base64",
            Self::Emoji => "emoji",
            Self::Date => "date",
            Self::Duration => "duration",
            Self::Eq => "eq",
            Self::NotEq => "notEq",
            Self::Enum => "enum",
            Self::Custom => "custom",
            Self::Array => "array",
            Self::Tuple => "tuple",
            Self::Set => "set",
            Self::ClonedObject => "clonedObject",
            Self::MutatesObject => "mutatesObject",
            Self::ClonedRecord => "clonedRecord",
            Self::MutatedRecord => "mutatedRecord",
            Self::ClonedMap => "clonedMap",
            Self::MutatedMap => "mutatedMap",
            Self::Union => "union",
            Self::Intersection => "intersection",
            Self::Min => "min",
            Self::Max => "max",
            Self::LengthEq => "lengthEq",
            Self::Pipe => "pipe",
        }
    }

    /// Whether schemas of this kind delegate to child schemas.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            Self::Array
                | Self::Tuple
                | Self::Set
                | Self::ClonedObject
                | Self::MutatesObject
                | Self::ClonedRecord
                | Self::MutatedRecord
                | Self::ClonedMap
                | Self::MutatedMap
                | Self::Union
                | Self::Intersection
                | Self::Min
                | Self::Max
                | Self::LengthEq
                | Self::Pipe
        )
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reusable validation unit.
///
/// `validate` is the only required behavior; it may answer immediately or
/// suspend (see [`Outcome`]). Implementors must not keep per-call state.
///
/// # Example
///
/// ```rust
/// use conform::{Outcome, Schema, SchemaKind, Value};
///
/// struct Positive;
///
/// impl Schema for Positive {
///     fn kind(&self) -> SchemaKind {
///         SchemaKind::Custom
///     }
///
///     fn validate(&self, input: Value) -> Outcome<'_> {
///         match input.as_f64() {
///             Some(n) if n > 0.0 => Outcome::ok(input),
///             _ => Outcome::issue("Not positive"),
///         }
///     }
/// }
///
/// assert!(conform::parse(&Positive, 3).is_ok());
/// ```
pub trait Schema {
    /// Discriminant tag.
    fn kind(&self) -> SchemaKind;

    /// Default failure message, for schemas that have one.
    fn message(&self) -> Option<&str> {
        None
    }

    /// Protocol version; callers reject versions they do not support.
    fn version(&self) -> u32 {
        PROTOCOL_VERSION
    }

    /// Who built the schema.
    fn vendor(&self) -> &'static str {
        VENDOR
    }

    /// Validate `input`, producing the output value or the reasons it failed.
    fn validate(&self, input: Value) -> Outcome<'_>;

    /// Erase the concrete type so the schema can sit in a heterogeneous list
    /// or be shared between parents.
    fn into_ref(self) -> SchemaRef
    where
        Self: Sized + 'static,
    {
        Rc::new(self)
    }
}

/// Shared, type-erased schema.
pub type SchemaRef = Rc<dyn Schema>;

impl<S: Schema + ?Sized> Schema for Rc<S> {
    fn kind(&self) -> SchemaKind {
        (**self).kind()
    }

    fn message(&self) -> Option<&str> {
        (**self).message()
    }

    fn version(&self) -> u32 {
        (**self).version()
    }

    fn vendor(&self) -> &'static str {
        (**self).vendor()
    }

    fn validate(&self, input: Value) -> Outcome<'_> {
        (**self).validate(input)
    }
}

impl<S: Schema + ?Sized> Schema for Box<S> {
    fn kind(&self) -> SchemaKind {
        (**self).kind()
    }

    fn message(&self) -> Option<&str> {
        (**self).message()
    }

    fn version(&self) -> u32 {
        (**self).version()
    }

    fn vendor(&self) -> &'static str {
        (**self).vendor()
    }

    fn validate(&self, input: Value) -> Outcome<'_> {
        (**self).validate(input)
    }
}

impl fmt::Debug for dyn Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("kind", &self.kind())
            .field("message", &self.message())
            .finish()
    }
}
