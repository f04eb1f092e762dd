#![warn(missing_docs)]
//! # conform
//!
//! Composable validation of untyped values.
//!
//! ## Overview
//!
//! A schema takes a dynamic [`Value`] and produces either a validated (and
//! possibly transformed) output value or the complete list of reasons the
//! input was rejected. Schemas compose:
//!
//! - **Leaves** check one value: [`schemas::string`], [`schemas::number`],
//!   [`schemas::email`], [`schemas::date`], [`schemas::custom`], ...
//! - **Structural combinators** validate collections: [`schemas::array`],
//!   [`schemas::tuple`], [`schemas::set`].
//! - **Keyed combinators** validate keyed containers, either building a new
//!   container (`cloned_*`) or writing back into the input (`mutate*`).
//! - **Logical combinators**: [`schemas::union`] (first success wins) and
//!   [`schemas::intersection`] (sequential narrowing).
//! - **Refinements**: [`schemas::min`], [`schemas::max`],
//!   [`schemas::length_eq`] and [`schemas::pipe`].
//!
//! ## Execution model
//!
//! Validation is synchronous unless a leaf suspends
//! ([`schemas::custom_async`]). A composite suspends only when one of its
//! children did, and then awaits *all* of them before aggregating, keeping
//! positional order. See [`Outcome`] and [`join_all`].
//!
//! ```text
//! parse(schema, input)
//!        │
//!        ▼
//!   schema.validate ──► Outcome::Ready(Ok | Err)   ── sync result
//!        │
//!        └────────────► Outcome::Pending(future)   ── await (parse_async)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use conform::prelude::*;
//!
//! let user = cloned_object()
//!     .field("name", min(string(), 1.0))
//!     .field("email", email())
//!     .field("nickname", undefinedable(string()));
//!
//! let input = Value::object([
//!     ("name", Value::from("Ada")),
//!     ("email", Value::from("ada@example.com")),
//! ]);
//! let output = parse(&user, input.clone()).unwrap();
//! assert_eq!(output, input);
//! assert!(!output.same_ref(&input));
//!
//! let err = parse(&user, Value::object([("name", "")])).unwrap_err();
//! assert_eq!(err.to_string(), "Wrong length, Not a valid email address");
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (`trace!` for combinator internals,
//! `debug!` for rejected parses, `warn!` for protocol misuse) and never
//! installs a subscriber.

pub mod error;
pub mod issue;
pub mod outcome;
pub mod parse;
pub mod schema;
pub mod schemas;
pub mod value;

#[cfg(test)]
mod tests;

pub use error::{ErrorCode, ParseError, ParseResult};
pub use issue::{EmptyIssues, Issue, IssueAccumulator, Issues, ValidationResult};
pub use outcome::{Outcome, PendingValidation, collect_all, join_all};
pub use parse::{
    SafeParseResult, parse, parse_async, parse_into, parse_into_async, safe_parse,
    safe_parse_async,
};
pub use schema::{PROTOCOL_VERSION, Schema, SchemaKind, SchemaRef, VENDOR};
pub use value::{MapKey, Object, OrderedMap, Shared, Value, ValueMap, ValueSet};

/// Everything needed to build and run schemas.
pub mod prelude {
    pub use crate::error::{ErrorCode, ParseError, ParseResult};
    pub use crate::issue::{Issue, Issues, ValidationResult};
    pub use crate::outcome::Outcome;
    pub use crate::parse::{
        SafeParseResult, parse, parse_async, parse_into, parse_into_async, safe_parse,
        safe_parse_async,
    };
    pub use crate::schema::{Schema, SchemaKind, SchemaRef};
    pub use crate::schemas::*;
    pub use crate::value::{Object, Value, ValueMap, ValueSet};
}
