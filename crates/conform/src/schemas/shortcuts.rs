//! Common unions.

use crate::schema::Schema;
use crate::Value;

use super::equality::eq;
use super::logic::{UnionSchema, union};

/// `schema`, or an absent value.
pub fn undefinedable<S: Schema + 'static>(schema: S) -> UnionSchema {
    union([schema.into_ref()]).or(eq(Value::Undefined))
}

/// `schema`, or `null`.
pub fn nullable<S: Schema + 'static>(schema: S) -> UnionSchema {
    union([schema.into_ref()]).or(eq(Value::Null))
}
