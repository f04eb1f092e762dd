//! Schema constructors.
//!
//! Every constructor returns a concrete schema type with builder methods
//! (`with_message`, plus kind-specific flags). Children are accepted as any
//! `Schema + 'static` and stored as [`SchemaRef`](crate::SchemaRef), so one
//! child can be shared by several parents.

mod array;
mod custom;
mod equality;
mod logic;
mod object;
mod pipe;
mod primitives;
mod record;
mod set;
mod shortcuts;
mod size;
mod strings;
mod time;

pub use array::{ArraySchema, TupleSchema, array, tuple};
pub use custom::{CustomSchema, custom, custom_async};
pub use equality::{EnumSchema, EqSchema, NotEqSchema, enum_values, eq, not_eq};
pub use logic::{IntersectionSchema, UnionSchema, intersection, union};
pub use object::{ObjectSchema, WriteMode, cloned_object, mutates_object};
pub use pipe::{Pipe, pipe};
pub use primitives::{NumberOptions, PrimitiveSchema, bigint, boolean, number, number_with, string};
pub use record::{MapSchema, RecordSchema, cloned_map, cloned_record, mutated_map, mutated_record};
pub use set::{SetSchema, set};
pub use shortcuts::{nullable, undefinedable};
pub use size::{SizeOp, SizeSchema, length_eq, max, min};
pub use strings::{PatternSchema, base64, email, emoji, hex, regex, uuid_v4, uuid_v5};
pub use time::{DateSchema, DurationSchema, date, duration};
