//! Dynamic values flowing through schemas.
//!
//! A [`Value`] is the untyped input every schema receives and the output it
//! produces. Containers (`Array`, `Object`, `Set`, `Map`) are shared,
//! interior-mutable handles: cloning a `Value` shares the container, so a
//! caller can hand an object to a mutating schema and observe the writes
//! through its own handle.
//!
//! # Example
//!
//! ```rust
//! use conform::Value;
//!
//! let input = Value::object([("name", Value::from("John"))]);
//! let alias = input.clone();
//! assert!(alias.same_ref(&input));
//! assert!(!input.deep_clone().same_ref(&input));
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value as Json;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::rc::Rc;

/// Shared, interior-mutable container handle.
pub type Shared<T> = Rc<RefCell<T>>;

pub(crate) fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

// =============================================================================
// Ordered containers
// =============================================================================

/// Keys an [`OrderedMap`] can hold.
///
/// Keys that can be hashed are found through a hashed position index;
/// the rest are found by scanning. Keys that compare equal must report the
/// same hash.
pub trait MapKey: PartialEq {
    /// Hash of the key, or `None` if it must be found by scanning.
    fn index_hash(&self) -> Option<u64>;
}

fn hash_str(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

impl MapKey for str {
    fn index_hash(&self) -> Option<u64> {
        Some(hash_str(self))
    }
}

impl MapKey for String {
    fn index_hash(&self) -> Option<u64> {
        Some(hash_str(self))
    }
}

impl MapKey for Value {
    // Containers are shared and mutable, so only strings are indexed.
    fn index_hash(&self) -> Option<u64> {
        match self {
            Value::String(s) => Some(hash_str(s)),
            _ => None,
        }
    }
}

/// Insertion-ordered map.
///
/// Keys only need [`MapKey`], which lets [`Value`] itself be a key. String
/// keys are looked up through a hash index. Equality between two maps
/// ignores entry order.
#[derive(Clone)]
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
    index: HashMap<u64, Vec<usize>>,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K, V> OrderedMap<K, V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty map with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Iterate keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Iterate values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<K: MapKey, V> OrderedMap<K, V> {
    /// Position of `key` in insertion order.
    pub fn get_index_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: std::borrow::Borrow<Q>,
        Q: MapKey + ?Sized,
    {
        let matches = |k: &K| std::borrow::Borrow::<Q>::borrow(k) == key;
        match key.index_hash() {
            Some(hash) => self
                .index
                .get(&hash)?
                .iter()
                .copied()
                .find(|&position| matches(&self.entries[position].0)),
            None => self.entries.iter().position(|(k, _)| matches(k)),
        }
    }

    /// Look up the value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: std::borrow::Borrow<Q>,
        Q: MapKey + ?Sized,
    {
        self.get_index_of(key).map(|index| &self.entries[index].1)
    }

    /// Position, key and value of the entry stored under `key`.
    pub fn get_full<Q>(&self, key: &Q) -> Option<(usize, &K, &V)>
    where
        K: std::borrow::Borrow<Q>,
        Q: MapKey + ?Sized,
    {
        let index = self.get_index_of(key)?;
        let (k, v) = &self.entries[index];
        Some((index, k, v))
    }

    /// Whether `key` is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: std::borrow::Borrow<Q>,
        Q: MapKey + ?Sized,
    {
        self.get_index_of(key).is_some()
    }

    /// Insert or replace. A replaced entry keeps its position; a new entry is
    /// appended. Returns the previous value, if any.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(index) = self.get_index_of(&key) {
            return Some(std::mem::replace(&mut self.entries[index].1, value));
        }
        if let Some(hash) = key.index_hash() {
            self.index.entry(hash).or_default().push(self.entries.len());
        }
        self.entries.push((key, value));
        None
    }

    /// Remove `key`, shifting later entries down.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: std::borrow::Borrow<Q>,
        Q: MapKey + ?Sized,
    {
        let index = self.get_index_of(key)?;
        let (_, value) = self.entries.remove(index);
        self.index.retain(|_, positions| {
            positions.retain(|&position| position != index);
            for position in positions.iter_mut() {
                if *position > index {
                    *position -= 1;
                }
            }
            !positions.is_empty()
        });
        Some(value)
    }
}

impl<K: MapKey, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<K, V> IntoIterator for OrderedMap<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: MapKey, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// String-keyed, insertion-ordered object.
pub type Object = OrderedMap<String, Value>;

/// Map keyed by arbitrary values.
pub type ValueMap = OrderedMap<Value, Value>;

/// Insertion-ordered collection of unique values.
#[derive(Clone, Default)]
pub struct ValueSet {
    members: Vec<Value>,
}

impl ValueSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the set has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether an equal member is present.
    pub fn contains(&self, value: &Value) -> bool {
        self.members.iter().any(|member| member == value)
    }

    /// Add a member. Returns `false` when an equal member was already present.
    pub fn insert(&mut self, value: Value) -> bool {
        if self.contains(&value) {
            return false;
        }
        self.members.push(value);
        true
    }

    /// Iterate members in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.members.iter()
    }
}

impl FromIterator<Value> for ValueSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl IntoIterator for ValueSet {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

impl PartialEq for ValueSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|member| other.contains(member))
    }
}

impl fmt::Debug for ValueSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

// =============================================================================
// Value
// =============================================================================

/// An untyped value.
///
/// Equality is structural and deep; numbers compare with SameValueZero
/// semantics (`NaN == NaN`, `0.0 == -0.0`).
#[derive(Clone, Default)]
pub enum Value {
    /// Absent value; what an object schema passes for a missing key.
    #[default]
    Undefined,
    /// Explicit null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Double-precision number.
    Number(f64),
    /// Arbitrary-size integer (bounded to `i128`).
    BigInt(i128),
    /// UTF-8 string.
    String(String),
    /// Point in time, UTC.
    Date(DateTime<Utc>),
    /// Ordered sequence.
    Array(Shared<Vec<Value>>),
    /// String-keyed object.
    Object(Shared<Object>),
    /// Set of unique values.
    Set(Shared<ValueSet>),
    /// Map keyed by values.
    Map(Shared<ValueMap>),
}

impl Value {
    /// Build an array from anything convertible to values.
    pub fn array<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Array(shared(items.into_iter().map(Into::into).collect()))
    }

    /// Build an object from key/value pairs. A repeated key keeps the last value.
    pub fn object<I, K, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<Value>,
    {
        Value::Object(shared(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    /// Build a set; equal members collapse.
    pub fn set<I, T>(members: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Set(shared(members.into_iter().map(Into::into).collect()))
    }

    /// Build a map from key/value pairs.
    pub fn map<I, K, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<Value>,
        T: Into<Value>,
    {
        Value::Map(shared(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    /// Short name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
        }
    }

    /// Whether this is [`Value::Undefined`].
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Whether this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The number, if this is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Copy of the entry stored under `key`, if this is an object.
    pub fn get(&self, key: &str) -> Option<Value> {
        match self {
            Value::Object(obj) => obj.borrow().get(key).cloned(),
            _ => None,
        }
    }

    /// Length of a string (Unicode scalar values) or an array (elements).
    pub fn length(&self) -> Option<usize> {
        match self {
            Value::String(s) => Some(s.chars().count()),
            Value::Array(items) => Some(items.borrow().len()),
            _ => None,
        }
    }

    /// Whether both values are the same container handle.
    pub fn same_ref(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Set(a), Value::Set(b)) => Rc::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Copy this value, recursively detaching every container.
    pub fn deep_clone(&self) -> Value {
        match self {
            Value::Array(items) => {
                Value::Array(shared(items.borrow().iter().map(Value::deep_clone).collect()))
            }
            Value::Object(obj) => Value::Object(shared(
                obj.borrow()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.deep_clone()))
                    .collect(),
            )),
            Value::Set(set) => {
                Value::Set(shared(set.borrow().iter().map(Value::deep_clone).collect()))
            }
            Value::Map(map) => Value::Map(shared(
                map.borrow()
                    .iter()
                    .map(|(k, v)| (k.deep_clone(), v.deep_clone()))
                    .collect(),
            )),
            other => other.clone(),
        }
    }

    /// Convert into a `serde_json::Value` through [`Serialize`].
    pub fn to_json(&self) -> Result<Json, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Set(a), Value::Set(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Map(a), Value::Map(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::BigInt(n) => write!(f, "{n}n"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Date(d) => write!(f, "Date({})", d.to_rfc3339()),
            Value::Array(items) => f.debug_list().entries(items.borrow().iter()).finish(),
            Value::Object(obj) => fmt::Debug::fmt(&*obj.borrow(), f),
            Value::Set(set) => {
                f.write_str("Set ")?;
                fmt::Debug::fmt(&*set.borrow(), f)
            }
            Value::Map(map) => {
                f.write_str("Map ")?;
                fmt::Debug::fmt(&*map.borrow(), f)
            }
        }
    }
}

/// Largest integer an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Undefined | Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            // Integral numbers go out as integers so they deserialize into
            // integer fields.
            Value::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::BigInt(n) => serializer.collect_str(n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(d) => {
                serializer.serialize_str(&d.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Value::Array(items) => serializer.collect_seq(items.borrow().iter()),
            Value::Object(obj) => {
                let obj = obj.borrow();
                let mut map = serializer.serialize_map(None)?;
                for (key, value) in obj.iter().filter(|(_, v)| !v.is_undefined()) {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Set(set) => serializer.collect_seq(set.borrow().iter()),
            Value::Map(map) => {
                let map = map.borrow();
                if map.keys().all(|k| matches!(k, Value::String(_))) {
                    serializer.collect_map(map.iter())
                } else {
                    serializer.collect_seq(map.iter())
                }
            }
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<Json> for Value {
    fn from(value: Json) -> Self {
        match value {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::array(items),
            Json::Object(map) => Value::object(map),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<i128> for Value {
    fn from(value: i128) -> Self {
        Value::BigInt(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Date(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::array(items)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(shared(obj))
    }
}

impl From<ValueSet> for Value {
    fn from(set: ValueSet) -> Self {
        Value::Set(shared(set))
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Value::Map(shared(map))
    }
}
