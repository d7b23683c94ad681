//! Bound value model
//!
//! The engine populates dynamic [`Scalar`] and [`Value`] sum types; the typed
//! facade extracts concrete Rust types from them through [`FromValue`].
//!
//! Floats compare bitwise for equality and totally for ordering, so every
//! scalar kind can live in a set or key a map.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

/// Width of a declared integer field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

/// Width of a declared float field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatWidth {
    W32,
    W64,
}

/// A single coerced value.
///
/// Enumeration members and user-parsed types are retained in their string
/// form (`Str`); membership/parseability is checked during coercion and the
/// facade converts them to the caller's type at extraction.
#[derive(Debug, Clone)]
pub enum Scalar {
    Str(String),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Bool(bool),
    Path(PathBuf),
}

impl Scalar {
    /// Kind name used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Scalar::Str(_) => "string",
            Scalar::I8(_) => "8-bit integer",
            Scalar::I16(_) => "16-bit integer",
            Scalar::I32(_) => "32-bit integer",
            Scalar::I64(_) => "64-bit integer",
            Scalar::F32(_) => "32-bit float",
            Scalar::F64(_) => "64-bit float",
            Scalar::Bool(_) => "boolean",
            Scalar::Path(_) => "path",
        }
    }

    /// Rank used to order scalars of different kinds
    fn rank(&self) -> u8 {
        match self {
            Scalar::Str(_) => 0,
            Scalar::I8(_) => 1,
            Scalar::I16(_) => 2,
            Scalar::I32(_) => 3,
            Scalar::I64(_) => 4,
            Scalar::F32(_) => 5,
            Scalar::F64(_) => 6,
            Scalar::Bool(_) => 7,
            Scalar::Path(_) => 8,
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Str(a), Scalar::Str(b)) => a == b,
            (Scalar::I8(a), Scalar::I8(b)) => a == b,
            (Scalar::I16(a), Scalar::I16(b)) => a == b,
            (Scalar::I32(a), Scalar::I32(b)) => a == b,
            (Scalar::I64(a), Scalar::I64(b)) => a == b,
            // Bitwise: keeps equality consistent with hashing and total order
            (Scalar::F32(a), Scalar::F32(b)) => a.to_bits() == b.to_bits(),
            (Scalar::F64(a), Scalar::F64(b)) => a.to_bits() == b.to_bits(),
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Path(a), Scalar::Path(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u8(self.rank());
        match self {
            Scalar::Str(s) => s.hash(state),
            Scalar::I8(v) => v.hash(state),
            Scalar::I16(v) => v.hash(state),
            Scalar::I32(v) => v.hash(state),
            Scalar::I64(v) => v.hash(state),
            Scalar::F32(v) => v.to_bits().hash(state),
            Scalar::F64(v) => v.to_bits().hash(state),
            Scalar::Bool(v) => v.hash(state),
            Scalar::Path(p) => p.hash(state),
        }
    }
}

impl Ord for Scalar {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Scalar::Str(a), Scalar::Str(b)) => a.cmp(b),
            (Scalar::I8(a), Scalar::I8(b)) => a.cmp(b),
            (Scalar::I16(a), Scalar::I16(b)) => a.cmp(b),
            (Scalar::I32(a), Scalar::I32(b)) => a.cmp(b),
            (Scalar::I64(a), Scalar::I64(b)) => a.cmp(b),
            (Scalar::F32(a), Scalar::F32(b)) => a.total_cmp(b),
            (Scalar::F64(a), Scalar::F64(b)) => a.total_cmp(b),
            (Scalar::Bool(a), Scalar::Bool(b)) => a.cmp(b),
            (Scalar::Path(a), Scalar::Path(b)) => a.cmp(b),
            // Mixed kinds only meet in heterogeneous diagnostics paths
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A bound field value: one scalar or one container of scalars.
///
/// Containers are stored as plain vectors with their structural guarantee
/// already applied: `Set` is deduplicated in first-occurrence order,
/// `SortedSet` is deduplicated ascending, `Map` keeps first-insertion key
/// order with last-wins values, `Array` is sized to the run exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Scalar(Scalar),
    Seq(Vec<Scalar>),
    Set(Vec<Scalar>),
    SortedSet(Vec<Scalar>),
    Map(Vec<(Scalar, Scalar)>),
    Array(Vec<Scalar>),
}

impl Value {
    /// Shape/kind description used in diagnostics
    pub fn describe(&self) -> String {
        match self {
            Value::Scalar(s) => format!("{} scalar", s.kind_name()),
            Value::Seq(_) => "sequence".to_string(),
            Value::Set(_) => "set".to_string(),
            Value::SortedSet(_) => "sorted set".to_string(),
            Value::Map(_) => "map".to_string(),
            Value::Array(_) => "array".to_string(),
        }
    }
}

/// Shape/kind mismatch raised while extracting a [`Value`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub requested: &'static str,
    pub found: String,
}

impl Mismatch {
    pub fn new(requested: &'static str, found: impl Into<String>) -> Self {
        Self {
            requested,
            found: found.into(),
        }
    }

    /// Mismatch for extracting `value` as `T`
    pub fn for_type<T>(value: &Value) -> Self {
        Self {
            requested: std::any::type_name::<T>(),
            found: value.describe(),
        }
    }
}

/// Conversion from a bound [`Value`] into a concrete Rust type.
///
/// Implemented for the built-in scalar kinds and the standard containers;
/// user types (enumerations, parse-from-string types) implement it over the
/// retained string form.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, Mismatch>;
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, Mismatch> {
        match value {
            Value::Scalar(Scalar::Str(s)) => Ok(s),
            other => Err(Mismatch::for_type::<Self>(&other)),
        }
    }
}

impl FromValue for i8 {
    fn from_value(value: Value) -> Result<Self, Mismatch> {
        match value {
            Value::Scalar(Scalar::I8(v)) => Ok(v),
            other => Err(Mismatch::for_type::<Self>(&other)),
        }
    }
}

impl FromValue for i16 {
    fn from_value(value: Value) -> Result<Self, Mismatch> {
        match value {
            Value::Scalar(Scalar::I16(v)) => Ok(v),
            other => Err(Mismatch::for_type::<Self>(&other)),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> Result<Self, Mismatch> {
        match value {
            Value::Scalar(Scalar::I32(v)) => Ok(v),
            other => Err(Mismatch::for_type::<Self>(&other)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, Mismatch> {
        match value {
            Value::Scalar(Scalar::I64(v)) => Ok(v),
            other => Err(Mismatch::for_type::<Self>(&other)),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, Mismatch> {
        match value {
            Value::Scalar(Scalar::F32(v)) => Ok(v),
            other => Err(Mismatch::for_type::<Self>(&other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, Mismatch> {
        match value {
            Value::Scalar(Scalar::F64(v)) => Ok(v),
            other => Err(Mismatch::for_type::<Self>(&other)),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, Mismatch> {
        match value {
            Value::Scalar(Scalar::Bool(v)) => Ok(v),
            other => Err(Mismatch::for_type::<Self>(&other)),
        }
    }
}

impl FromValue for PathBuf {
    fn from_value(value: Value) -> Result<Self, Mismatch> {
        match value {
            Value::Scalar(Scalar::Path(p)) => Ok(p),
            other => Err(Mismatch::for_type::<Self>(&other)),
        }
    }
}

impl<V: FromValue> FromValue for Vec<V> {
    fn from_value(value: Value) -> Result<Self, Mismatch> {
        match value {
            Value::Seq(items) | Value::Array(items) => items
                .into_iter()
                .map(|s| V::from_value(Value::Scalar(s)))
                .collect(),
            other => Err(Mismatch::for_type::<Self>(&other)),
        }
    }
}

impl<V: FromValue> FromValue for VecDeque<V> {
    fn from_value(value: Value) -> Result<Self, Mismatch> {
        match value {
            Value::Seq(items) | Value::Array(items) => items
                .into_iter()
                .map(|s| V::from_value(Value::Scalar(s)))
                .collect(),
            other => Err(Mismatch::for_type::<Self>(&other)),
        }
    }
}

impl<V: FromValue> FromValue for Box<[V]> {
    fn from_value(value: Value) -> Result<Self, Mismatch> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|s| V::from_value(Value::Scalar(s)))
                .collect(),
            other => Err(Mismatch::for_type::<Self>(&other)),
        }
    }
}

impl<V: FromValue + Eq + Hash> FromValue for HashSet<V> {
    fn from_value(value: Value) -> Result<Self, Mismatch> {
        match value {
            Value::Set(items) | Value::SortedSet(items) => items
                .into_iter()
                .map(|s| V::from_value(Value::Scalar(s)))
                .collect(),
            other => Err(Mismatch::for_type::<Self>(&other)),
        }
    }
}

impl<V: FromValue + Ord> FromValue for BTreeSet<V> {
    fn from_value(value: Value) -> Result<Self, Mismatch> {
        match value {
            Value::Set(items) | Value::SortedSet(items) => items
                .into_iter()
                .map(|s| V::from_value(Value::Scalar(s)))
                .collect(),
            other => Err(Mismatch::for_type::<Self>(&other)),
        }
    }
}

impl<K: FromValue + Eq + Hash, V: FromValue> FromValue for HashMap<K, V> {
    fn from_value(value: Value) -> Result<Self, Mismatch> {
        match value {
            Value::Map(pairs) => pairs
                .into_iter()
                .map(|(k, v)| {
                    Ok((
                        K::from_value(Value::Scalar(k))?,
                        V::from_value(Value::Scalar(v))?,
                    ))
                })
                .collect(),
            other => Err(Mismatch::for_type::<Self>(&other)),
        }
    }
}

impl<K: FromValue + Ord, V: FromValue> FromValue for BTreeMap<K, V> {
    fn from_value(value: Value) -> Result<Self, Mismatch> {
        match value {
            Value::Map(pairs) => pairs
                .into_iter()
                .map(|(k, v)| {
                    Ok((
                        K::from_value(Value::Scalar(k))?,
                        V::from_value(Value::Scalar(v))?,
                    ))
                })
                .collect(),
            other => Err(Mismatch::for_type::<Self>(&other)),
        }
    }
}
