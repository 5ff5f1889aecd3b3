//! Cell values and record identity.
//!
//! The table engine never looks inside a record directly. It asks the record
//! for a [`CellValue`] by key and works on that, so any type implementing
//! [`Record`] can be searched, sorted and paged.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable unique identifier of a record.
///
/// Backend entities use numeric ids, but the engine also accepts string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Num(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Num(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Num(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        RecordId::Text(value)
    }
}

/// A single field value as seen by the table engine.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Missing, `null` or unknown field.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Position of the value's kind in the sort order.
    fn rank(&self) -> u8 {
        match self {
            CellValue::Bool(_) => 0,
            CellValue::Int(_) | CellValue::Float(_) => 1,
            CellValue::Text(_) => 2,
            CellValue::Null => 3,
        }
    }

    /// Total ordering used for sorting.
    ///
    /// Kinds come in a fixed order: booleans, numbers, text, then `Null`, so
    /// `Null` sorts after any present value. Within a kind, booleans compare
    /// `false < true`, text lexicographically and numbers numerically, ints
    /// and floats together and exactly.
    pub fn compare(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (CellValue::Int(a), CellValue::Int(b)) => a.cmp(b),
            (CellValue::Float(a), CellValue::Float(b)) => compare_floats(*a, *b),
            (CellValue::Int(a), CellValue::Float(b)) => compare_int_float(*a, *b),
            (CellValue::Float(a), CellValue::Int(b)) => compare_int_float(*b, *a).reverse(),
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

/// Numeric order with `-0.0 == 0.0`; NaNs go below or above every number
/// according to their sign.
fn compare_floats(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

/// Exact comparison of an integer with a float, without rounding the integer.
fn compare_int_float(i: i64, f: f64) -> Ordering {
    // 2^63, the first float past i64::MAX
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if f.is_nan() {
        return if f.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if f >= LIMIT {
        return Ordering::Less;
    }
    if f < -LIMIT {
        return Ordering::Greater;
    }

    let whole = f.trunc();
    // In range, so the cast is exact
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => compare_floats(0.0, f - whole),
        ord => ord,
    }
}

impl fmt::Display for CellValue {
    /// Stringification used for search and default cell rendering.
    /// `Null` renders as the empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(x) => write!(f, "{}", x),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&String> for CellValue {
    fn from(value: &String) -> Self {
        CellValue::Text(value.clone())
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Int(i64::from(value))
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Null, Into::into)
    }
}

impl From<&serde_json::Value> for CellValue {
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => CellValue::Null,
            Value::Bool(b) => CellValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => CellValue::Int(i),
                None => n.as_f64().map_or(CellValue::Null, CellValue::Float),
            },
            Value::String(s) => CellValue::Text(s.clone()),
            // Nested structures are displayed as JSON text
            other => CellValue::Text(other.to_string()),
        }
    }
}

/// An entity the table engine can display.
///
/// The only structural requirement is a stable identifier; every other field
/// is reached by key through [`Record::field`]. Unknown keys must return
/// [`CellValue::Null`] rather than fail.
pub trait Record {
    /// Stable unique identifier of this record.
    fn id(&self) -> RecordId;

    /// Value of the field named `key`, or [`CellValue::Null`] if absent.
    fn field(&self, key: &str) -> CellValue;
}

/// Raw JSON objects are records too, keyed by their property names.
///
/// Objects without an `id` property get an empty text id.
impl Record for serde_json::Value {
    fn id(&self) -> RecordId {
        match self.get("id") {
            Some(serde_json::Value::Number(n)) => match n.as_i64() {
                Some(i) => RecordId::Num(i),
                None => RecordId::Text(n.to_string()),
            },
            Some(serde_json::Value::String(s)) => RecordId::Text(s.clone()),
            _ => RecordId::Text(String::new()),
        }
    }

    fn field(&self, key: &str) -> CellValue {
        self.get(key).map_or(CellValue::Null, CellValue::from)
    }
}
