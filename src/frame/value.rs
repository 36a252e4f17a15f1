//! Dynamically-typed cell values and field types.
//!
//! Data sources hand back heterogeneous columns, so a single cell is a
//! [`Value`] rather than a concrete Rust type. Numbers (including epoch
//! millisecond timestamps) are stored as `f64`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// The semantic type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Epoch milliseconds.
    Time,
    /// Numeric values.
    Number,
    /// Text values.
    String,
    /// `true` / `false` values.
    Boolean,
    /// Anything else (objects, arrays, mixed).
    #[default]
    Other,
}

impl FieldType {
    /// Get all field types, in picker order.
    pub fn all() -> &'static [FieldType] {
        &[
            FieldType::Time,
            FieldType::Number,
            FieldType::String,
            FieldType::Boolean,
            FieldType::Other,
        ]
    }

    /// Lowercase identifier used in configs.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Time => "time",
            FieldType::Number => "number",
            FieldType::String => "string",
            FieldType::Boolean => "boolean",
            FieldType::Other => "other",
        }
    }

    /// Guess the field type from a single sample value.
    ///
    /// Returns `None` for nulls so callers can keep looking.
    pub fn guess(value: &Value) -> Option<FieldType> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(FieldType::Boolean),
            Value::Number(_) => Some(FieldType::Number),
            Value::String(s) => {
                let t = s.trim();
                if t.eq_ignore_ascii_case("true") || t.eq_ignore_ascii_case("false") {
                    Some(FieldType::Boolean)
                } else if !t.is_empty() && t.parse::<f64>().map_or(false, f64::is_finite) {
                    Some(FieldType::Number)
                } else {
                    Some(FieldType::String)
                }
            }
            Value::Json(_) => Some(FieldType::Other),
        }
    }

    /// Guess the field type from the first non-null value in a column.
    pub fn guess_from<'a>(values: impl IntoIterator<Item = &'a Value>) -> FieldType {
        values
            .into_iter()
            .find_map(FieldType::guess)
            .unwrap_or(FieldType::Other)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// Structured values that do not fit the scalar variants.
    Json(serde_json::Value),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value. Booleans and numeric strings are coerced.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Null | Value::Json(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Total ordering used by sorting transforms.
    ///
    /// Nulls sort first, then booleans, numbers, strings and structured values.
    /// Numbers compare with `f64::total_cmp`.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        fn rank(v: &Value) -> u8 {
            match v {
                Value::Null => 0,
                Value::Bool(_) => 1,
                Value::Number(_) => 2,
                Value::String(_) => 3,
                Value::Json(_) => 4,
            }
        }
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Json(a), Value::Json(b)) => a.to_string().cmp(&b.to_string()),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::Json(v) => write!(f, "{}", v),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(v as f64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
