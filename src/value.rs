/// Cell values and row keys.
///
/// A cell holds a string, a number, a boolean or a structured JSON value
/// (array/object). There is no null marker: a missing or null cell is the
/// empty string.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use std::fmt;

/// Value stored in a single cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "JsonValue", into = "JsonValue")]
pub enum CellValue {
    String(String),
    Number(f64),
    Bool(bool),
    /// Arrays and objects, compared structurally
    Structured(JsonValue),
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::empty()
    }
}

impl CellValue {
    pub fn empty() -> Self {
        CellValue::String(String::new())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// True for values that fail a "required" check: whitespace-only strings
    /// and empty arrays/objects.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::String(s) => s.trim().is_empty(),
            CellValue::Number(n) => n.is_nan(),
            CellValue::Bool(_) => false,
            CellValue::Structured(JsonValue::Array(a)) => a.is_empty(),
            CellValue::Structured(JsonValue::Object(o)) => o.is_empty(),
            CellValue::Structured(v) => v.is_null(),
        }
    }

    /// Strings are trimmed on write; other values pass through.
    pub fn trimmed(self) -> Self {
        match self {
            CellValue::String(s) => {
                let trimmed = s.trim();
                if trimmed.len() == s.len() {
                    CellValue::String(s)
                } else {
                    CellValue::String(trimmed.to_string())
                }
            }
            other => other,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        self.clone().into()
    }

    fn type_rank(&self) -> u8 {
        match self {
            CellValue::Bool(_) => 0,
            CellValue::Number(_) => 1,
            CellValue::String(_) => 2,
            CellValue::Structured(_) => 3,
        }
    }

    /// Ordering used by the row comparator.
    ///
    /// Values of the same kind compare naturally; NaN compares equal to
    /// everything so that it neither sorts before nor after its neighbours.
    /// Mixed kinds are ordered bool < number < string < structured.
    pub fn compare(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (CellValue::String(a), CellValue::String(b)) => a.cmp(b),
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (CellValue::Structured(a), CellValue::Structured(b)) => {
                a.to_string().cmp(&b.to_string())
            }
            (a, b) => a.type_rank().cmp(&b.type_rank()),
        }
    }
}

impl From<JsonValue> for CellValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => CellValue::empty(),
            JsonValue::Bool(b) => CellValue::Bool(b),
            JsonValue::Number(n) => CellValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            JsonValue::String(s) => CellValue::String(s),
            other => CellValue::Structured(other),
        }
    }
}

impl From<CellValue> for JsonValue {
    fn from(value: CellValue) -> Self {
        match value {
            CellValue::String(s) => JsonValue::String(s),
            CellValue::Bool(b) => JsonValue::Bool(b),
            CellValue::Number(n) => number_to_json(n),
            CellValue::Structured(v) => v,
        }
    }
}

/// Integral floats are emitted as JSON integers so that `1` round-trips as `1`.
fn number_to_json(n: f64) -> JsonValue {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        JsonValue::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{}", s),
            CellValue::Number(_) => write!(f, "{}", self.to_json()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Structured(v) => write!(f, "{}", v),
        }
    }
}

/// Stable identifier of a row, independent of its position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowKey {
    Int(i64),
    Str(String),
}

impl RowKey {
    /// Derive a key from a key-column cell. Integral numbers become `Int`,
    /// everything else uses its display form.
    pub fn from_cell(value: &CellValue) -> Option<RowKey> {
        match value {
            CellValue::Number(n) if n.fract() == 0.0 && n.is_finite() => Some(RowKey::Int(*n as i64)),
            v if v.is_blank() => None,
            CellValue::String(s) => Some(RowKey::Str(s.clone())),
            other => Some(RowKey::Str(other.to_string())),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            RowKey::Int(v) => Some(*v),
            RowKey::Str(_) => None,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            RowKey::Int(v) => JsonValue::from(*v),
            RowKey::Str(s) => JsonValue::String(s.clone()),
        }
    }
}

impl From<i64> for RowKey {
    fn from(value: i64) -> Self {
        RowKey::Int(value)
    }
}

impl From<i32> for RowKey {
    fn from(value: i32) -> Self {
        RowKey::Int(value as i64)
    }
}

impl From<&str> for RowKey {
    fn from(value: &str) -> Self {
        RowKey::Str(value.to_string())
    }
}

impl From<String> for RowKey {
    fn from(value: String) -> Self {
        RowKey::Str(value)
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Int(v) => write!(f, "{}", v),
            RowKey::Str(s) => write!(f, "{}", s),
        }
    }
}
