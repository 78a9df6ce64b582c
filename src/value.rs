// third-party imports
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use strum::AsRefStr;

// ---

/// Ordered field-to-value mapping, preserving the server's emission order.
/// Inserting an existing key overwrites its value in place.
pub type Object = IndexMap<String, Value>;

/// Record is the top-level mapping produced for one log line.
pub type Record = Object;

// ---

/// Value is one decoded field value in its printed document form.
///
/// All numeric literals decode as doubles. A datetime is produced only
/// by `new Date(<millis>)`; every other date-like token stays a string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    DateTime(DateTime<Utc>),
    Array(Vec<Value>),
    Object(Object),
    Opaque(Opaque),
}

impl Value {
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(a: Vec<Value>) -> Self {
        Self::Array(a)
    }
}

impl From<Object> for Value {
    #[inline]
    fn from(o: Object) -> Self {
        Self::Object(o)
    }
}

impl From<Opaque> for Value {
    #[inline]
    fn from(o: Opaque) -> Self {
        Self::Opaque(o)
    }
}

// ---

/// Opaque carries a constructor's textual payload, preserved verbatim
/// without further interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Opaque {
    pub kind: OpaqueKind,
    pub payload: String,
}

impl Opaque {
    pub fn new(kind: OpaqueKind, payload: impl Into<String>) -> Self {
        Self {
            kind,
            payload: payload.into(),
        }
    }
}

#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OpaqueKind {
    ObjectId,
    Timestamp,
    NumberLong,
    BinData,
    Regex,
    MinKey,
    MaxKey,
    Undefined,
}

// ---
