//! Record attributes: ordered key/value pairs whose values may be scalars,
//! lists or nested groups.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Duration(Duration),
    Time(DateTime<Utc>),
    List(Vec<Value>),
    Group(Vec<Attr>),
    Json(serde_json::Value),
}

impl Value {
    /// Groups without members are dropped from the output.
    pub fn is_empty_group(&self) -> bool {
        matches!(self, Value::Group(attrs) if attrs.is_empty())
    }
}

/// Human-readable rendering of an elapsed duration, e.g. `5.0021ms`.
pub fn format_duration(d: Duration) -> String {
    format!("{d:?}")
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Str(s) => serializer.serialize_str(s),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Uint(n) => serializer.serialize_u64(*n),
            Value::Float(n) => serializer.serialize_f64(*n),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Duration(d) => serializer.serialize_str(&format_duration(*d)),
            Value::Time(t) => {
                serializer.serialize_str(&t.to_rfc3339_opts(SecondsFormat::Nanos, true))
            }
            Value::List(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for v in values {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            Value::Group(attrs) => {
                let mut map = serializer.serialize_map(None)?;
                serialize_attrs(&mut map, attrs)?;
                map.end()
            }
            Value::Json(v) => v.serialize(serializer),
        }
    }
}

/// Writes `attrs` into an open map in insertion order, skipping empty groups.
pub(crate) fn serialize_attrs<M: SerializeMap>(map: &mut M, attrs: &[Attr]) -> Result<(), M::Error> {
    for attr in attrs.iter().filter(|a| !a.value.is_empty_group()) {
        map.serialize_entry(&attr.key, &attr.value)?;
    }
    Ok(())
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Uint(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Self {
        Value::Duration(d)
    }
}

// ---------------------------------------------------------------------------
// Attr
// ---------------------------------------------------------------------------

/// A single named attribute of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, Value::Str(value.into()))
    }

    pub fn int(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, Value::Int(value))
    }

    pub fn uint(key: impl Into<String>, value: u64) -> Self {
        Self::new(key, Value::Uint(value))
    }

    pub fn float(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, Value::Float(value))
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, Value::Bool(value))
    }

    pub fn duration(key: impl Into<String>, value: Duration) -> Self {
        Self::new(key, Value::Duration(value))
    }

    pub fn time(key: impl Into<String>, value: DateTime<Utc>) -> Self {
        Self::new(key, Value::Time(value))
    }

    /// A sequence of values, rendered as a JSON array.
    pub fn list<I, V>(key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::new(key, Value::List(values.into_iter().map(Into::into).collect()))
    }

    /// A nested group, rendered as a JSON object under `key`.
    pub fn group(key: impl Into<String>, attrs: Vec<Attr>) -> Self {
        Self::new(key, Value::Group(attrs))
    }

    /// Any serializable value, rendered as nested JSON.
    ///
    /// Values that fail to serialize are logged as their error text instead.
    pub fn any<T: Serialize + ?Sized>(key: impl Into<String>, value: &T) -> Self {
        let value = match serde_json::to_value(value) {
            Ok(v) => Value::Json(v),
            Err(e) => Value::Str(format!("!ERROR: {e}")),
        };
        Self::new(key, value)
    }

    /// The `error` attribute carrying a failure description.
    pub fn error(err: &dyn fmt::Display) -> Self {
        Self::string("error", err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
