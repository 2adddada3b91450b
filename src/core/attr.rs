//! Attributes: the key/value fields attached to every record
//!
//! This module provides:
//! - `Value`: a tagged union over everything a field can hold
//! - `Attr`: one key/value pair
//! - `Source`: the call-site payload carried under [`SOURCE_KEY`]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Key of the built-in timestamp attribute
pub const TIME_KEY: &str = "time";
/// Key of the built-in level attribute
pub const LEVEL_KEY: &str = "level";
/// Key of the built-in message attribute
pub const MESSAGE_KEY: &str = "msg";
/// Key of the call-site attribute added when source capture is enabled
pub const SOURCE_KEY: &str = "source";
/// Key of the attribute added by the prefix option
pub const PREFIX_KEY: &str = "prefix";

/// Returns true for the "no timestamp set" sentinel
pub fn is_zero_time(time: &DateTime<Utc>) -> bool {
    *time == DateTime::<Utc>::default()
}

/// Call-site location of a record
///
/// Before rewriting, `file` holds the path reported by the compiler and
/// `directory` is empty. The source rewriter splits the two and trims
/// `function` to its bare name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub file: String,
    pub function: String,
    pub directory: String,
    pub line: u32,
}

impl Source {
    /// Raw location as captured at the call site
    pub fn new(file: impl Into<String>, line: u32, function: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            function: function.into(),
            directory: String::new(),
            line,
        }
    }

    /// `directory/file` (or just `file` when there is no directory)
    pub fn path(&self) -> String {
        if self.directory.is_empty() {
            self.file.clone()
        } else {
            format!("{}/{}", self.directory, self.file)
        }
    }
}

/// Value held by an attribute
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Duration(Duration),
    Time(DateTime<Utc>),
    /// Nested attributes rendered under this attribute's key
    Group(Vec<Attr>),
    Source(Source),
    /// Arbitrary serializable payload
    Any(serde_json::Value),
}

impl Value {
    /// Wrap any serializable payload
    ///
    /// A payload that fails to serialize is recorded as a string describing
    /// the failure instead of failing the logging call.
    pub fn any<T: Serialize + ?Sized>(payload: &T) -> Self {
        match serde_json::to_value(payload) {
            Ok(value) => Value::Any(value),
            Err(e) => Value::String(format!("!ERROR: {}", e)),
        }
    }

    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Uint(u) => serde_json::Value::Number((*u).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Duration(d) => serde_json::Value::Number((d.as_nanos() as u64).into()),
            Value::Time(t) => serde_json::Value::String(t.to_rfc3339()),
            Value::Group(attrs) => serde_json::Value::Object(
                attrs
                    .iter()
                    .map(|a| (a.key.clone(), a.value.to_json_value()))
                    .collect(),
            ),
            Value::Source(src) => serde_json::to_value(src).unwrap_or(serde_json::Value::Null),
            Value::Any(v) => v.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Uint(u) => write!(f, "{}", u),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Duration(d) => write!(f, "{:?}", d),
            Value::Time(t) => write!(f, "{}", t.to_rfc3339()),
            Value::Group(attrs) => {
                write!(f, "[")?;
                for (i, attr) in attrs.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", attr)?;
                }
                write!(f, "]")
            }
            Value::Source(src) => write!(f, "{}:{}", src.path(), src.line),
            Value::Any(v) => write!(f, "{}", v),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Uint(u)
    }
}

impl From<u32> for Value {
    fn from(u: u32) -> Self {
        Value::Uint(u as u64)
    }
}

impl From<usize> for Value {
    fn from(u: usize) -> Self {
        Value::Uint(u as u64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
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

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Time(t)
    }
}

impl From<Source> for Value {
    fn from(src: Source) -> Self {
        Value::Source(src)
    }
}

impl From<Vec<Attr>> for Value {
    fn from(attrs: Vec<Attr>) -> Self {
        Value::Group(attrs)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Any(v)
    }
}

/// A single key/value field attached to a record
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Group attribute nesting `attrs` under `key`
    pub fn group(key: impl Into<String>, attrs: Vec<Attr>) -> Self {
        Self {
            key: key.into(),
            value: Value::Group(attrs),
        }
    }

    /// Attribute holding an arbitrary serializable payload
    pub fn any<T: Serialize + ?Sized>(key: impl Into<String>, payload: &T) -> Self {
        Self {
            key: key.into(),
            value: Value::any(payload),
        }
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Shorthand for [`Attr::new`]
pub fn attr<K, V>(key: K, value: V) -> Attr
where
    K: Into<String>,
    V: Into<Value>,
{
    Attr::new(key, value)
}
