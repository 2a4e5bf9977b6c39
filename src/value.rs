use std::collections::BTreeMap;

use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use serde::ser::{Serialize, SerializeMap, Serializer};
use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};

use crate::output::to_fql;

/// A literal value bound into a query, either inline as an operation argument
/// or through the argument map.
///
/// Integers and floats are kept apart so that `100` never turns into `100.0`
/// on the way to the database.
///
/// # Examples
///
/// ```
/// use fql_chain::Value;
/// use std::collections::BTreeMap;
///
/// let count = Value::Integer(42);
/// let name = Value::from("John");
///
/// let mut obj = BTreeMap::new();
/// obj.insert("firstName".to_string(), name);
/// let record = Value::Object(obj);
///
/// assert_eq!(count.to_argument(), "42");
/// assert_eq!(record.to_argument(), r#"{"firstName":"John"}"#);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null literal
    Null,

    /// Boolean literal
    Boolean(bool),

    /// Floating-point number
    Float(f64),

    /// Integer number (preserved separately from floats)
    Integer(i64),

    /// UTF-8 string. As a positional operation argument this is an opaque
    /// FQL fragment and is inserted verbatim.
    String(String),

    /// Array of values
    Array(Vec<Value>),

    /// Object with sorted string keys
    Object(BTreeMap<String, Value>),

    /// Timestamp, always normalised to UTC
    Time(OffsetDateTime),
}

/// Named literal arguments bound alongside a query.
pub type Arguments = BTreeMap<String, Value>;

impl Value {
    /// Renders the value as a positional operation argument.
    ///
    /// Strings pass through untouched, numbers and booleans become bare tokens
    /// and everything structured is written as a compact literal.
    pub fn to_argument(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Integer(n) => n.to_string(),
            Value::Float(n) => format_float(*n),
            Value::Boolean(b) => b.to_string(),
            _ => to_fql(self),
        }
    }

    /// Parses an RFC 3339 timestamp into a [`Value::Time`].
    pub fn parse_time(iso: &str) -> Option<Value> {
        OffsetDateTime::parse(iso, &Rfc3339)
            .ok()
            .map(|t| Value::Time(t.to_offset(UtcOffset::UTC)))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Formats a float without exponent or binary noise; non-finite values have no
/// literal form and become `null`.
pub(crate) fn format_float(n: f64) -> String {
    if !n.is_finite() {
        return "null".to_string();
    }
    match Decimal::from_f64(n) {
        Some(d) if d.to_f64() == Some(n) => d.normalize().to_string(),
        _ => n.to_string(),
    }
}

/// RFC 3339 text of a timestamp.
///
/// Timestamps are held in UTC, so formatting only fails for negative years,
/// which RFC 3339 cannot express.
pub(crate) fn format_time(t: &OffsetDateTime) -> String {
    let formatted = t.format(&Rfc3339);
    debug_assert!(formatted.is_ok(), "timestamp {t} has no RFC 3339 form");
    formatted.unwrap_or_else(|_| {
        tracing::warn!(timestamp = %t, "timestamp has no RFC 3339 form");
        t.to_string()
    })
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Float(n) if n.is_finite() => serializer.serialize_f64(*n),
            Value::Float(_) => serializer.serialize_unit(),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => arr.serialize(serializer),
            Value::Object(obj) => obj.serialize(serializer),
            Value::Time(t) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("@time", &format_time(t))?;
                map.end()
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<OffsetDateTime> for Value {
    fn from(t: OffsetDateTime) -> Self {
        Value::Time(t.to_offset(UtcOffset::UTC))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(obj: BTreeMap<String, Value>) -> Self {
        Value::Object(obj)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Object(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        crate::cli::convert::json_to_value(v)
    }
}
