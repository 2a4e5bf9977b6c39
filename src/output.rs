//! Literal serialization for query values.
//!
//! [`to_fql()`] writes a [`Value`] as a compact FQL literal suitable for
//! inlining into a query as an operation argument. Timestamps become
//! `Time("...")` and object keys are emitted in sorted order, so output is
//! deterministic.
//!
//! [`to_json()`] and [`to_json_pretty()`] go through the `Serialize` impl of
//! [`Value`], the same form argument maps take on the wire (timestamps use the
//! tagged `{"@time": "..."}` form).
//!
//! # Examples
//!
//! ```
//! use fql_chain::Value;
//! use fql_chain::output::{to_fql, to_json};
//!
//! let value = Value::from(vec![1, 2]);
//!
//! assert_eq!(to_fql(&value), "[1,2]");
//! assert_eq!(to_json(&Value::Integer(42)).unwrap(), "42");
//! ```

use std::collections::BTreeMap;

use crate::value::{Value, format_float, format_time};

/// Compact FQL literal writer.
pub struct LiteralPrinter;

impl LiteralPrinter {
    pub fn print(&self, value: &Value) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Float(n) => format_float(*n),
            Value::String(s) => format!("\"{}\"", self.escape_string(s)),
            Value::Array(arr) => self.print_array(arr),
            Value::Object(obj) => self.print_object(obj),
            Value::Time(t) => format!("Time(\"{}\")", format_time(t)),
        }
    }

    fn print_array(&self, arr: &[Value]) -> String {
        let items: Vec<String> = arr.iter().map(|v| self.print(v)).collect();
        format!("[{}]", items.join(","))
    }

    fn print_object(&self, obj: &BTreeMap<String, Value>) -> String {
        let items: Vec<String> = obj
            .iter()
            .map(|(k, v)| format!("\"{}\":{}", self.escape_string(k), self.print(v)))
            .collect();
        format!("{{{}}}", items.join(","))
    }

    fn escape_string(&self, s: &str) -> String {
        s.chars()
            .flat_map(|c| match c {
                '"' => vec!['\\', '"'],
                '\\' => vec!['\\', '\\'],
                '\n' => vec!['\\', 'n'],
                '\r' => vec!['\\', 'r'],
                '\t' => vec!['\\', 't'],
                c if c.is_control() => format!("\\u{:04x}", c as u32).chars().collect(),
                c => vec![c],
            })
            .collect()
    }
}

/// Converts a Value to a compact FQL literal.
///
/// Used for structured operation arguments, which the database reads as
/// inline object and array literals.
pub fn to_fql(value: &Value) -> String {
    LiteralPrinter.print(value)
}

/// Converts a Value to compact JSON.
pub fn to_json(value: &Value) -> serde_json::Result<String> {
    serde_json::to_string(value)
}

/// Converts a Value to pretty-printed JSON with 2-space indentation.
pub fn to_json_pretty(value: &Value) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}
