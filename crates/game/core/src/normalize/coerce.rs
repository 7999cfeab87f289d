//! Lenient field access over raw ledger payloads.

use serde_json::{Map, Value};

/// Loosely-typed event arguments as delivered by the ledger transport.
///
/// Accessors never fail: missing or malformed fields coerce to zero, `false`
/// or empty, with a debug log so repairs stay visible.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawRecord {
    fields: Map<String, Value>,
}

impl RawRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Wraps a JSON value; anything but an object yields an empty record.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            Value::Null => Self::default(),
            other => {
                tracing::warn!(
                    target: "game_core::normalize",
                    payload = %other,
                    "raw record is not an object"
                );
                Self::default()
            }
        }
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.get(field).is_some_and(|value| !value.is_null())
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn i64(&self, field: &str) -> i64 {
        self.opt_i64(field).unwrap_or(0)
    }

    /// `None` when the field is absent or null.
    pub fn opt_i64(&self, field: &str) -> Option<i64> {
        let value = self.fields.get(field).filter(|value| !value.is_null())?;
        Some(coerce_i64(field, value))
    }

    pub fn u128(&self, field: &str) -> u128 {
        match self.fields.get(field) {
            Some(Value::String(text)) => parse_u128(text).unwrap_or_else(|| {
                repaired(field, text);
                0
            }),
            Some(value) => u128::try_from(coerce_i64(field, value)).unwrap_or(0),
            None => 0,
        }
    }

    pub fn f64(&self, field: &str) -> f64 {
        match self.fields.get(field) {
            Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
            Some(Value::String(text)) => text.trim().parse::<f64>().unwrap_or_else(|_| {
                repaired(field, text);
                0.0
            }),
            Some(Value::Bool(flag)) => f64::from(u8::from(*flag)),
            _ => 0.0,
        }
    }

    pub fn bool(&self, field: &str) -> bool {
        self.fields.get(field).is_some_and(coerce_bool)
    }

    pub fn string(&self, field: &str) -> Option<String> {
        match self.fields.get(field)? {
            Value::String(text) => Some(text.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    pub fn i64_list(&self, field: &str) -> Vec<i64> {
        self.list(field)
            .iter()
            .map(|value| coerce_i64(field, value))
            .collect()
    }

    pub fn bool_list(&self, field: &str) -> Vec<bool> {
        self.list(field).iter().map(coerce_bool).collect()
    }

    fn list(&self, field: &str) -> &[Value] {
        match self.fields.get(field) {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => &[],
            Some(other) => {
                repaired(field, other);
                &[]
            }
        }
    }
}

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

fn repaired(field: &str, value: &dyn std::fmt::Display) {
    tracing::debug!(
        target: "game_core::normalize",
        field,
        value = %value,
        "coerced malformed field to default"
    );
}

fn coerce_i64(field: &str, value: &Value) -> i64 {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_u64().map(|n| i64::try_from(n).unwrap_or(i64::MAX)))
            .or_else(|| number.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(text) => parse_i64(text).unwrap_or_else(|| {
            repaired(field, text);
            0
        }),
        Value::Bool(flag) => i64::from(*flag),
        Value::Null => 0,
        other => {
            repaired(field, other);
            0
        }
    }
}

fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => {
            let text = text.trim();
            !(text.is_empty() || text == "0" || text.eq_ignore_ascii_case("false"))
        }
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn parse_i64(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix("0x") {
        return i64::from_str_radix(hex, 16).ok();
    }
    text.parse::<i64>()
        .ok()
        .or_else(|| text.parse::<f64>().ok().map(|f| f as i64))
}

fn parse_u128(text: &str) -> Option<u128> {
    let text = text.trim();
    match text.strip_prefix("0x") {
        Some(hex) => u128::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}
