use std::{
    cmp::Ordering,
    fmt::{self, Display, Formatter, Write},
};

use itertools::Itertools;
use serde_json::{Number, Value as JsonValue};

/// Query value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value, also matches missing fields.
    Null,
    /// Integer value.
    Integer(i64),
    /// Float value.
    Float(f64),
    /// Boolean value.
    Boolean(bool),
    /// String value.
    String(String),
    /// Repeated value.
    Repeated(Vec<Value>),
}

impl Value {
    /// Parses a search term as a finite number.
    ///
    /// ```
    /// use realty_query::value::Value;
    ///
    /// assert_eq!(Value::parse_number(" 5 "), Some(Value::Integer(5)));
    /// assert_eq!(Value::parse_number("2.5"), Some(Value::Float(2.5)));
    /// assert_eq!(Value::parse_number("inf"), None);
    /// assert_eq!(Value::parse_number("5 rooms"), None);
    /// ```
    pub fn parse_number(source: &str) -> Option<Self> {
        let source = source.trim();
        if let Ok(value) = source.parse::<i64>() {
            return Some(Self::Integer(value));
        }
        source
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(Self::Float)
    }

    /// Converts a JSON scalar or array into a value.
    /// Objects have no value representation.
    pub fn from_json(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Null => Some(Self::Null),
            JsonValue::Bool(value) => Some(Self::Boolean(*value)),
            JsonValue::Number(number) => number
                .as_i64()
                .map(Self::Integer)
                .or_else(|| number.as_f64().map(Self::Float)),
            JsonValue::String(value) => Some(Self::String(value.clone())),
            JsonValue::Array(values) => values
                .iter()
                .map(Self::from_json)
                .collect::<Option<Vec<_>>>()
                .map(Self::Repeated),
            JsonValue::Object(_) => None,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Integer(value) => JsonValue::Number((*value).into()),
            Self::Float(value) => Number::from_f64(*value).map_or(JsonValue::Null, JsonValue::Number),
            Self::Boolean(value) => JsonValue::Bool(*value),
            Self::String(value) => JsonValue::String(value.clone()),
            Self::Repeated(values) => JsonValue::Array(values.iter().map(Self::to_json).collect()),
        }
    }

    /// Checks whether a stored JSON value equals this value.
    /// Numbers compare by numeric value regardless of integer or float form.
    pub fn matches_json(&self, other: &JsonValue) -> bool {
        match (self, other) {
            (Self::Null, JsonValue::Null) => true,
            (Self::Boolean(lhs), JsonValue::Bool(rhs)) => lhs == rhs,
            (Self::String(lhs), JsonValue::String(rhs)) => lhs == rhs,
            (Self::Integer(lhs), JsonValue::Number(rhs)) => match rhs.as_i64() {
                Some(rhs) => *lhs == rhs,
                None => rhs.as_f64() == Some(*lhs as f64),
            },
            (Self::Float(lhs), JsonValue::Number(rhs)) => rhs.as_f64() == Some(*lhs),
            (Self::Repeated(lhs), JsonValue::Array(rhs)) => {
                lhs.len() == rhs.len() && lhs.iter().zip(rhs).all(|(a, b)| a.matches_json(b))
            }
            _ => false,
        }
    }

    /// Orders a stored JSON value relative to this value.
    /// Returns `None` for values of different types.
    pub fn compare_json(&self, other: &JsonValue) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(lhs), JsonValue::Number(rhs)) => match rhs.as_i64() {
                Some(rhs) => Some(rhs.cmp(lhs)),
                None => rhs.as_f64()?.partial_cmp(&(*lhs as f64)),
            },
            (Self::Float(lhs), JsonValue::Number(rhs)) => rhs.as_f64()?.partial_cmp(lhs),
            (Self::String(lhs), JsonValue::String(rhs)) => Some(rhs.as_str().cmp(lhs.as_str())),
            (Self::Boolean(lhs), JsonValue::Bool(rhs)) => Some(rhs.cmp(lhs)),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Integer(value) => value.fmt(f),
            Self::Float(value) => value.fmt(f),
            Self::Boolean(value) => value.fmt(f),
            Self::String(value) => {
                f.write_char('"')?;
                value.fmt(f)?;
                f.write_char('"')
            }
            Self::Repeated(values) => {
                write!(f, "[{}]", values.iter().map(ToString::to_string).join(", "))
            }
        }
    }
}

impl PartialOrd<Self> for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(lhs), Self::Integer(rhs)) => lhs.partial_cmp(rhs),
            (Self::Integer(lhs), Self::Float(rhs)) => (*lhs as f64).partial_cmp(rhs),
            (Self::Float(lhs), Self::Integer(rhs)) => lhs.partial_cmp(&(*rhs as f64)),
            (Self::Float(lhs), Self::Float(rhs)) => lhs.partial_cmp(rhs),
            (Self::Boolean(lhs), Self::Boolean(rhs)) => lhs.partial_cmp(rhs),
            (Self::String(lhs), Self::String(rhs)) => lhs.partial_cmp(rhs),
            _ => None,
        }
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Into<Value>,
{
    fn from(values: Vec<T>) -> Self {
        Self::Repeated(values.into_iter().map(Into::into).collect())
    }
}

impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        value.to_json()
    }
}
