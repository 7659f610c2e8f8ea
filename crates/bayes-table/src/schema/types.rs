//! Core value and type definitions shared by every component.

use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Type tag for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Discrete values, scored by smoothed frequency.
    Categorical,
    /// Continuous values, scored by Gaussian density.
    Numeric,
}

impl ColumnType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Numeric)
    }

    /// Runtime value kind accepted by this column type.
    pub fn value_kind(&self) -> &'static str {
        match self {
            ColumnType::Categorical => "string",
            ColumnType::Numeric => "number",
        }
    }

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::Categorical => "Categorical",
            ColumnType::Numeric => "Numeric",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single cell of a row or observation.
///
/// Deserializes untagged, so the JSON row `["Sunny", 85, null]` reads as
/// `[Text, Number, Null]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
    Null,
}

impl Value {
    /// Returns true for `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Runtime kind of this value, as used in validation messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Text(_) => "string",
            Value::Null => "null",
        }
    }

    /// The column type this value would imply, if any.
    pub fn column_type(&self) -> Option<ColumnType> {
        match self {
            Value::Number(_) => Some(ColumnType::Numeric),
            Value::Text(_) => Some(ColumnType::Categorical),
            Value::Null => None,
        }
    }

    /// Returns true if this value is acceptable in a column of the given type.
    pub fn matches(&self, column_type: ColumnType) -> bool {
        self.column_type() == Some(column_type)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
            Value::Null => f.write_str("null"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<Category> for Value {
    fn from(value: Category) -> Self {
        match value {
            Category::Text(s) => Value::Text(s),
            Category::Number(n) => Value::Number(n.into_inner()),
        }
    }
}

/// Hashable key form of a non-null value.
///
/// Label values and categorical attribute values are stored under this key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Category {
    Number(OrderedFloat<f64>),
    Text(String),
}

impl Category {
    /// Key for a value, or `None` for `Value::Null`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Category::Number(OrderedFloat(*n))),
            Value::Text(s) => Some(Category::Text(s.clone())),
            Value::Null => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Category::Text(s) => Some(s),
            Category::Number(_) => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Number(n) => write!(f, "{}", n.into_inner()),
            Category::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Category::Text(value.to_string())
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::Text(value)
    }
}

impl From<f64> for Category {
    fn from(value: f64) -> Self {
        Category::Number(OrderedFloat(value))
    }
}

impl PartialEq<&str> for Category {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

/// Build a row of values from heterogeneous literals.
///
/// ```
/// use bayes_table::{row, Value};
///
/// let r = row!["Sunny", 85, null, "Weak"];
/// assert_eq!(r[1], Value::Number(85.0));
/// assert!(r[2].is_null());
/// ```
#[macro_export]
macro_rules! row {
    (@value null) => { $crate::Value::Null };
    (@value $v:expr) => { $crate::Value::from($v) };
    ($($v:tt),* $(,)?) => { vec![$($crate::row!(@value $v)),*] };
}
