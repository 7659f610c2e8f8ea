//! Violation records produced by row validation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of schema violation detected in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Row length differs from the column count.
    ColumnCount,
    /// Value's runtime type differs from the declared column type.
    TypeMismatch,
    /// Numeric value is NaN or infinite.
    NonFinite,
}

/// A single problem found in a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Kind of problem.
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    /// Affected column name, when the problem is tied to one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Affected position in the row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// Human-readable description.
    pub description: String,
}

impl Violation {
    /// Row length mismatch.
    pub fn column_count(expected: usize, actual: usize) -> Self {
        Self {
            kind: ViolationKind::ColumnCount,
            column: None,
            index: None,
            description: format!(
                "Expected number of columns is {}, but sample has {}",
                expected, actual
            ),
        }
    }

    /// Runtime type mismatch at a position.
    pub fn type_mismatch(column: &str, index: usize, expected: &str, actual: &str) -> Self {
        Self {
            kind: ViolationKind::TypeMismatch,
            column: Some(column.to_string()),
            index: Some(index),
            description: format!(
                "Expected type of attribute {} at index {} to be {} but is {}",
                column, index, expected, actual
            ),
        }
    }

    /// NaN or infinite number at a position.
    pub fn non_finite(column: &str, index: usize, value: f64) -> Self {
        Self {
            kind: ViolationKind::NonFinite,
            column: Some(column.to_string()),
            index: Some(index),
            description: format!(
                "Expected attribute {} at index {} to be a finite number but is {}",
                column, index, value
            ),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_count_description() {
        let v = Violation::column_count(5, 3);
        assert_eq!(v.kind, ViolationKind::ColumnCount);
        assert_eq!(v.to_string(), "Expected number of columns is 5, but sample has 3");
        assert!(v.column.is_none());
    }

    #[test]
    fn test_type_mismatch_description() {
        let v = Violation::type_mismatch("temperature", 1, "number", "string");
        assert_eq!(v.column.as_deref(), Some("temperature"));
        assert_eq!(v.index, Some(1));
        assert_eq!(
            v.to_string(),
            "Expected type of attribute temperature at index 1 to be number but is string"
        );
    }
}
