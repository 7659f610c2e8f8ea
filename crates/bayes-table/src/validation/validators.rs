//! Schema and row validation.
//!
//! Row checks never stop at the first problem: every rule runs and every
//! violation is reported, so a caller can fix a row in one round trip.

use std::collections::HashSet;

use crate::error::{BayesError, Result};
use crate::schema::{ColumnType, Schema, Value};

use super::violation::Violation;

/// Options for a single row check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowOptions {
    /// Accept `Value::Null` at any position. Only prediction sets this.
    pub allow_null: bool,
}

impl RowOptions {
    /// Options that accept nulls.
    pub fn allowing_null() -> Self {
        Self { allow_null: true }
    }
}

/// What a rule sees of the columns a row is checked against.
#[derive(Debug, Clone, Copy)]
pub struct RowContext<'a> {
    pub columns: &'a [String],
    pub column_types: &'a [ColumnType],
    pub options: RowOptions,
}

/// Trait for row rules.
pub trait RowRule {
    /// Check a row and return every violation found.
    fn check(&self, ctx: &RowContext<'_>, row: &[Value]) -> Vec<Violation>;
}

/// Row length must equal the column count.
pub struct ColumnCountRule;

impl RowRule for ColumnCountRule {
    fn check(&self, ctx: &RowContext<'_>, row: &[Value]) -> Vec<Violation> {
        if row.len() == ctx.columns.len() {
            Vec::new()
        } else {
            vec![Violation::column_count(ctx.columns.len(), row.len())]
        }
    }
}

/// Each value's runtime type must match its column type.
pub struct TypeRule;

impl RowRule for TypeRule {
    fn check(&self, ctx: &RowContext<'_>, row: &[Value]) -> Vec<Violation> {
        let mut violations = Vec::new();

        for (index, (value, column_type)) in row.iter().zip(ctx.column_types).enumerate() {
            if value.is_null() && ctx.options.allow_null {
                continue;
            }
            if !value.matches(*column_type) {
                let column = ctx.columns.get(index).map(String::as_str).unwrap_or("?");
                violations.push(Violation::type_mismatch(
                    column,
                    index,
                    column_type.value_kind(),
                    value.kind(),
                ));
            }
        }

        violations
    }
}

/// Numbers in numeric columns must be finite.
pub struct FiniteNumberRule;

impl RowRule for FiniteNumberRule {
    fn check(&self, ctx: &RowContext<'_>, row: &[Value]) -> Vec<Violation> {
        row.iter()
            .zip(ctx.column_types)
            .enumerate()
            .filter_map(|(index, (value, column_type))| match value {
                Value::Number(n) if column_type.is_numeric() && !n.is_finite() => {
                    let column = ctx.columns.get(index).map(String::as_str).unwrap_or("?");
                    Some(Violation::non_finite(column, index, *n))
                }
                _ => None,
            })
            .collect()
    }
}

/// Runs every row rule and collects the violations in rule order.
pub struct RowValidator {
    rules: Vec<Box<dyn RowRule>>,
}

impl RowValidator {
    /// Create a validator with all default rules.
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(ColumnCountRule),
                Box::new(TypeRule),
                Box::new(FiniteNumberRule),
            ],
        }
    }

    /// Run all rules against a row.
    pub fn check(&self, ctx: &RowContext<'_>, row: &[Value]) -> Vec<Violation> {
        self.rules
            .iter()
            .flat_map(|rule| rule.check(ctx, row))
            .collect()
    }
}

impl Default for RowValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Check a column declaration: non-empty, unique names.
pub fn validate_schema(columns: &[String]) -> Result<()> {
    if columns.is_empty() {
        return Err(BayesError::Schema(
            "missing required argument: columns".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    let mut duplicates: Vec<&str> = Vec::new();
    for name in columns {
        if !seen.insert(name.as_str()) && !duplicates.contains(&name.as_str()) {
            duplicates.push(name);
        }
    }

    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(BayesError::Schema(format!(
            "duplicate column names: {}",
            duplicates.join(", ")
        )))
    }
}

/// Derive one type tag per column from the runtime types of a first row.
pub fn infer_column_types(columns: &[String], first_row: &[Value]) -> Result<Vec<ColumnType>> {
    if first_row.len() != columns.len() {
        return Err(BayesError::validation([Violation::column_count(
            columns.len(),
            first_row.len(),
        )]));
    }

    columns
        .iter()
        .zip(first_row)
        .map(|(name, value)| {
            value.column_type().ok_or_else(|| {
                BayesError::Schema(format!(
                    "cannot infer the type of column '{}' from a null value",
                    name
                ))
            })
        })
        .collect()
}

/// Check one row. Pure; returns every violation, empty when valid.
pub fn validate_row(
    columns: &[String],
    column_types: &[ColumnType],
    row: &[Value],
    options: RowOptions,
) -> Vec<Violation> {
    let ctx = RowContext {
        columns,
        column_types,
        options,
    };
    RowValidator::new().check(&ctx, row)
}

/// Check every row; fail on the first row with violations.
pub fn validate_dataset(
    columns: &[String],
    column_types: &[ColumnType],
    rows: &[Vec<Value>],
) -> Result<()> {
    let validator = RowValidator::new();
    let ctx = RowContext {
        columns,
        column_types,
        options: RowOptions::default(),
    };

    for (index, row) in rows.iter().enumerate() {
        let violations = validator.check(&ctx, row);
        if !violations.is_empty() {
            return Err(BayesError::validation(violations).for_element(index));
        }
    }

    Ok(())
}

/// Check an unlabeled observation against the attribute columns, allowing nulls.
pub fn validate_observation(
    schema: &Schema,
    column_types: &[ColumnType],
    observation: &[Value],
) -> Vec<Violation> {
    let (columns, types): (Vec<String>, Vec<ColumnType>) = schema
        .attribute_indices()
        .map(|i| (schema.columns()[i].clone(), column_types[i]))
        .unzip();

    validate_row(&columns, &types, observation, RowOptions::allowing_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;
    use crate::validation::ViolationKind;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn weather_types() -> Vec<ColumnType> {
        vec![
            ColumnType::Categorical,
            ColumnType::Numeric,
            ColumnType::Numeric,
            ColumnType::Categorical,
            ColumnType::Categorical,
        ]
    }

    fn weather_columns() -> Vec<String> {
        names(&["weather", "temperature", "humidity", "wind", "play?"])
    }

    #[test]
    fn test_empty_columns_rejected() {
        assert!(matches!(validate_schema(&[]), Err(BayesError::Schema(_))));
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let err = validate_schema(&names(&["a", "b", "a", "b", "a"])).unwrap_err();
        assert_eq!(err.to_string(), "SchemaError: duplicate column names: a, b");
    }

    #[test]
    fn test_unique_columns_accepted() {
        assert!(validate_schema(&names(&["a", "b", "c"])).is_ok());
    }

    #[test]
    fn test_infer_column_types_from_first_row() {
        let types = infer_column_types(&weather_columns(), &row!["Sunny", 85, 85, "Weak", "No"]).unwrap();
        assert_eq!(types, weather_types());
    }

    #[test]
    fn test_infer_column_types_rejects_null() {
        let result = infer_column_types(&weather_columns(), &row!["Sunny", null, 85, "Weak", "No"]);
        assert!(matches!(result, Err(BayesError::Schema(_))));
    }

    #[test]
    fn test_valid_row_has_no_violations() {
        let violations = validate_row(
            &weather_columns(),
            &weather_types(),
            &row!["Rain", 71, 91, "Strong", "No"],
            RowOptions::default(),
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_short_row_reports_length() {
        let violations = validate_row(
            &weather_columns(),
            &weather_types(),
            &row!["Rain", 71, 91],
            RowOptions::default(),
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::ColumnCount);
    }

    #[test]
    fn test_collects_every_violation() {
        let violations = validate_row(
            &weather_columns(),
            &weather_types(),
            &row!["Sunny", "95", "Weak", "No"],
            RowOptions::default(),
        );
        let kinds: Vec<_> = violations.iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ViolationKind::ColumnCount,
                ViolationKind::TypeMismatch,
                ViolationKind::TypeMismatch,
            ]
        );
        assert_eq!(violations[1].index, Some(1));
        assert_eq!(violations[2].index, Some(2));
    }

    #[test]
    fn test_null_rejected_unless_allowed() {
        let columns = names(&["weather", "temperature"]);
        let types = vec![ColumnType::Categorical, ColumnType::Numeric];
        let row = row!["Sunny", null];

        let strict = validate_row(&columns, &types, &row, RowOptions::default());
        assert_eq!(strict.len(), 1);
        assert!(strict[0].to_string().ends_with("to be number but is null"));

        let lenient = validate_row(&columns, &types, &row, RowOptions::allowing_null());
        assert!(lenient.is_empty());
    }

    #[test]
    fn test_non_finite_number_rejected() {
        let columns = names(&["x", "label"]);
        let types = vec![ColumnType::Numeric, ColumnType::Categorical];
        let violations = validate_row(&columns, &types, &row![(f64::NAN), "a"], RowOptions::default());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::NonFinite);
    }

    #[test]
    fn test_dataset_reports_offending_row() {
        let rows = vec![
            row!["Rain", 71, 91, "Strong", "No"],
            row!["Sunny", "95", "Weak", "No"],
        ];
        let err = validate_dataset(&weather_columns(), &weather_types(), &rows).unwrap_err();
        match err {
            BayesError::Validation { violations } => {
                assert_eq!(violations[0], "Element at index 1 has errors");
                assert_eq!(violations.len(), 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_observation_checked_against_attributes_only() {
        let schema = Schema::new(weather_columns(), None, true).unwrap();
        let types = weather_types();

        assert!(validate_observation(&schema, &types, &row!["Sunny", 66, 90, "Strong"]).is_empty());
        assert!(validate_observation(&schema, &types, &row!["Sunny", null, 90, null]).is_empty());

        let violations = validate_observation(&schema, &types, &row!["Sunny", 66, 90, "Strong", "No"]);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].to_string(), "Expected number of columns is 4, but sample has 5");
    }
}
