//! Dataset validation: schema, row and observation checks.

mod validators;
mod violation;

pub use validators::{
    ColumnCountRule, FiniteNumberRule, RowContext, RowOptions, RowRule, RowValidator, TypeRule,
    infer_column_types, validate_dataset, validate_observation, validate_row, validate_schema,
};
pub use violation::{Violation, ViolationKind};
