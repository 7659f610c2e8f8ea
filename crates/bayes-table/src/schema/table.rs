//! Table-level schema and the owned training dataset.

use serde::{Deserialize, Serialize};

use crate::error::{BayesError, Result};
use crate::validation;

use super::types::{Category, ColumnType, Value};

/// Column declaration for a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Unique column names, in row order.
    columns: Vec<String>,
    /// Position of the label column.
    label_index: usize,
    /// Per-column type tags, once supplied or inferred.
    #[serde(skip_serializing_if = "Option::is_none")]
    column_types: Option<Vec<ColumnType>>,
}

impl Schema {
    /// Create a schema, checking names and the label position.
    ///
    /// `label_index` defaults to the last column. With `strip_whitespace`,
    /// surrounding whitespace is trimmed from every name before the
    /// uniqueness check.
    pub fn new(
        columns: Vec<String>,
        label_index: Option<usize>,
        strip_whitespace: bool,
    ) -> Result<Self> {
        let columns: Vec<String> = if strip_whitespace {
            columns.into_iter().map(|c| c.trim().to_string()).collect()
        } else {
            columns
        };

        validation::validate_schema(&columns)?;

        let label_index = label_index.unwrap_or(columns.len() - 1);
        if label_index >= columns.len() {
            return Err(BayesError::Schema(format!(
                "label index {} is out of range for {} columns",
                label_index,
                columns.len()
            )));
        }

        Ok(Self {
            columns,
            label_index,
            column_types: None,
        })
    }

    /// Attach explicit column types.
    pub fn with_column_types(mut self, column_types: Vec<ColumnType>) -> Result<Self> {
        self.set_column_types(column_types)?;
        Ok(self)
    }

    pub(crate) fn set_column_types(&mut self, column_types: Vec<ColumnType>) -> Result<()> {
        if column_types.len() != self.columns.len() {
            return Err(BayesError::Schema(format!(
                "expected {} column types, got {}",
                self.columns.len(),
                column_types.len()
            )));
        }
        self.column_types = Some(column_types);
        Ok(())
    }

    /// Get all column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn label_index(&self) -> usize {
        self.label_index
    }

    pub fn label_name(&self) -> &str {
        &self.columns[self.label_index]
    }

    /// Column type tags, if known yet.
    pub fn column_types(&self) -> Option<&[ColumnType]> {
        self.column_types.as_deref()
    }

    /// Positions of every column except the label, in row order.
    pub fn attribute_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.columns.len()).filter(move |&i| i != self.label_index)
    }

    /// Names of every column except the label, in row order.
    pub fn attribute_names(&self) -> Vec<&str> {
        self.attribute_indices()
            .map(|i| self.columns[i].as_str())
            .collect()
    }
}

/// A schema together with the rows it governs.
///
/// Rows only enter through validated paths on the model, so every stored row
/// has the column count and value types the schema declares.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    schema: Schema,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    /// Create an empty dataset for a schema.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub(crate) fn schema_mut(&mut self) -> &mut Schema {
        &mut self.schema
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Get the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Label key of every row, in row order.
    pub fn labels(&self) -> impl Iterator<Item = Option<Category>> + '_ {
        self.column_values(self.schema.label_index())
            .map(Category::from_value)
    }

    pub(crate) fn push(&mut self, row: Vec<Value>) {
        self.rows.push(row);
    }
}
