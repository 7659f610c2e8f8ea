//! Frequency tables: raw counts and per-label numeric samples.

use indexmap::IndexMap;
use serde::Serialize;

use crate::schema::Category;

/// Counts gathered for one attribute column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "counts", rename_all = "snake_case")]
pub enum AttributeFrequencies {
    /// attribute value -> label -> co-occurrence count.
    ///
    /// Every label has an entry under every value, zero when never seen together.
    Categorical(IndexMap<Category, IndexMap<Category, usize>>),
    /// label -> values of the column in rows carrying that label.
    Numeric(IndexMap<Category, Vec<f64>>),
}

impl AttributeFrequencies {
    /// Number of distinct values seen, for categorical columns.
    pub fn distinct_values(&self) -> Option<usize> {
        match self {
            AttributeFrequencies::Categorical(counts) => Some(counts.len()),
            AttributeFrequencies::Numeric(_) => None,
        }
    }

    /// Co-occurrence count of a categorical value with a label.
    pub fn count(&self, value: &Category, label: &Category) -> Option<usize> {
        match self {
            AttributeFrequencies::Categorical(counts) => {
                counts.get(value).and_then(|by_label| by_label.get(label)).copied()
            }
            AttributeFrequencies::Numeric(_) => None,
        }
    }

    /// Values observed with a label, for numeric columns.
    pub fn samples(&self, label: &Category) -> Option<&[f64]> {
        match self {
            AttributeFrequencies::Numeric(samples) => samples.get(label).map(Vec::as_slice),
            AttributeFrequencies::Categorical(_) => None,
        }
    }
}

/// Counts for the whole dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrequencyTable {
    /// Number of rows counted.
    pub total: usize,
    /// label -> occurrence count, in first-seen order.
    pub labels: IndexMap<Category, usize>,
    /// Attribute column name -> counts, in column order.
    pub attributes: IndexMap<String, AttributeFrequencies>,
}

impl FrequencyTable {
    pub fn label_count(&self, label: &Category) -> usize {
        self.labels.get(label).copied().unwrap_or(0)
    }

    pub fn attribute(&self, column: &str) -> Option<&AttributeFrequencies> {
        self.attributes.get(column)
    }
}
