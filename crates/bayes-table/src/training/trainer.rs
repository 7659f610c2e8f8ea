//! Builds frequency and probability tables from a dataset.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{BayesError, Result};
use crate::schema::{Category, ColumnType, Dataset};

use super::frequency::{AttributeFrequencies, FrequencyTable};
use super::probability::ProbabilityTable;

/// Default distinct-value count above which a categorical column is flagged.
pub const DEFAULT_CARDINALITY_WARNING: usize = 1000;

/// Default variance added to every Gaussian at scoring time.
pub const DEFAULT_VAR_SMOOTHING: f64 = 1e-9;

/// Training configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Log a warning when a categorical column has more distinct values.
    pub cardinality_warning: usize,
    /// Fail training when a categorical column has more distinct values.
    pub max_cardinality: Option<usize>,
    /// Added to Gaussian variances when scoring.
    pub var_smoothing: f64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            cardinality_warning: DEFAULT_CARDINALITY_WARNING,
            max_cardinality: None,
            var_smoothing: DEFAULT_VAR_SMOOTHING,
        }
    }
}

impl TrainerConfig {
    /// Reject settings that would make scores meaningless.
    pub fn validate(&self) -> Result<()> {
        if !self.var_smoothing.is_finite() || self.var_smoothing < 0.0 {
            return Err(BayesError::Schema(format!(
                "var_smoothing must be a finite, non-negative number, got {}",
                self.var_smoothing
            )));
        }
        Ok(())
    }
}

/// The output of one training pass.
///
/// Immutable once built; the model publishes it behind an `Arc` so readers
/// can keep scoring against it while a new pass runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainedTables {
    pub frequencies: FrequencyTable,
    pub probabilities: ProbabilityTable,
    /// Variance smoothing used when scoring numeric attributes.
    pub var_smoothing: f64,
    /// Attribute column names, in observation order.
    pub attribute_columns: Vec<String>,
    /// Type tag of each attribute column.
    pub attribute_types: Vec<ColumnType>,
}

impl TrainedTables {
    /// Class labels, in first-seen order.
    pub fn labels(&self) -> impl Iterator<Item = &Category> {
        self.probabilities.labels.keys()
    }
}

/// Computes tables from a validated dataset. Always a full rebuild.
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TrainerConfig) -> Self {
        Self { config }
    }

    /// Build fresh tables for the dataset.
    ///
    /// # Errors
    ///
    /// - `Schema` when the configuration is invalid.
    /// - `Precondition` when column types are unknown (empty dataset, no explicit types).
    /// - `Cardinality` when a categorical column exceeds `max_cardinality`.
    pub fn train(&self, dataset: &Dataset) -> Result<TrainedTables> {
        self.config.validate()?;
        let schema = dataset.schema();
        let column_types = schema.column_types().ok_or_else(|| {
            BayesError::Precondition(
                "cannot train on an empty dataset without explicit column types".to_string(),
            )
        })?;

        let mut labels: IndexMap<Category, usize> = IndexMap::new();
        for label in dataset.labels().flatten() {
            *labels.entry(label).or_insert(0) += 1;
        }

        let mut attributes = IndexMap::new();
        let mut attribute_types = Vec::new();
        for index in schema.attribute_indices() {
            let name = &schema.columns()[index];
            attribute_types.push(column_types[index]);
            let counts = match column_types[index] {
                ColumnType::Categorical => self.count_categorical(dataset, index, name, &labels)?,
                ColumnType::Numeric => collect_numeric(dataset, index, &labels),
            };
            attributes.insert(name.clone(), counts);
        }

        let frequencies = FrequencyTable {
            total: dataset.len(),
            labels,
            attributes,
        };
        let probabilities = ProbabilityTable::from_frequencies(&frequencies);

        info!(
            rows = frequencies.total,
            labels = frequencies.labels.len(),
            attributes = frequencies.attributes.len(),
            "Training pass complete"
        );

        Ok(TrainedTables {
            attribute_columns: frequencies.attributes.keys().cloned().collect(),
            attribute_types,
            frequencies,
            probabilities,
            var_smoothing: self.config.var_smoothing,
        })
    }

    /// value -> label -> count for one categorical column.
    fn count_categorical(
        &self,
        dataset: &Dataset,
        index: usize,
        name: &str,
        labels: &IndexMap<Category, usize>,
    ) -> Result<AttributeFrequencies> {
        let label_index = dataset.schema().label_index();
        let mut counts: IndexMap<Category, IndexMap<Category, usize>> = IndexMap::new();

        for row in dataset.rows() {
            let (Some(value), Some(label)) = (
                Category::from_value(&row[index]),
                Category::from_value(&row[label_index]),
            ) else {
                continue;
            };

            let by_label = counts
                .entry(value)
                .or_insert_with(|| labels.keys().map(|l| (l.clone(), 0)).collect());
            if let Some(count) = by_label.get_mut(&label) {
                *count += 1;
            }
        }

        let distinct = counts.len();
        if let Some(limit) = self.config.max_cardinality {
            if distinct > limit {
                return Err(BayesError::Cardinality {
                    column: name.to_string(),
                    distinct,
                    limit,
                });
            }
        }
        if distinct > self.config.cardinality_warning {
            warn!(
                column = name,
                distinct,
                threshold = self.config.cardinality_warning,
                "High-cardinality categorical column; scoring tables grow with values x labels"
            );
        }

        debug!(column = name, distinct, "Counted categorical column");
        Ok(AttributeFrequencies::Categorical(counts))
    }
}

/// label -> values for one numeric column.
fn collect_numeric(
    dataset: &Dataset,
    index: usize,
    labels: &IndexMap<Category, usize>,
) -> AttributeFrequencies {
    let label_index = dataset.schema().label_index();
    let mut samples: IndexMap<Category, Vec<f64>> = labels
        .iter()
        .map(|(label, &count)| (label.clone(), Vec::with_capacity(count)))
        .collect();

    for row in dataset.rows() {
        let (Some(value), Some(label)) = (row[index].as_f64(), Category::from_value(&row[label_index]))
        else {
            continue;
        };
        if let Some(values) = samples.get_mut(&label) {
            values.push(value);
        }
    }

    AttributeFrequencies::Numeric(samples)
}
