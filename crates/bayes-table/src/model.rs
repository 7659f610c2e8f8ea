//! Main NaiveBayes struct and public API.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BayesError, Result};
use crate::prediction::{Prediction, ScoreBreakdown};
use crate::schema::{Category, ColumnType, Dataset, Schema, Value};
use crate::training::{FrequencyTable, ProbabilityTable, TrainedTables, Trainer, TrainerConfig};
use crate::validation;

/// Construction options for a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NaiveBayesConfig {
    /// Ordered, unique column names.
    pub columns: Vec<String>,
    /// Initial rows.
    pub data: Vec<Vec<Value>>,
    /// Position of the label column (None = last).
    pub label_index: Option<usize>,
    /// Explicit column types (None = infer from the first row).
    pub column_types: Option<Vec<ColumnType>>,
    /// Return the full score breakdown from `predict`.
    pub verbose: bool,
    /// Retrain inside `predict` when samples were added since the last fit.
    pub eager_training: bool,
    /// Trim surrounding whitespace from column names.
    pub strip_whitespace: bool,
    /// Training settings.
    #[serde(flatten)]
    pub trainer: TrainerConfig,
}

impl Default for NaiveBayesConfig {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            data: Vec::new(),
            label_index: None,
            column_types: None,
            verbose: false,
            eager_training: true,
            strip_whitespace: true,
            trainer: TrainerConfig::default(),
        }
    }
}

impl NaiveBayesConfig {
    /// Configuration for the given column names, everything else default.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Parse a configuration object from JSON.
    ///
    /// ```
    /// use bayes_table::NaiveBayesConfig;
    ///
    /// let config = NaiveBayesConfig::from_json(
    ///     r#"{"columns": ["outlook", "play"], "data": [["Sunny", "No"]], "verbose": true}"#,
    /// ).unwrap();
    /// assert_eq!(config.columns.len(), 2);
    /// assert!(config.eager_training);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_data(mut self, data: Vec<Vec<Value>>) -> Self {
        self.data = data;
        self
    }

    pub fn with_label_index(mut self, label_index: usize) -> Self {
        self.label_index = Some(label_index);
        self
    }

    pub fn with_column_types(mut self, column_types: Vec<ColumnType>) -> Self {
        self.column_types = Some(column_types);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_eager_training(mut self, eager_training: bool) -> Self {
        self.eager_training = eager_training;
        self
    }

    pub fn with_strip_whitespace(mut self, strip_whitespace: bool) -> Self {
        self.strip_whitespace = strip_whitespace;
        self
    }

    /// Set the variance added to Gaussian likelihoods.
    pub fn with_var_smoothing(mut self, var_smoothing: f64) -> Self {
        self.trainer.var_smoothing = var_smoothing;
        self
    }

    /// Fail training above this many distinct values in a categorical column.
    pub fn with_max_cardinality(mut self, max_cardinality: usize) -> Self {
        self.trainer.max_cardinality = Some(max_cardinality);
        self
    }

    /// Warn during training above this many distinct values in a categorical column.
    pub fn with_cardinality_warning(mut self, threshold: usize) -> Self {
        self.trainer.cardinality_warning = threshold;
        self
    }
}

/// A Naive Bayes classifier over one owned dataset.
///
/// Rows are validated on the way in. Tables are rebuilt from scratch by
/// [`train`](Self::train) and published as a shared snapshot, so a caller
/// holding [`snapshot`](Self::snapshot) never sees a half-built table.
///
/// ```
/// use bayes_table::{row, NaiveBayes, NaiveBayesConfig};
///
/// let config = NaiveBayesConfig::new(["outlook", "windy", "play"]).with_data(vec![
///     row!["Sunny", "No", "Yes"],
///     row!["Rain", "Yes", "No"],
///     row!["Sunny", "Yes", "Yes"],
/// ]);
/// let mut model = NaiveBayes::new(config).unwrap();
///
/// let prediction = model.predict(&row!["Sunny", "Yes"]).unwrap();
/// assert_eq!(prediction.label(), &"Yes");
/// ```
#[derive(Debug)]
pub struct NaiveBayes {
    dataset: Dataset,
    trainer: Trainer,
    verbose: bool,
    eager_training: bool,
    tables: Option<Arc<TrainedTables>>,
    trained_at: Option<DateTime<Utc>>,
    last_sample_added_at: Option<DateTime<Utc>>,
    /// Bumped on every append.
    revision: u64,
    /// `revision` at the last successful training pass.
    trained_revision: Option<u64>,
}

impl NaiveBayes {
    /// Build a model, validating the columns and every initial row.
    ///
    /// # Errors
    ///
    /// - `Schema` for empty or duplicate columns, a bad label index, a
    ///   column type list of the wrong length, a null in the first row
    ///   when types must be inferred, or a negative or non-finite
    ///   `var_smoothing`.
    /// - `Validation` when any initial row does not fit the schema.
    pub fn new(config: NaiveBayesConfig) -> Result<Self> {
        let NaiveBayesConfig {
            columns,
            data,
            label_index,
            column_types,
            verbose,
            eager_training,
            strip_whitespace,
            trainer,
        } = config;

        trainer.validate()?;
        let mut schema = Schema::new(columns, label_index, strip_whitespace)?;

        let column_types = match (column_types, data.first()) {
            (Some(types), _) => Some(types),
            (None, Some(first)) => Some(
                validation::infer_column_types(schema.columns(), first)
                    .map_err(|err| err.for_element(0))?,
            ),
            (None, None) => None,
        };

        if let Some(types) = column_types {
            schema.set_column_types(types)?;
        }
        if let Some(types) = schema.column_types() {
            validation::validate_dataset(schema.columns(), types, &data)?;
        }

        let mut dataset = Dataset::new(schema);
        let revision = data.len() as u64;
        for row in data {
            dataset.push(row);
        }

        debug!(
            columns = dataset.schema().column_count(),
            rows = dataset.len(),
            label = dataset.schema().label_name(),
            "Model constructed"
        );

        Ok(Self {
            dataset,
            trainer: Trainer::with_config(trainer),
            verbose,
            eager_training,
            tables: None,
            trained_at: None,
            last_sample_added_at: None,
            revision,
            trained_revision: None,
        })
    }

    /// Append one labeled row.
    ///
    /// When no column types are known yet, this row establishes them.
    ///
    /// # Errors
    ///
    /// `Validation` listing every problem when the row length or a value type
    /// does not match the schema. The dataset is unchanged on error.
    pub fn add(&mut self, row: Vec<Value>) -> Result<()> {
        let schema = self.dataset.schema();
        let (types, inferred) = match schema.column_types() {
            Some(types) => (types.to_vec(), false),
            None => (validation::infer_column_types(schema.columns(), &row)?, true),
        };

        let violations =
            validation::validate_row(schema.columns(), &types, &row, Default::default());
        if !violations.is_empty() {
            return Err(BayesError::validation(violations));
        }

        if inferred {
            self.dataset.schema_mut().set_column_types(types)?;
        }
        self.dataset.push(row);
        self.revision += 1;
        self.last_sample_added_at = Some(Utc::now());

        debug!(rows = self.dataset.len(), "Sample added");
        Ok(())
    }

    /// Re-check every stored row against the schema.
    pub fn validate(&self) -> Result<()> {
        let schema = self.dataset.schema();
        match schema.column_types() {
            Some(types) => {
                validation::validate_dataset(schema.columns(), types, self.dataset.rows())
            }
            None if self.dataset.is_empty() => Ok(()),
            None => Err(BayesError::Precondition(
                "rows are stored but column types are unknown".to_string(),
            )),
        }
    }

    /// Returns true if every stored row fits the schema.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Rebuild all tables from the current dataset.
    ///
    /// On error the previously published tables stay in place.
    pub fn train(&mut self) -> Result<()> {
        let tables = self.trainer.train(&self.dataset)?;
        self.tables = Some(Arc::new(tables));
        self.trained_at = Some(Utc::now());
        self.trained_revision = Some(self.revision);
        Ok(())
    }

    /// Returns true if rows were added since the last training pass,
    /// or the model was never trained.
    pub fn has_dirty_samples(&self) -> bool {
        let Some(trained_at) = self.trained_at else {
            return true;
        };
        let older = self
            .last_sample_added_at
            .is_some_and(|added| trained_at < added);
        older || self.trained_revision != Some(self.revision)
    }

    /// Classify an observation (attribute values in column order, label omitted).
    ///
    /// Returns the label alone, or the full breakdown when the model is verbose.
    pub fn predict(&mut self, observation: &[Value]) -> Result<Prediction> {
        let breakdown = self.predict_breakdown(observation)?;
        Ok(if self.verbose {
            Prediction::Breakdown(breakdown)
        } else {
            Prediction::Label(breakdown.label)
        })
    }

    /// Classify an observation and return only the label.
    pub fn predict_label(&mut self, observation: &[Value]) -> Result<Category> {
        self.predict_breakdown(observation).map(|b| b.label)
    }

    /// Classify an observation and return every label's score.
    ///
    /// # Errors
    ///
    /// - `Validation` when the observation does not fit the attribute columns.
    /// - `Precondition` when types are unknown, or no tables exist and eager
    ///   training is off.
    /// - `Lookup` when a categorical value was never seen during training.
    pub fn predict_breakdown(&mut self, observation: &[Value]) -> Result<ScoreBreakdown> {
        let schema = self.dataset.schema();
        let types = schema.column_types().ok_or_else(|| {
            BayesError::Precondition(
                "column types are unknown; add a row or supply column types".to_string(),
            )
        })?;

        let violations = validation::validate_observation(schema, types, observation);
        if !violations.is_empty() {
            return Err(BayesError::validation(violations));
        }

        if self.eager_training && self.has_dirty_samples() {
            debug!("Dataset changed since last fit; retraining before prediction");
            self.train()?;
        }

        let tables = self.tables.as_ref().ok_or_else(|| {
            BayesError::Precondition("model has not been trained".to_string())
        })?;
        tables.score(observation)
    }

    /// Shared handle to the current tables, for scoring from other threads.
    pub fn snapshot(&self) -> Option<Arc<TrainedTables>> {
        self.tables.clone()
    }

    pub fn frequencies(&self) -> Option<&FrequencyTable> {
        self.tables.as_deref().map(|t| &t.frequencies)
    }

    pub fn probabilities(&self) -> Option<&ProbabilityTable> {
        self.tables.as_deref().map(|t| &t.probabilities)
    }

    /// Class labels known to the last training pass, in first-seen order.
    pub fn labels(&self) -> Vec<&Category> {
        self.tables
            .as_deref()
            .map(|t| t.labels().collect())
            .unwrap_or_default()
    }

    pub fn schema(&self) -> &Schema {
        self.dataset.schema()
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Get the number of rows.
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    pub fn trained_at(&self) -> Option<DateTime<Utc>> {
        self.trained_at
    }

    pub fn last_sample_added_at(&self) -> Option<DateTime<Utc>> {
        self.last_sample_added_at
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn eager_training(&self) -> bool {
        self.eager_training
    }
}
