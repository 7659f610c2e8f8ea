//! bayes-table: Naive Bayes classification over mixed tabular data.
//!
//! A model owns one dataset of labeled rows. Categorical attributes are
//! scored with Laplace-smoothed frequencies, numeric attributes with a
//! per-label Gaussian density, and the label with the highest unnormalized
//! posterior wins.
//!
//! # Core Principles
//!
//! - **Validated input**: every row is checked against the schema before it
//!   can take part in training, and every violation is reported at once
//! - **Full rebuilds**: training recomputes all tables from scratch
//! - **Lazy or eager**: prediction retrains stale tables unless told not to
//!
//! # Example
//!
//! ```
//! use bayes_table::{row, NaiveBayes, NaiveBayesConfig};
//!
//! let config = NaiveBayesConfig::new(["weather", "temperature", "play?"]).with_data(vec![
//!     row!["Sunny", 85, "No"],
//!     row!["Overcast", 83, "Yes"],
//!     row!["Rain", 70, "Yes"],
//!     row!["Sunny", 72, "No"],
//! ]);
//!
//! let mut model = NaiveBayes::new(config).unwrap();
//! model.train().unwrap();
//!
//! let label = model.predict_label(&row!["Sunny", 80]).unwrap();
//! assert_eq!(label, "No");
//! ```

pub mod error;
pub mod prediction;
pub mod schema;
pub mod training;
pub mod validation;

mod model;

pub use crate::model::{NaiveBayes, NaiveBayesConfig};
pub use error::{BayesError, Result};
pub use prediction::{Prediction, ScoreBreakdown, Scorer};
pub use schema::{Category, ColumnType, Dataset, Schema, Value};
pub use training::{FrequencyTable, Gaussian, ProbabilityTable, TrainedTables, TrainerConfig};
pub use validation::{RowOptions, Violation, ViolationKind};
