//! Error types for the bayes-table library.

use thiserror::Error;

/// Main error type for model construction, training and prediction.
#[derive(Debug, Error)]
pub enum BayesError {
    /// Malformed column declaration (empty, duplicate names, bad label index).
    #[error("SchemaError: {0}")]
    Schema(String),

    /// Row or observation shape/type mismatch. Carries every violation found.
    #[error("ValidationError: {}", violations.join(", "))]
    Validation { violations: Vec<String> },

    /// Operation attempted without the state it needs (column types, tables).
    #[error("PreconditionError: {0}")]
    Precondition(String),

    /// A categorical value was never observed for its column during training.
    #[error("LookupError: value '{value}' of attribute '{column}' was never seen during training")]
    Lookup { column: String, value: String },

    /// A categorical column exceeded the configured distinct-value bound.
    #[error("CardinalityError: column '{column}' has {distinct} distinct values (limit {limit})")]
    Cardinality {
        column: String,
        distinct: usize,
        limit: usize,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BayesError {
    /// Build a validation error from anything displayable.
    pub fn validation<I, T>(violations: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        BayesError::Validation {
            violations: violations.into_iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Prefix a validation error with the dataset row it came from.
    ///
    /// Other error kinds pass through unchanged.
    pub fn for_element(self, index: usize) -> Self {
        match self {
            BayesError::Validation { violations } => {
                let mut messages = Vec::with_capacity(violations.len() + 1);
                messages.push(format!("Element at index {} has errors", index));
                messages.extend(violations);
                BayesError::Validation {
                    violations: messages,
                }
            }
            other => other,
        }
    }
}

/// Result type alias for bayes-table operations.
pub type Result<T> = std::result::Result<T, BayesError>;
