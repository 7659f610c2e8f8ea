//! Posterior scoring of unlabeled observations.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::error::{BayesError, Result};
use crate::schema::{Category, Value};
use crate::training::{AttributeProbabilities, TrainedTables};
use crate::validation::{validate_row, RowOptions};

/// Every label's raw score together with the winner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    /// Label with the highest score.
    pub label: Category,
    /// Unnormalized score per label, in first-seen label order.
    pub scores: IndexMap<Category, f64>,
}

/// Result of `predict`: the label alone, or the label with every score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Prediction {
    Label(Category),
    Breakdown(ScoreBreakdown),
}

impl Prediction {
    /// The winning label.
    pub fn label(&self) -> &Category {
        match self {
            Prediction::Label(label) => label,
            Prediction::Breakdown(breakdown) => &breakdown.label,
        }
    }

    /// Per-label scores, when the breakdown was requested.
    pub fn scores(&self) -> Option<&IndexMap<Category, f64>> {
        match self {
            Prediction::Label(_) => None,
            Prediction::Breakdown(breakdown) => Some(&breakdown.scores),
        }
    }

    pub fn into_label(self) -> Category {
        match self {
            Prediction::Label(label) => label,
            Prediction::Breakdown(breakdown) => breakdown.label,
        }
    }
}

/// Scores observations against one set of trained tables.
///
/// An observation lists the attribute columns in schema order, label column
/// omitted. `Value::Null` drops that attribute from every label's product.
pub struct Scorer<'a> {
    tables: &'a TrainedTables,
}

impl<'a> Scorer<'a> {
    pub fn new(tables: &'a TrainedTables) -> Self {
        Self { tables }
    }

    /// Unnormalized score for every label.
    ///
    /// # Errors
    ///
    /// - `Validation` listing every length, type or non-finite problem in
    ///   the observation.
    /// - `Lookup` when a categorical value was never seen for its column.
    /// - `Precondition` when the tables hold no labels.
    pub fn scores(&self, observation: &[Value]) -> Result<IndexMap<Category, f64>> {
        let probabilities = &self.tables.probabilities;

        let violations = validate_row(
            &self.tables.attribute_columns,
            &self.tables.attribute_types,
            observation,
            RowOptions::allowing_null(),
        );
        if !violations.is_empty() {
            return Err(BayesError::validation(violations));
        }
        if probabilities.labels.is_empty() {
            return Err(BayesError::Precondition(
                "no class labels have been observed".to_string(),
            ));
        }

        let mut scores: IndexMap<Category, f64> = probabilities
            .labels
            .iter()
            .map(|(label, prior)| (label.clone(), 1.0 * prior))
            .collect();

        for ((column, distribution), value) in probabilities.attributes.iter().zip(observation) {
            if value.is_null() {
                continue;
            }

            match distribution {
                AttributeProbabilities::Categorical(table) => {
                    let by_label = Category::from_value(value)
                        .and_then(|key| table.get(&key))
                        .ok_or_else(|| BayesError::Lookup {
                            column: column.clone(),
                            value: value.to_string(),
                        })?;
                    for (label, score) in scores.iter_mut() {
                        *score *= by_label.get(label).copied().unwrap_or(0.0);
                    }
                }
                AttributeProbabilities::Numeric(gaussians) => {
                    let Some(x) = value.as_f64() else {
                        continue;
                    };
                    for (label, score) in scores.iter_mut() {
                        *score *= gaussians
                            .get(label)
                            .map(|g| g.density(x, self.tables.var_smoothing))
                            .unwrap_or(0.0);
                    }
                }
            }
        }

        Ok(scores)
    }

    /// Scores plus the winning label.
    ///
    /// Ties go to the label seen first in the dataset.
    pub fn breakdown(&self, observation: &[Value]) -> Result<ScoreBreakdown> {
        let scores = self.scores(observation)?;

        let mut best: Option<(&Category, f64)> = None;
        for (label, &score) in &scores {
            // NaN ranks below every real score.
            let score = if score.is_nan() { f64::NEG_INFINITY } else { score };
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((label, score)),
            }
        }

        let label = best
            .map(|(label, _)| label.clone())
            .ok_or_else(|| BayesError::Precondition("no class labels have been observed".to_string()))?;

        debug!(label = %label, candidates = scores.len(), "Scored observation");
        Ok(ScoreBreakdown { label, scores })
    }

    /// The winning label only.
    pub fn label(&self, observation: &[Value]) -> Result<Category> {
        self.breakdown(observation).map(|b| b.label)
    }
}

impl TrainedTables {
    /// Score an observation against these tables.
    pub fn score(&self, observation: &[Value]) -> Result<ScoreBreakdown> {
        Scorer::new(self).breakdown(observation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;
    use crate::schema::{ColumnType, Dataset, Schema};
    use crate::training::{Trainer, TrainerConfig};

    fn tables(types: Vec<ColumnType>, rows: Vec<Vec<Value>>) -> TrainedTables {
        let schema = Schema::new(vec!["a".into(), "b".into(), "label".into()], None, true)
            .unwrap()
            .with_column_types(types)
            .unwrap();
        let mut dataset = Dataset::new(schema);
        for row in rows {
            dataset.push(row);
        }
        Trainer::new().train(&dataset).unwrap()
    }

    fn categorical() -> TrainedTables {
        tables(
            vec![ColumnType::Categorical; 3],
            vec![
                row!["x", "p", "A"],
                row!["x", "q", "A"],
                row!["y", "q", "B"],
                row!["y", "p", "B"],
            ],
        )
    }

    #[test]
    fn test_scores_are_prior_times_likelihoods() {
        let t = categorical();
        let scores = Scorer::new(&t).scores(&row!["x", "p"]).unwrap();
        // A: 0.5 * (2+1)/(2+2) * (1+1)/(2+2); B: 0.5 * (0+1)/(2+2) * (1+1)/(2+2)
        assert!((scores[&Category::from("A")] - 0.5 * 0.75 * 0.5).abs() < 1e-12);
        assert!((scores[&Category::from("B")] - 0.5 * 0.25 * 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_null_attribute_is_identity() {
        let t = categorical();
        let with_null = Scorer::new(&t).scores(&row!["x", null]).unwrap();
        assert!((with_null[&Category::from("A")] - 0.5 * 0.75).abs() < 1e-12);
        assert!((with_null[&Category::from("B")] - 0.5 * 0.25).abs() < 1e-12);

        let all_null = Scorer::new(&t).scores(&row![null, null]).unwrap();
        assert_eq!(all_null[&Category::from("A")], 0.5);
    }

    #[test]
    fn test_tie_goes_to_first_seen_label() {
        let t = categorical();
        // "p" is seen once with each label, so only the equal priors remain.
        let breakdown = Scorer::new(&t).breakdown(&row![null, "p"]).unwrap();
        assert_eq!(breakdown.scores[&Category::from("A")], breakdown.scores[&Category::from("B")]);
        assert_eq!(breakdown.label, "A");
    }

    #[test]
    fn test_unseen_value_is_lookup_error() {
        let t = categorical();
        let err = Scorer::new(&t).label(&row!["z", "p"]).unwrap_err();
        match err {
            BayesError::Lookup { column, value } => {
                assert_eq!(column, "a");
                assert_eq!(value, "z");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wrong_length_is_validation_error() {
        let t = categorical();
        let err = Scorer::new(&t).scores(&row!["x"]).unwrap_err();
        assert!(matches!(err, BayesError::Validation { .. }));
    }

    #[test]
    fn test_numeric_attribute_uses_density() {
        let t = tables(
            vec![ColumnType::Numeric, ColumnType::Categorical, ColumnType::Categorical],
            vec![
                row![1.0, "p", "low"],
                row![2.0, "p", "low"],
                row![3.0, "p", "low"],
                row![10.0, "p", "high"],
                row![11.0, "p", "high"],
                row![12.0, "p", "high"],
            ],
        );
        let scorer = Scorer::new(&t);
        assert_eq!(scorer.label(&row![2.5, "p"]).unwrap(), "low");
        assert_eq!(scorer.label(&row![10.5, null]).unwrap(), "high");

        let err = scorer.scores(&row!["2.5", "p"]).unwrap_err();
        assert!(matches!(err, BayesError::Validation { .. }));
    }

    #[test]
    fn test_observation_violations_are_aggregated() {
        let t = tables(
            vec![ColumnType::Categorical, ColumnType::Numeric, ColumnType::Categorical],
            vec![row!["p", 1.0, "A"], row!["q", 2.0, "B"]],
        );
        let err = Scorer::new(&t).scores(&row![3, "zz"]).unwrap_err();
        match err {
            BayesError::Validation { violations } => {
                assert_eq!(violations.len(), 2);
                assert!(violations[0].contains("attribute a at index 0 to be string"));
                assert!(violations[1].contains("attribute b at index 1 to be number"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_finite_observation_rejected() {
        let t = tables(
            vec![ColumnType::Categorical, ColumnType::Numeric, ColumnType::Categorical],
            vec![row!["p", 1.0, "A"], row!["q", 2.0, "B"]],
        );
        let observation = vec![Value::from("p"), Value::from(f64::NAN)];
        assert!(matches!(
            t.score(&observation),
            Err(BayesError::Validation { .. })
        ));
    }

    #[test]
    fn test_nan_score_never_wins() {
        let schema = Schema::new(vec!["x".into(), "y".into(), "label".into()], None, true)
            .unwrap()
            .with_column_types(vec![ColumnType::Numeric, ColumnType::Numeric, ColumnType::Categorical])
            .unwrap();
        let mut dataset = Dataset::new(schema);
        dataset.push(row![1.0, 1.0, "a"]);
        dataset.push(row![5.0, 5.0, "b"]);
        dataset.push(row![6.0, 6.0, "b"]);
        let t = Trainer::with_config(TrainerConfig {
            var_smoothing: 0.0,
            ..TrainerConfig::default()
        })
        .train(&dataset)
        .unwrap();

        // "a" has no spread: infinite density on x, zero on y.
        let breakdown = t.score(&row![1.0, 2.0]).unwrap();
        assert!(breakdown.scores[&Category::from("a")].is_nan());
        assert_eq!(breakdown.label, "b");
    }

    #[test]
    fn test_prediction_accessors() {
        let breakdown = categorical().score(&row!["y", "q"]).unwrap();
        let verbose = Prediction::Breakdown(breakdown.clone());
        let terse = Prediction::Label(breakdown.label.clone());

        assert_eq!(verbose.label(), &Category::from("B"));
        assert_eq!(terse.label(), verbose.label());
        assert!(terse.scores().is_none());
        assert_eq!(verbose.scores().map(|s| s.len()), Some(2));
        assert_eq!(terse.into_label(), "B");
    }
}
