//! Property-based tests for training and prediction.
//!
//! These tests use proptest to generate random mixed datasets and verify that
//! the tables keep their invariants under all of them.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p bayes-table --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p bayes-table --test property_tests
//! ```

use proptest::prelude::*;

use bayes_table::training::{AttributeFrequencies, AttributeProbabilities};
use bayes_table::{BayesError, NaiveBayes, NaiveBayesConfig, Value};

// =============================================================================
// Test Strategies
// =============================================================================

/// Small categorical alphabets keep every value seen more than once.
fn color() -> impl Strategy<Value = String> {
    prop_oneof![Just("red"), Just("green"), Just("blue"), Just("gray")].prop_map(String::from)
}

fn shape() -> impl Strategy<Value = String> {
    prop_oneof![Just("round"), Just("square")].prop_map(String::from)
}

fn label() -> impl Strategy<Value = String> {
    prop_oneof![Just("alpha"), Just("beta"), Just("gamma")].prop_map(String::from)
}

/// One row: color, weight, shape, label.
fn sample() -> impl Strategy<Value = Vec<Value>> {
    (color(), -100.0f64..100.0, shape(), label()).prop_map(|(c, w, s, l)| {
        vec![Value::from(c), Value::from(w), Value::from(s), Value::from(l)]
    })
}

fn dataset() -> impl Strategy<Value = Vec<Vec<Value>>> {
    prop::collection::vec(sample(), 1..60)
}

fn model(data: Vec<Vec<Value>>) -> NaiveBayes {
    NaiveBayes::new(NaiveBayesConfig::new(["color", "weight", "shape", "label"]).with_data(data))
        .expect("generated rows are valid")
}

// =============================================================================
// Table Invariants
// =============================================================================

proptest! {
    #[test]
    fn label_probabilities_sum_to_one(data in dataset()) {
        let mut m = model(data);
        m.train().unwrap();
        let total: f64 = m.probabilities().unwrap().labels.values().sum();
        prop_assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn conditional_counts_sum_to_label_count(data in dataset()) {
        let mut m = model(data);
        m.train().unwrap();
        let frequencies = m.frequencies().unwrap();

        for counts in frequencies.attributes.values() {
            match counts {
                AttributeFrequencies::Categorical(counts) => {
                    for (label, &label_count) in &frequencies.labels {
                        let sum: usize = counts.values().map(|by_label| by_label[label]).sum();
                        prop_assert_eq!(sum, label_count);
                    }
                }
                AttributeFrequencies::Numeric(samples) => {
                    for (label, &label_count) in &frequencies.labels {
                        prop_assert_eq!(samples[label].len(), label_count);
                    }
                }
            }
        }
    }

    #[test]
    fn smoothed_probabilities_are_positive(data in dataset()) {
        let mut m = model(data);
        m.train().unwrap();

        for distribution in m.probabilities().unwrap().attributes.values() {
            if let AttributeProbabilities::Categorical(p) = distribution {
                for by_label in p.values() {
                    for &probability in by_label.values() {
                        prop_assert!(probability > 0.0 && probability <= 1.0);
                    }
                }
            }
        }
    }

    #[test]
    fn smoothed_probabilities_sum_to_one_per_label(data in dataset()) {
        // Add-one smoothing spreads each label's mass over the seen values only.
        let mut m = model(data);
        m.train().unwrap();
        let probabilities = m.probabilities().unwrap();

        for distribution in probabilities.attributes.values() {
            if let AttributeProbabilities::Categorical(p) = distribution {
                for label in probabilities.labels.keys() {
                    let sum: f64 = p.values().map(|by_label| by_label[label]).sum();
                    prop_assert!((sum - 1.0).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn training_twice_is_identical(data in dataset()) {
        let mut m = model(data);
        m.train().unwrap();
        let first = m.snapshot().unwrap();
        m.train().unwrap();
        let second = m.snapshot().unwrap();
        prop_assert_eq!(&first.probabilities, &second.probabilities);
        prop_assert_eq!(&first.frequencies, &second.frequencies);
    }

    // =========================================================================
    // Lifecycle and Prediction
    // =========================================================================

    #[test]
    fn add_makes_model_dirty(data in dataset(), extra in sample()) {
        let mut m = model(data);
        m.train().unwrap();
        prop_assert!(!m.has_dirty_samples());
        m.add(extra).unwrap();
        prop_assert!(m.has_dirty_samples());
        m.train().unwrap();
        prop_assert!(!m.has_dirty_samples());
    }

    #[test]
    fn add_rejects_truncated_rows(data in dataset(), extra in sample(), keep in 0usize..4) {
        let mut m = model(data);
        let before = m.len();
        let truncated: Vec<Value> = extra.into_iter().take(keep).collect();
        let result = m.add(truncated);
        prop_assert!(
            matches!(result, Err(BayesError::Validation { .. })),
            "expected BayesError::Validation, got {:?}",
            result
        );
        prop_assert_eq!(m.len(), before);
    }

    #[test]
    fn prediction_is_a_known_label(data in dataset()) {
        let mut m = model(data.clone());
        for row in data.iter().take(10) {
            let observation = &row[..3];
            let breakdown = m.predict_breakdown(observation).unwrap();
            prop_assert!(breakdown.scores.contains_key(&breakdown.label));
            let best = breakdown.scores.values().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert_eq!(breakdown.scores[&breakdown.label], best);
            for &score in breakdown.scores.values() {
                prop_assert!(score.is_finite() && score >= 0.0);
            }
        }
    }

    #[test]
    fn null_attribute_never_errors(data in dataset(), position in 0usize..3) {
        let mut m = model(data.clone());
        let mut observation: Vec<Value> = data[0][..3].to_vec();
        observation[position] = Value::Null;
        prop_assert!(m.predict_breakdown(&observation).is_ok());
    }

    #[test]
    fn prediction_is_deterministic(data in dataset()) {
        let mut m = model(data.clone());
        let observation = &data[0][..3];
        let first = m.predict_breakdown(observation).unwrap();
        let second = m.predict_breakdown(observation).unwrap();
        prop_assert_eq!(first, second);
    }
}
