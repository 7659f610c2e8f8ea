//! Probability tables derived from frequency tables.

use std::f64::consts::PI;

use indexmap::IndexMap;
use serde::Serialize;

use crate::schema::Category;

use super::frequency::{AttributeFrequencies, FrequencyTable};
use super::statistics::RunningStats;

/// Normal distribution parameters for one numeric column under one label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Gaussian {
    pub mean: f64,
    /// Sample standard deviation (n - 1 divisor).
    pub std_dev: f64,
}

impl Gaussian {
    /// Fit to a sample.
    pub fn fit(values: &[f64]) -> Self {
        let stats: RunningStats = values.iter().collect();
        Self {
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }

    /// Probability density at `x`.
    ///
    /// `var_smoothing` is added to the variance, so a zero spread still
    /// yields a finite density. With no spread and no smoothing the
    /// distribution is a point mass: infinite at the mean, zero elsewhere.
    pub fn density(&self, x: f64, var_smoothing: f64) -> f64 {
        let variance = self.std_dev * self.std_dev + var_smoothing;
        let diff = x - self.mean;
        if variance <= 0.0 {
            return if diff == 0.0 { f64::INFINITY } else { 0.0 };
        }
        (-(diff * diff) / (2.0 * variance)).exp() / (2.0 * PI * variance).sqrt()
    }
}

/// Conditional distribution of one attribute column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "distribution", rename_all = "snake_case")]
pub enum AttributeProbabilities {
    /// attribute value -> label -> Laplace-smoothed P(value | label).
    Categorical(IndexMap<Category, IndexMap<Category, f64>>),
    /// label -> Gaussian parameters.
    Numeric(IndexMap<Category, Gaussian>),
}

/// Priors and conditional distributions for every attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProbabilityTable {
    /// label -> prior probability, in first-seen order.
    pub labels: IndexMap<Category, f64>,
    /// Attribute column name -> conditional distribution, in column order.
    pub attributes: IndexMap<String, AttributeProbabilities>,
}

impl ProbabilityTable {
    /// Derive probabilities from counts.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Self {
        let total = frequencies.total as f64;
        let labels = frequencies
            .labels
            .iter()
            .map(|(label, &count)| (label.clone(), count as f64 / total))
            .collect();

        let attributes = frequencies
            .attributes
            .iter()
            .map(|(column, counts)| {
                let distribution = match counts {
                    AttributeFrequencies::Categorical(counts) => {
                        AttributeProbabilities::Categorical(smooth(counts, &frequencies.labels))
                    }
                    AttributeFrequencies::Numeric(samples) => AttributeProbabilities::Numeric(
                        samples
                            .iter()
                            .map(|(label, values)| (label.clone(), Gaussian::fit(values)))
                            .collect(),
                    ),
                };
                (column.clone(), distribution)
            })
            .collect();

        Self { labels, attributes }
    }

    pub fn attribute(&self, column: &str) -> Option<&AttributeProbabilities> {
        self.attributes.get(column)
    }

    pub fn prior(&self, label: &Category) -> Option<f64> {
        self.labels.get(label).copied()
    }
}

/// Laplace (add-one) smoothing over one categorical column.
fn smooth(
    counts: &IndexMap<Category, IndexMap<Category, usize>>,
    label_counts: &IndexMap<Category, usize>,
) -> IndexMap<Category, IndexMap<Category, f64>> {
    let distinct = counts.len();

    counts
        .iter()
        .map(|(value, by_label)| {
            let probabilities = by_label
                .iter()
                .map(|(label, &count)| {
                    let label_count = label_counts.get(label).copied().unwrap_or(0);
                    let p = (count + 1) as f64 / (label_count + distinct) as f64;
                    (label.clone(), p)
                })
                .collect();
            (value.clone(), probabilities)
        })
        .collect()
}
