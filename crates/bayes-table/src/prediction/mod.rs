//! Prediction: posterior scoring and label selection.

mod predictor;

pub use predictor::{Prediction, ScoreBreakdown, Scorer};
