//! Model training: frequency counting and probability estimation.

mod frequency;
mod probability;
mod statistics;
mod trainer;

pub use frequency::{AttributeFrequencies, FrequencyTable};
pub use probability::{AttributeProbabilities, Gaussian, ProbabilityTable};
pub use statistics::RunningStats;
pub use trainer::{
    DEFAULT_CARDINALITY_WARNING, DEFAULT_VAR_SMOOTHING, TrainedTables, Trainer, TrainerConfig,
};
