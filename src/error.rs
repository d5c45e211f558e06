//! Errors returned by [`LanguageModel`](crate::LanguageModel) and its configuration.

use rand_distr::WeightedError;
use thiserror::Error;

/// Everything that can go wrong when building or querying a model.
///
/// Running out of known contexts while generating is not in here: generation just returns what it
/// managed to produce.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A model needs to look at at least one token at a time.
    #[error("window size must be positive, got {0}")]
    InvalidWindowSize(usize),

    /// An unseen context was scored by a model that has no n-grams at all, so the smoothing
    /// denominator is zero.
    #[error("cannot smooth an unseen context: the model was trained without any complete n-gram")]
    EmptyVocabulary,

    /// Loaded model data that could not have come out of training, such as a probability for
    /// every context that does not line up with the contexts.
    #[error("inconsistent model data: {0}")]
    InconsistentModel(String),

    /// The weights given to a weighted draw were empty, zero or otherwise unusable.
    #[error("failed to create weighted distribution: {0}")]
    Sampling(#[from] WeightedError),
}
