//! See the top level crate documentation for information about the [`LanguageModel`] type.

use hashbrown::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{Granularity, ModelConfig};
use crate::error::ModelError;
use crate::store::{ContextTable, FrequencyStore};
use crate::token::{Token, Tokenizer};

/// An n-gram language model over word or character tokens.
///
/// A model is trained once, with [`LanguageModel::train`], and is read-only after that: both
/// [`generate`](LanguageModel::generate) and [`evaluate`](LanguageModel::evaluate) take `&self`,
/// so a trained model can be shared between threads freely.
///
/// ```
/// # use ngramish::{Granularity, LanguageModel, ModelConfig};
/// let config = ModelConfig::new(2, Granularity::Words).unwrap();
/// let model = LanguageModel::train(config, "a b a b a").unwrap();
///
/// assert_eq!(model.model_dictionary().get("a b"), Some(&2));
/// assert_eq!(model.vocabulary_size(), 2);
/// assert_eq!(model.evaluate("").unwrap(), 0.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "SavedModel"))]
pub struct LanguageModel {
    pub(crate) config: ModelConfig,
    // follows from the config
    #[cfg_attr(feature = "serde", serde(skip_serializing))]
    pub(crate) tokenizer: Tokenizer,
    pub(crate) store: FrequencyStore,
}

/// What a serialized [`LanguageModel`] holds.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct SavedModel {
    config: ModelConfig,
    store: FrequencyStore,
}

#[cfg(feature = "serde")]
impl TryFrom<SavedModel> for LanguageModel {
    type Error = ModelError;

    fn try_from(saved: SavedModel) -> Result<Self, Self::Error> {
        let SavedModel { config, store } = saved;
        config.validate()?;
        if store.window_size() != config.window_size {
            return Err(ModelError::InconsistentModel(format!(
                "window size {} with counts for window size {}",
                config.window_size,
                store.window_size()
            )));
        }
        Ok(Self {
            config,
            tokenizer: Tokenizer::new(config.granularity),
            store,
        })
    }
}

impl LanguageModel {
    /// Builds a model from `corpus`, counting every span of up to `config.window_size` tokens.
    ///
    /// The corpus is used as is; any normalization (case folding, padding punctuation with
    /// spaces) is up to the caller.
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidWindowSize`] if the configured window size is zero.
    /// [`ModelError::Sampling`] if the distributions used for generation cannot be built from the
    /// counts, which does not happen for counts training produces.
    pub fn train(config: ModelConfig, corpus: &str) -> Result<Self, ModelError> {
        config.validate()?;
        let tokenizer = Tokenizer::new(config.granularity);
        let store = FrequencyStore::build(&tokenizer, config.window_size, corpus)?;
        Ok(Self {
            config,
            tokenizer,
            store,
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// The `n` of the n-grams.
    pub fn window_size(&self) -> usize {
        self.config.window_size
    }

    pub fn granularity(&self) -> Granularity {
        self.config.granularity
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Every complete n-gram in the training corpus, with how many times it occured.
    pub fn model_dictionary(&self) -> &HashMap<Token, u64> {
        self.store.ngrams()
    }

    /// Number of distinct complete n-grams, used as the Laplace smoothing constant.
    pub fn vocabulary_size(&self) -> usize {
        self.store.vocabulary_size()
    }

    /// Contexts of exactly `k` tokens and what followed them, for `k < window_size`.
    pub fn context_table(&self, k: usize) -> Option<&ContextTable> {
        self.store.context_table(k)
    }

    /// How likely each `window_size - 1` long context is to start a generated text, in the order
    /// of [`LanguageModel::context_table`] for that length.
    pub fn contexts_prob(&self) -> &[f64] {
        self.store.contexts_prob()
    }

    pub fn store(&self) -> &FrequencyStore {
        &self.store
    }
}
