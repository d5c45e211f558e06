//! Construction-time settings of a [`LanguageModel`](crate::LanguageModel).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// What a single [`Token`](crate::token::Token) is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Granularity {
    /// Tokens are the pieces between single spaces; joined back with one space.
    #[default]
    Words,
    /// Every `char` is a token; joined back with nothing in between.
    Chars,
}

/// Window size and granularity of a model. Both are fixed once the model is trained.
///
/// ```
/// # use ngramish::{Granularity, ModelConfig};
/// let config = ModelConfig::default().with_window_size(4).with_granularity(Granularity::Chars);
/// assert!(config.validate().is_ok());
/// assert!(ModelConfig::new(0, Granularity::Words).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModelConfig {
    /// Length of the longest span (context plus predicted token) the model counts.
    pub window_size: usize,
    pub granularity: Granularity,
}

impl ModelConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidWindowSize`] if `window_size` is zero.
    pub fn new(window_size: usize, granularity: Granularity) -> Result<Self, ModelError> {
        let config = Self {
            window_size,
            granularity,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Checks a configuration that was put together by hand or deserialized.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.window_size == 0 {
            return Err(ModelError::InvalidWindowSize(self.window_size));
        }
        Ok(())
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            window_size: 3,
            granularity: Granularity::Words,
        }
    }
}
