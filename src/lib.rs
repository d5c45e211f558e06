//! Dead simple n-gram language models, over words or characters.
//!
//! A [`LanguageModel`] counts, for every context length from zero up to `window_size - 1`, which
//! tokens followed each context in a training text. It can then:
//!
//! - generate new text, drawing every next token from what followed the current context (the
//!   randomness is built using a weighted distribution, see [`rand_distr::WeightedAliasIndex`]),
//! - score a text with its log-probability, backing off to shorter contexts for the first tokens
//!   and Laplace smoothing anything it never saw.
//!
//! ```
//! use ngramish::{Granularity, LanguageModel, ModelConfig};
//! use rand::thread_rng;
//!
//! let config = ModelConfig::new(3, Granularity::Words)?;
//! let model = LanguageModel::train(config, "the cat sat on the mat and the cat ran")?;
//!
//! let text = model.generate(&mut thread_rng(), Some("the cat"), 6);
//! assert!(text.starts_with("the cat"));
//!
//! assert!(model.evaluate("the cat sat")? > model.evaluate("mat the ran")?);
//! # Ok::<(), ngramish::ModelError>(())
//! ```
//!
//! Text is taken as it is given; lower-casing or spacing out punctuation is left to the caller.
//!
//! # Features
//!
//! - `serde` - Derives `Serialize` and `Deserialize` for [`ModelConfig`] and a trained
//! [`LanguageModel`], so a model can be stored and loaded again without retraining. Loading checks
//! that the counts agree with each other and rebuilds the samplers used for generation.
//! - `inline-more` - Passed on to [`hashbrown`](https://crates.io/crates/hashbrown). Enabled by
//! default.

pub mod config;
pub mod distribution;
pub mod error;
mod evaluate;
mod generate;
pub mod model;
pub mod store;
pub mod token;

pub use config::{Granularity, ModelConfig};
pub use distribution::{TokenCounts, WeightedChoice};
pub use error::ModelError;
pub use model::LanguageModel;
pub use store::{ContextTable, FrequencyStore};
pub use token::{Token, Tokenizer};
