//! Scoring a text by its log-likelihood under the model.

use log::trace;

use crate::error::ModelError;
use crate::model::LanguageModel;

impl LanguageModel {
    /// Returns the natural-log probability of `text` under the model.
    ///
    /// Every token is scored against the longest context available for it, up to
    /// `window_size - 1` tokens, so the first tokens of a text are scored with shorter contexts
    /// instead of being padded (stupid backoff). A token that was seen after its context gets
    /// `ln(count(context, token) / count(context))`; anything else is Laplace smoothed to
    /// `ln(1 / (count(context) + V))`, where `count(context)` is zero for an unseen context and `V`
    /// is [`LanguageModel::vocabulary_size`].
    ///
    /// The empty text scores `0.0`.
    ///
    /// ```
    /// # use ngramish::{Granularity, LanguageModel, ModelConfig};
    /// let config = ModelConfig::new(2, Granularity::Words).unwrap();
    /// let model = LanguageModel::train(config, "a b a b a").unwrap();
    ///
    /// // ln(3/5) for "a" on its own, ln(2/2) for "b" after "a"
    /// let score = model.evaluate("a b").unwrap();
    /// assert!((score - (3.0_f64 / 5.0).ln()).abs() < 1e-12);
    /// ```
    ///
    /// # Errors
    ///
    /// [`ModelError::EmptyVocabulary`] if a token has to be smoothed against a context that was
    /// never seen while the model holds no complete n-gram, since the smoothed probability would
    /// be `1 / 0`.
    pub fn evaluate(&self, text: &str) -> Result<f64, ModelError> {
        let tokens = self.tokenizer.split(text);
        let window_size = self.window_size();

        let mut log_prob = 0.0;
        for idx in (0..tokens.len()).rev() {
            let span = self.tokenizer.ngram_ending_at(&tokens, idx, window_size);
            let Some((context, last)) = self.tokenizer.split_context(span) else {
                continue;
            };
            let k = span.len() - 1;

            let followers = self.store.followers(k, &context);
            log_prob += match followers.and_then(|f| Some((f.get(last)?, f.total()))) {
                Some((count, total)) => (count as f64 / total as f64).ln(),
                None => {
                    let seen = followers.map_or(0, |f| f.total());
                    trace!("smoothing {last:?} after {context:?} (context seen {seen} times)");
                    self.smoothed(seen)?.ln()
                }
            };
        }

        Ok(log_prob)
    }

    /// Laplace smoothed probability of a token never seen after a context that was followed by
    /// something `context_count` times.
    fn smoothed(&self, context_count: u64) -> Result<f64, ModelError> {
        let denominator = context_count + self.vocabulary_size() as u64;
        if denominator == 0 {
            return Err(ModelError::EmptyVocabulary);
        }
        Ok(1.0 / denominator as f64)
    }
}
