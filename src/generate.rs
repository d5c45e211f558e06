//! Text generation by repeatedly drawing the next token from what followed the current context.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::LanguageModel;
use crate::token::{Token, TokenRef};

impl LanguageModel {
    /// Generates a text of `length` tokens, starting from `seed`.
    ///
    /// - If `seed` already has at least `length` tokens, its first `length` tokens are returned
    ///   and `rng` is never touched.
    /// - If `seed` is shorter than `window_size - 1` tokens, it is first completed to a known
    ///   context: without a seed, one is drawn weighted by [`LanguageModel::contexts_prob`]; with
    ///   one, uniformly among the known contexts that start with the seed's tokens.
    /// - After that, every new token is drawn from what followed the last `window_size - 1`
    ///   tokens in the training corpus, weighted by how often it did.
    ///
    /// Fewer than `length` tokens are returned when the model runs out of contexts. If no context
    /// starts with `seed`, `seed` is returned as it was given (and an empty string if there was no
    /// seed and the model knows no contexts at all).
    ///
    /// ```
    /// # use ngramish::{Granularity, LanguageModel, ModelConfig};
    /// # use rand::thread_rng;
    /// let config = ModelConfig::new(2, Granularity::Words).unwrap();
    /// let model = LanguageModel::train(config, "one two three four").unwrap();
    ///
    /// let text = model.generate(&mut thread_rng(), Some("two"), 10);
    /// assert_eq!(text, "two three four");
    /// ```
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        seed: Option<&str>,
        length: usize,
    ) -> String {
        let order = self.window_size().saturating_sub(1);
        let seed_tokens = seed.map(|s| self.tokenizer.split(s)).unwrap_or_default();

        if seed_tokens.len() >= length {
            return self.tokenizer.join(&seed_tokens[..length]);
        }

        let mut text: Vec<TokenRef<'_>> = if seed_tokens.len() < order {
            match self.initial_context(rng, seed.map(|_| seed_tokens.as_slice())) {
                Some(context) => self.tokenizer.split_key(context, order),
                None => {
                    debug!("no known context starts with {seed:?}");
                    return seed.unwrap_or_default().to_string();
                }
            }
        } else {
            seed_tokens
        };
        // a drawn context can be longer than what was asked for
        text.truncate(length);

        while text.len() < length {
            let lookup = self.tokenizer.join(&text[text.len().saturating_sub(order)..]);
            let Some(next) = self.store.sample_next(rng, &lookup) else {
                debug!(
                    "context {lookup:?} was never followed by anything, stopping at {} of {length} tokens",
                    text.len()
                );
                break;
            };
            text.push(next.as_str());
        }

        self.tokenizer.join(&text)
    }

    /// Picks a `window_size - 1` token long context to start generating from.
    ///
    /// Without a prefix the draw is weighted by [`LanguageModel::contexts_prob`]; with one it is
    /// uniform over the contexts whose tokens start with `prefix`. `None` if there is nothing to
    /// draw from.
    fn initial_context<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        prefix: Option<&[TokenRef<'_>]>,
    ) -> Option<&Token> {
        match prefix {
            None => self.store.sample_context(rng),
            Some(prefix) => {
                let order = self.window_size().saturating_sub(1);
                let candidates: Vec<&Token> = self
                    .store
                    .full_order()
                    .keys()
                    .filter(|context| {
                        self.tokenizer
                            .split_key(context, order)
                            .starts_with(prefix)
                    })
                    .collect();
                candidates.choose(rng).copied()
            }
        }
    }
}
