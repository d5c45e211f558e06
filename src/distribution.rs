//! [`TokenCounts`] are representations of how often [`Token`]s followed one context, and are
//! paired up with that context in a [`FrequencyStore`](crate::store::FrequencyStore).
//!
//! Drawing from them goes through a [`WeightedChoice`], which keeps the choices and their weights
//! in two explicit arrays and samples with [`WeightedAliasIndex`].

use std::fmt;

use indexmap::IndexMap;
use rand::Rng;
use rand_distr::weighted_alias::AliasableWeight;
use rand_distr::{Distribution, WeightedAliasIndex};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::token::Token;

/// Counts how many times each token followed a context. Keeps the order in which tokens were first
/// seen, so draws from a seeded [`Rng`] are reproducible.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TokenCounts {
    map: IndexMap<Token, u64>,
}

impl TokenCounts {
    pub fn new() -> Self {
        Self {
            map: IndexMap::new(),
        }
    }

    /// Add an occurance of this token.
    pub fn add_token(&mut self, token: &str) {
        match self.map.get_mut(token) {
            Some(n) => {
                *n += 1;
            }
            None => {
                self.map.insert(token.to_string(), 1);
            }
        }
    }

    /// How many times `token` was seen, if ever.
    pub fn get(&self, token: &str) -> Option<u64> {
        self.map.get(token).copied()
    }

    /// Sum of all counts, i.e. how many times the context was followed by anything.
    pub fn total(&self) -> u64 {
        self.map.values().sum()
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Token, u64)> {
        self.map.iter().map(|(t, n)| (t, *n))
    }

    /// Creates a weighted distribution for the likelyhood of tokens to appear.
    ///
    /// # Errors
    ///
    /// If there are no counted tokens.
    pub fn distribution(&self) -> Result<WeightedChoice<Token, u64>, ModelError> {
        WeightedChoice::new(self.iter().map(|(t, n)| (t.clone(), n)))
    }
}

/// A single weighted draw over explicit `(choice, weight)` pairs. The weights do not have to sum to
/// one; a choice is drawn with probability `weight / sum(weights)`.
///
/// ```
/// # use ngramish::WeightedChoice;
/// # use rand::thread_rng;
/// let choice = WeightedChoice::new([("heads", 3_u64), ("tails", 0)]).unwrap();
/// assert_eq!(*choice.sample(&mut thread_rng()), "heads");
/// ```
pub struct WeightedChoice<T, W: AliasableWeight> {
    /// Mappings of index in choices to their likelyhood.
    dist: WeightedAliasIndex<W>,
    /// The actual choices
    choices: Vec<T>,
}

impl<T, W: AliasableWeight> WeightedChoice<T, W> {
    /// # Errors
    ///
    /// [`ModelError::Sampling`] if `pairs` is empty, any weight is negative or not finite, or all
    /// weights are zero.
    pub fn new(pairs: impl IntoIterator<Item = (T, W)>) -> Result<Self, ModelError> {
        let (choices, weights): (Vec<T>, Vec<W>) = pairs.into_iter().unzip();
        Ok(Self {
            dist: WeightedAliasIndex::new(weights)?,
            choices,
        })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        &self.choices[self.dist.sample(rng)]
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

// `WeightedAliasIndex` is only `Clone` for weights whose `Uniform` is
impl<T: Clone, W: AliasableWeight> Clone for WeightedChoice<T, W>
where
    WeightedAliasIndex<W>: Clone,
{
    fn clone(&self) -> Self {
        Self {
            dist: self.dist.clone(),
            choices: self.choices.clone(),
        }
    }
}

impl<T: fmt::Debug, W: AliasableWeight> fmt::Debug for WeightedChoice<T, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeightedChoice")
            .field("choices", &self.choices)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::WeightedError;

    use super::*;

    #[test]
    fn add_token_counts_every_occurance() {
        let mut counts = TokenCounts::new();
        for t in ["b", "a", "b", "b"] {
            counts.add_token(t);
        }
        assert_eq!(counts.get("b"), Some(3));
        assert_eq!(counts.get("a"), Some(1));
        assert_eq!(counts.get("c"), None);
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.len(), 2);
        // first seen first
        assert_eq!(
            counts.iter().collect::<Vec<_>>(),
            vec![(&"b".to_string(), 3), (&"a".to_string(), 1)]
        );
    }

    #[test]
    fn empty_counts_have_no_distribution() {
        assert_eq!(
            TokenCounts::new().distribution().unwrap_err(),
            ModelError::Sampling(WeightedError::NoItem)
        );
    }

    #[test]
    fn all_zero_weights_are_rejected() {
        assert_eq!(
            WeightedChoice::new([("a", 0.0_f64), ("b", 0.0)]).unwrap_err(),
            ModelError::Sampling(WeightedError::AllWeightsZero)
        );
    }

    #[test]
    fn single_token_is_always_drawn() {
        let mut counts = TokenCounts::new();
        counts.add_token("only");
        let dist = counts.distribution().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert_eq!(*dist.sample(&mut rng), "only");
        }
    }

    #[test]
    fn zero_weight_is_never_drawn() {
        let choice = WeightedChoice::new([("never", 0.0_f64), ("a", 0.25), ("b", 0.75)]).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            assert_ne!(*choice.sample(&mut rng), "never");
        }
    }

    #[test]
    fn draws_follow_the_weights() {
        let mut counts = TokenCounts::new();
        for _ in 0..3 {
            counts.add_token("common");
        }
        counts.add_token("rare");
        let dist = counts.distribution().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let common = (0..10_000)
            .filter(|_| dist.sample(&mut rng).as_str() == "common")
            .count();
        // expected 7500
        assert!((7000..8000).contains(&common), "got {common}");
    }

    #[test]
    fn same_seed_same_draws() {
        let choice = WeightedChoice::new([("x", 1_u64), ("y", 2), ("z", 3)]).unwrap();
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..20).map(|_| *choice.sample(&mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(draw(9), draw(9));
    }
}
