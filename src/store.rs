//! The counting side of a model: every context of every length below the window size, what
//! followed it, and the flat table of complete n-grams.

use hashbrown::HashMap;
use indexmap::IndexMap;
use log::debug;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::distribution::{TokenCounts, WeightedChoice};
use crate::error::ModelError;
use crate::token::{Token, Tokenizer};

/// Every observed context of one length, mapped to the tokens that followed it.
pub type ContextTable = IndexMap<String, TokenCounts>;

/// Counts built once from a training corpus and only read afterwards, together with the
/// distributions generation draws from.
///
/// Invariants, for a store of window size `n`:
///
/// - `n > 0`, `contexts.len() == n`, and `contexts[k]` only holds contexts of exactly `k` tokens.
/// - Every count is at least 1.
/// - `contexts_prob[i]` belongs to the `i`:th key of `contexts[n - 1]`.
///
/// With the `serde` feature only the counts are stored. Loading checks the invariants above and
/// builds the distributions again.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Counts"))]
pub struct FrequencyStore {
    counts: Counts,
    samplers: Samplers,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct Counts {
    /// Complete n-grams and how many times each was seen.
    ngrams: HashMap<String, u64>,
    /// Context tables, indexed by context length.
    contexts: Vec<ContextTable>,
    /// Number of distinct complete n-grams.
    vocabulary_size: usize,
    /// Share of all full-order transitions that start from each full-order context.
    contexts_prob: Vec<f64>,
}

/// Draws over the full-order table, in the order of its keys.
#[derive(Clone, Debug)]
struct Samplers {
    /// Index of a full-order context, weighted by `contexts_prob`. `None` for an empty table.
    start: Option<WeightedChoice<usize, f64>>,
    /// What followed each full-order context.
    next: Vec<WeightedChoice<Token, u64>>,
}

impl Samplers {
    fn new(table: &ContextTable, contexts_prob: &[f64]) -> Result<Self, ModelError> {
        let start = if table.is_empty() {
            None
        } else {
            Some(WeightedChoice::new(
                contexts_prob.iter().copied().enumerate(),
            )?)
        };
        let next = table
            .values()
            .map(TokenCounts::distribution)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { start, next })
    }
}

impl FrequencyStore {
    /// Counts every span of `1..=window_size` tokens in `corpus`.
    ///
    /// A corpus shorter than the window still fills the lower orders it has room for.
    pub(crate) fn build(
        tokenizer: &Tokenizer,
        window_size: usize,
        corpus: &str,
    ) -> Result<Self, ModelError> {
        if window_size == 0 {
            return Err(ModelError::InvalidWindowSize(window_size));
        }
        let tokens = tokenizer.split(corpus);

        let mut contexts = vec![ContextTable::new(); window_size];
        let mut ngrams: HashMap<String, u64> = HashMap::new();

        for size in 1..=window_size {
            let k = size - 1;
            let table = &mut contexts[k];
            for window in tokens.windows(size) {
                // `windows` never yields an empty slice
                let Some((context, last)) = tokenizer.split_context(window) else {
                    continue;
                };
                match table.get_mut(&context) {
                    Some(counts) => counts.add_token(last),
                    None => {
                        let mut counts = TokenCounts::new();
                        counts.add_token(last);
                        table.insert(context, counts);
                    }
                }
                if size == window_size {
                    *ngrams.entry(tokenizer.join(window)).or_insert(0) += 1;
                }
            }
        }

        let vocabulary_size = ngrams.len();
        let contexts_prob = context_probabilities(&contexts[window_size - 1]);

        debug!(
            "counted {} tokens: {} distinct {}-grams, {} full-order contexts",
            tokens.len(),
            vocabulary_size,
            window_size,
            contexts[window_size - 1].len()
        );

        Self::try_from(Counts {
            ngrams,
            contexts,
            vocabulary_size,
            contexts_prob,
        })
    }

    pub fn window_size(&self) -> usize {
        self.counts.contexts.len()
    }

    pub fn ngrams(&self) -> &HashMap<Token, u64> {
        &self.counts.ngrams
    }

    /// Number of distinct complete n-grams (V).
    pub fn vocabulary_size(&self) -> usize {
        self.counts.vocabulary_size
    }

    /// Contexts of exactly `k` tokens, or `None` if `k` is not below the window size.
    pub fn context_table(&self, k: usize) -> Option<&ContextTable> {
        self.counts.contexts.get(k)
    }

    /// The table of `window_size - 1` long contexts, the ones generation runs on.
    pub fn full_order(&self) -> &ContextTable {
        // never empty, see `try_from`
        &self.counts.contexts[self.counts.contexts.len() - 1]
    }

    pub fn contexts_prob(&self) -> &[f64] {
        &self.counts.contexts_prob
    }

    /// What followed the `k` token long `context`.
    pub fn followers(&self, k: usize, context: &str) -> Option<&TokenCounts> {
        self.counts.contexts.get(k)?.get(context)
    }

    /// Draws a full-order context, weighted by [`FrequencyStore::contexts_prob`]. `None` if no
    /// full-order context was ever seen.
    pub fn sample_context<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Token> {
        let idx = *self.samplers.start.as_ref()?.sample(rng);
        self.full_order().get_index(idx).map(|(context, _)| context)
    }

    /// Draws what follows the full-order `context`, weighted by how often it did. `None` if the
    /// context never had anything after it.
    pub fn sample_next<R: Rng + ?Sized>(&self, rng: &mut R, context: &str) -> Option<&Token> {
        let idx = self.full_order().get_index_of(context)?;
        Some(self.samplers.next.get(idx)?.sample(rng))
    }
}

impl TryFrom<Counts> for FrequencyStore {
    type Error = ModelError;

    fn try_from(counts: Counts) -> Result<Self, Self::Error> {
        let Some(full_order) = counts.contexts.last() else {
            return Err(ModelError::InvalidWindowSize(0));
        };
        if counts.contexts_prob.len() != full_order.len() {
            return Err(ModelError::InconsistentModel(format!(
                "{} context probabilities for {} full-order contexts",
                counts.contexts_prob.len(),
                full_order.len()
            )));
        }
        if counts.vocabulary_size != counts.ngrams.len() {
            return Err(ModelError::InconsistentModel(format!(
                "vocabulary size {} for {} n-grams",
                counts.vocabulary_size,
                counts.ngrams.len()
            )));
        }
        let zero_count = counts.ngrams.values().any(|&n| n == 0)
            || counts
                .contexts
                .iter()
                .flat_map(|table| table.values())
                .any(|followers| followers.iter().any(|(_, n)| n == 0));
        if zero_count {
            return Err(ModelError::InconsistentModel(
                "counts must be positive".to_string(),
            ));
        }

        let samplers = Samplers::new(full_order, &counts.contexts_prob)?;
        Ok(Self { counts, samplers })
    }
}

#[cfg(feature = "serde")]
impl Serialize for FrequencyStore {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.counts.serialize(serializer)
    }
}

impl PartialEq for FrequencyStore {
    // the samplers follow from the counts
    fn eq(&self, other: &Self) -> bool {
        self.counts == other.counts
    }
}

/// Normalizes the number of transitions out of each context by the number of transitions out of
/// any context in `table`. Empty when `table` is.
fn context_probabilities(table: &ContextTable) -> Vec<f64> {
    let per_context: Vec<u64> = table.values().map(TokenCounts::total).collect();
    let all: u64 = per_context.iter().sum();
    if all == 0 {
        return Vec::new();
    }
    per_context
        .into_iter()
        .map(|n| n as f64 / all as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Granularity;

    fn words(n: usize, corpus: &str) -> FrequencyStore {
        FrequencyStore::build(&Tokenizer::new(Granularity::Words), n, corpus).unwrap()
    }

    fn chars(n: usize, corpus: &str) -> FrequencyStore {
        FrequencyStore::build(&Tokenizer::new(Granularity::Chars), n, corpus).unwrap()
    }

    #[test]
    fn word_bigrams() {
        let store = words(2, "a b a b a");
        assert_eq!(store.ngrams().len(), 2);
        assert_eq!(store.ngrams().get("a b"), Some(&2));
        assert_eq!(store.ngrams().get("b a"), Some(&2));
        assert_eq!(store.vocabulary_size(), 2);

        let a = store.followers(1, "a").unwrap();
        assert_eq!(a.get("b"), Some(2));
        assert_eq!(a.len(), 1);
        let b = store.followers(1, "b").unwrap();
        assert_eq!(b.get("a"), Some(2));
        assert_eq!(b.len(), 1);

        let unigrams = store.followers(0, "").unwrap();
        assert_eq!(unigrams.get("a"), Some(3));
        assert_eq!(unigrams.get("b"), Some(2));
    }

    #[test]
    fn char_trigrams() {
        let store = chars(3, "aaab");
        assert_eq!(store.ngrams().get("aaa"), Some(&1));
        assert_eq!(store.ngrams().get("aab"), Some(&1));
        assert_eq!(store.vocabulary_size(), 2);

        let aa = store.followers(2, "aa").unwrap();
        assert_eq!(aa.get("a"), Some(1));
        assert_eq!(aa.get("b"), Some(1));
        assert_eq!(store.full_order().len(), 1);
        assert_eq!(store.contexts_prob(), &[1.0]);
    }

    #[test]
    fn context_totals_match_a_recount() {
        let corpus = "the cat sat on the mat and the cat ran";
        let n = 3;
        let store = words(n, corpus);
        let tokens: Vec<&str> = corpus.split(' ').collect();

        for k in 0..n {
            let table = store.context_table(k).unwrap();
            for (context, counts) in table {
                let context_tokens: Vec<&str> = if k == 0 {
                    Vec::new()
                } else {
                    context.split(' ').collect()
                };
                assert_eq!(context_tokens.len(), k);
                // every occurance of the context that has a token after it
                let recount = tokens
                    .windows(k + 1)
                    .filter(|w| w[..k] == context_tokens[..])
                    .count() as u64;
                assert_eq!(counts.total(), recount, "context {context:?} at order {k}");
            }
        }
    }

    #[test]
    fn contexts_prob_sums_to_one() {
        let store = words(2, "one fish two fish red fish blue fish");
        assert_eq!(store.contexts_prob().len(), store.full_order().len());
        let sum: f64 = store.contexts_prob().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);

        // "fish" is followed by something 3 times out of 7
        let (idx, _, _) = store.full_order().get_full("fish").unwrap();
        assert!((store.contexts_prob()[idx] - 3.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn short_corpus_fills_lower_orders() {
        let store = words(4, "a b");
        assert!(store.ngrams().is_empty());
        assert_eq!(store.vocabulary_size(), 0);
        assert!(store.full_order().is_empty());
        assert!(store.contexts_prob().is_empty());
        assert_eq!(store.followers(1, "a").unwrap().get("b"), Some(1));
        assert_eq!(store.followers(0, "").unwrap().total(), 2);
        assert!(store.context_table(2).unwrap().is_empty());
        assert!(store.context_table(4).is_none());
    }

    #[test]
    fn empty_corpus() {
        let store = chars(2, "");
        assert_eq!(store.window_size(), 2);
        assert_eq!(store.vocabulary_size(), 0);
        assert!(store.context_table(0).unwrap().is_empty());
        assert!(store.contexts_prob().is_empty());
    }

    #[test]
    fn unigram_store() {
        let store = chars(1, "abca");
        assert_eq!(store.ngrams().get("a"), Some(&2));
        assert_eq!(store.vocabulary_size(), 3);
        assert_eq!(store.full_order().len(), 1);
        assert_eq!(store.followers(0, "").unwrap().total(), 4);
    }

    #[test]
    fn building_twice_gives_the_same_counts() {
        let corpus = "so it goes and so it went and so on";
        assert_eq!(words(3, corpus), words(3, corpus));
    }

    #[test]
    fn zero_window_is_not_built() {
        assert_eq!(
            FrequencyStore::build(&Tokenizer::default(), 0, "a b").unwrap_err(),
            ModelError::InvalidWindowSize(0)
        );
    }

    fn counts_of(store: &FrequencyStore) -> Counts {
        store.counts.clone()
    }

    #[test]
    fn inconsistent_counts_are_refused() {
        let store = words(2, "a b a c");
        assert_eq!(FrequencyStore::try_from(counts_of(&store)).unwrap(), store);

        let mut no_contexts = counts_of(&store);
        no_contexts.contexts.clear();
        assert_eq!(
            FrequencyStore::try_from(no_contexts).unwrap_err(),
            ModelError::InvalidWindowSize(0)
        );

        let mut short_prob = counts_of(&store);
        short_prob.contexts_prob.pop();
        assert!(matches!(
            FrequencyStore::try_from(short_prob),
            Err(ModelError::InconsistentModel(_))
        ));

        let mut wrong_vocabulary = counts_of(&store);
        wrong_vocabulary.vocabulary_size += 1;
        assert!(matches!(
            FrequencyStore::try_from(wrong_vocabulary),
            Err(ModelError::InconsistentModel(_))
        ));

        let mut zero_count = counts_of(&store);
        *zero_count.ngrams.get_mut("a b").unwrap() = 0;
        assert!(matches!(
            FrequencyStore::try_from(zero_count),
            Err(ModelError::InconsistentModel(_))
        ));

        let mut empty_followers = counts_of(&store);
        empty_followers.contexts[1].insert("z".to_string(), TokenCounts::new());
        empty_followers.contexts_prob.push(0.0);
        assert!(matches!(
            FrequencyStore::try_from(empty_followers),
            Err(ModelError::Sampling(_))
        ));
    }

    #[test]
    fn samplers_draw_from_the_full_order_table() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let store = words(2, "a b a c");
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..100 {
            let context = store.sample_context(&mut rng).unwrap();
            assert!(store.full_order().contains_key(context));
            let next = store.sample_next(&mut rng, "a").unwrap();
            assert!(next == "b" || next == "c", "got {next:?}");
        }
        // "c" ends the corpus
        assert_eq!(store.sample_next(&mut rng, "c"), None);
        assert_eq!(store.sample_next(&mut rng, "q"), None);

        let empty = words(2, "");
        assert_eq!(empty.sample_context(&mut rng), None);
    }
}
