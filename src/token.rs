//! At the heart of a [`LanguageModel`](crate::LanguageModel) is a [`Token`]. In fact, this is just
//! a String. What ends up in a token depends on the [`Granularity`]: a single `char`, or
//! everything between two single spaces.
//!
//! Contexts and n-grams are stored as strings too, joined back together by the same
//! [`Tokenizer`] that split them, so a context of `k` tokens is always one `String`.

use itertools::Itertools;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::Granularity;

/// Representation of a string segment.
pub type Token = String;

/// A borrowed version of [`Token`]; if [`Token`] is [`String`], then [`TokenRef`] is `&str`.
pub type TokenRef<'a> = &'a str;

/// Splits text into tokens and joins them back, according to a [`Granularity`].
///
/// For input without double spaces (or leading/trailing spaces in word mode), `join` is the exact
/// inverse of `split`.
///
/// ```
/// # use ngramish::{Granularity, Tokenizer};
/// let words = Tokenizer::new(Granularity::Words);
/// assert_eq!(words.split("the cat sat"), vec!["the", "cat", "sat"]);
/// assert!(words.split("").is_empty());
///
/// let chars = Tokenizer::new(Granularity::Chars);
/// assert_eq!(chars.join(&chars.split("cat")), "cat");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tokenizer {
    granularity: Granularity,
}

impl Tokenizer {
    pub fn new(granularity: Granularity) -> Self {
        Self { granularity }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Splits `text` into tokens. The empty string is always the empty sequence.
    pub fn split<'a>(&self, text: &'a str) -> Vec<TokenRef<'a>> {
        if text.is_empty() {
            return Vec::new();
        }
        match self.granularity {
            Granularity::Words => text.split(' ').collect(),
            Granularity::Chars => text
                .char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect(),
        }
    }

    /// Joins tokens back together, with a single space between words and nothing between chars.
    pub fn join<S: AsRef<str>>(&self, tokens: &[S]) -> String {
        let sep = match self.granularity {
            Granularity::Words => " ",
            Granularity::Chars => "",
        };
        tokens.iter().map(AsRef::<str>::as_ref).join(sep)
    }

    /// Splits a stored context key of exactly `k` tokens back into those tokens.
    ///
    /// Unlike [`Tokenizer::split`], a one word key that is empty is the single empty word a double
    /// space leaves behind, not the empty sequence.
    ///
    /// ```
    /// # use ngramish::{Granularity, Tokenizer};
    /// let words = Tokenizer::new(Granularity::Words);
    /// assert_eq!(words.split_key("", 1), vec![""]);
    /// assert_eq!(words.split_key(" a", 2), vec!["", "a"]);
    /// assert!(words.split_key("", 0).is_empty());
    /// ```
    pub fn split_key<'a>(&self, key: &'a str, k: usize) -> Vec<TokenRef<'a>> {
        match self.granularity {
            _ if k == 0 => Vec::new(),
            Granularity::Words => key.split(' ').collect(),
            Granularity::Chars => self.split(key),
        }
    }

    /// Returns the span of at most `size` tokens that ends at (and includes) `idx`. Near the start
    /// of `tokens` the span is shorter.
    ///
    /// # Panics
    ///
    /// If `idx` is out of bounds.
    pub fn ngram_ending_at<'t, S>(&self, tokens: &'t [S], idx: usize, size: usize) -> &'t [S] {
        let start = (idx + 1).saturating_sub(size);
        &tokens[start..=idx]
    }

    /// Splits a span into its joined context (every token but the last) and its last token.
    ///
    /// Returns `None` for an empty span.
    pub fn split_context<'t, S: AsRef<str>>(&self, span: &'t [S]) -> Option<(String, &'t str)> {
        let (last, context) = span.split_last()?;
        Some((self.join(context), AsRef::<str>::as_ref(last)))
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(Granularity::default())
    }
}
