use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Tokenization mode.
/// The mode a corpus was tokenized under is carried on every downstream
/// table, and tables of different modes are never compared: an n-gram term
/// and a word term live in distinct domains even when the strings collide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenMode {
    /// Single words, lowercased, stop-word filtered.
    Words,
    /// Sliding window of `n` consecutive words, joined with a single space.
    /// The space-joined encoding is part of the contract: downstream code
    /// splits n-gram terms on that separator.
    Ngrams(usize),
    /// Sentence units split on locale-aware boundaries.
    /// Known limitation: lossy on text with unusual encoding or
    /// punctuation. Accepted as-is, do not "fix" silently.
    Sentences,
}

/// Tokenizer
/// Splits raw lines of text into normalized tokens.
///
/// The stop-word set is injected by the caller and held by value; there is
/// no process-wide word list. Pure punctuation or numeric tokens are
/// dropped unless `keep_non_alphabetic` is set.
///
/// # Examples
/// ```
/// use text_miner::{TokenMode, Tokenizer};
///
/// let tokenizer = Tokenizer::new().with_stop_words(["the"]);
/// let tokens = tokenizer.tokenize(&["The cat sat"], &TokenMode::Words);
/// assert_eq!(tokens, vec!["cat", "sat"]);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tokenizer {
    stop_words: HashSet<String>,
    keep_non_alphabetic: bool,
}

impl Tokenizer {
    /// Create a tokenizer with no stop words.
    pub fn new() -> Self {
        Self {
            stop_words: HashSet::new(),
            keep_non_alphabetic: false,
        }
    }

    /// Replace the stop-word set.
    /// Stop words are matched after lowercasing.
    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stop_words = words
            .into_iter()
            .map(|w| w.as_ref().to_lowercase())
            .collect();
        self
    }

    /// Keep tokens that contain no alphabetic character (numbers,
    /// punctuation runs). Off by default.
    pub fn keep_non_alphabetic(mut self, keep: bool) -> Self {
        self.keep_non_alphabetic = keep;
        self
    }

    /// Tokenize raw lines under the given mode.
    ///
    /// The output is a finite, re-iterable sequence: several downstream
    /// consumers read the same token vector independently.
    ///
    /// # Arguments
    /// * `lines` - raw text lines of one document
    /// * `mode` - tokenization mode
    ///
    /// # Returns
    /// * `Vec<String>` - normalized tokens
    pub fn tokenize<L>(&self, lines: &[L], mode: &TokenMode) -> Vec<String>
    where
        L: AsRef<str>,
    {
        match mode {
            TokenMode::Words => self.word_tokens(lines),
            TokenMode::Ngrams(n) => self.ngram_tokens(lines, *n),
            TokenMode::Sentences => self.sentence_tokens(lines),
        }
    }

    /// Word splitting via unicode segmentation. Internal apostrophes are
    /// kept ("don't" is one token), surrounding punctuation is not.
    fn word_tokens<L>(&self, lines: &[L]) -> Vec<String>
    where
        L: AsRef<str>,
    {
        lines
            .iter()
            .flat_map(|line| {
                line.as_ref()
                    .unicode_words()
                    .map(|w| w.to_lowercase())
                    .collect::<Vec<String>>()
            })
            .filter(|w| self.keep_token(w))
            .collect()
    }

    fn ngram_tokens<L>(&self, lines: &[L], n: usize) -> Vec<String>
    where
        L: AsRef<str>,
    {
        if n == 0 {
            return Vec::new();
        }
        let words = self.word_tokens(lines);
        if words.len() < n {
            // ウィンドウより短い文書はn-gramを生成しない
            return Vec::new();
        }
        words.windows(n).map(|window| window.join(" ")).collect()
    }

    fn sentence_tokens<L>(&self, lines: &[L]) -> Vec<String>
    where
        L: AsRef<str>,
    {
        // Sentences may span lines, so join the document first.
        let text = lines
            .iter()
            .map(|l| l.as_ref().trim())
            .collect::<Vec<&str>>()
            .join(" ");
        text.unicode_sentences()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty() && (self.keep_non_alphabetic || contains_letter(s)))
            .collect()
    }

    #[inline]
    fn keep_token(&self, token: &str) -> bool {
        if self.stop_words.contains(token) {
            return false;
        }
        self.keep_non_alphabetic || contains_letter(token)
    }
}

#[inline]
fn contains_letter(token: &str) -> bool {
    token.chars().any(|c| c.is_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_are_lowercased_and_stop_filtered() {
        let tokenizer = Tokenizer::new().with_stop_words(["the", "a"]);
        let tokens = tokenizer.tokenize(&["The cat sat on a mat."], &TokenMode::Words);
        assert_eq!(tokens, vec!["cat", "sat", "on", "mat"]);
    }

    #[test]
    fn numeric_and_punctuation_tokens_are_dropped_by_default() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize(&["chapter 42 --- begins"], &TokenMode::Words);
        assert_eq!(tokens, vec!["chapter", "begins"]);

        let keep = Tokenizer::new().keep_non_alphabetic(true);
        let tokens = keep.tokenize(&["chapter 42 begins"], &TokenMode::Words);
        assert_eq!(tokens, vec!["chapter", "42", "begins"]);
    }

    #[test]
    fn internal_apostrophes_survive() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize(&["Don't stop"], &TokenMode::Words);
        assert_eq!(tokens, vec!["don't", "stop"]);
    }

    #[test]
    fn bigrams_are_space_joined_windows() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize(&["not good at all"], &TokenMode::Ngrams(2));
        assert_eq!(tokens, vec!["not good", "good at", "at all"]);
        // downstream splits on the separator
        assert_eq!(tokens[0].split(' ').count(), 2);
    }

    #[test]
    fn ngram_window_longer_than_document_yields_nothing() {
        let tokenizer = Tokenizer::new();
        assert!(tokenizer
            .tokenize(&["two words"], &TokenMode::Ngrams(3))
            .is_empty());
        assert!(tokenizer
            .tokenize(&["whatever"], &TokenMode::Ngrams(0))
            .is_empty());
    }

    #[test]
    fn stop_words_are_removed_before_windowing() {
        let tokenizer = Tokenizer::new().with_stop_words(["the"]);
        let tokens = tokenizer.tokenize(&["the cat the sat"], &TokenMode::Ngrams(2));
        assert_eq!(tokens, vec!["cat sat"]);
    }

    #[test]
    fn sentences_split_on_terminal_punctuation() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize(
            &["It was cold. The wind", "howled all night!"],
            &TokenMode::Sentences,
        );
        assert_eq!(tokens, vec!["it was cold.", "the wind howled all night!"]);
    }

    #[test]
    fn tokens_are_re_iterable() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize(&["a b c"], &TokenMode::Words);
        let first: Vec<&String> = tokens.iter().collect();
        let second: Vec<&String> = tokens.iter().collect();
        assert_eq!(first, second);
    }
}
