use std::hash::Hash;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::tokenizer::TokenMode;

/// Corpus
/// An ordered mapping from document key to token sequence, tagged with the
/// mode the tokens were produced under.
///
/// Documents are immutable once added: re-tokenizing a source text means
/// building a new corpus, not editing this one. All derived tables take a
/// corpus by reference and never hold one back.
///
/// `K` is the document key type (e.g. `String`, `usize`, or a derived
/// section id such as `line_number / section_size`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Serialize",
    deserialize = "K: Deserialize<'de> + Eq + Hash"
))]
pub struct Corpus<K = String>
where
    K: Eq + Hash,
{
    #[serde(with = "indexmap::map::serde_seq")]
    docs: IndexMap<K, Vec<String>>,
    mode: TokenMode,
}

impl<K> Corpus<K>
where
    K: Clone + Eq + Hash,
{
    /// Create an empty corpus for the given token mode.
    pub fn new(mode: TokenMode) -> Self {
        Self {
            docs: IndexMap::new(),
            mode,
        }
    }

    /// Add a tokenized document.
    /// Re-adding a key replaces the previous token sequence.
    ///
    /// # Arguments
    /// * `key` - document key
    /// * `tokens` - token sequence from `Tokenizer::tokenize`
    pub fn add_doc(&mut self, key: K, tokens: Vec<String>) -> &mut Self {
        self.docs.insert(key, tokens);
        self
    }

    /// Number of documents, including empty ones.
    #[inline]
    pub fn doc_num(&self) -> usize {
        self.docs.len()
    }

    /// Token sequence of one document.
    #[inline]
    pub fn tokens(&self, key: &K) -> Option<&[String]> {
        self.docs.get(key).map(|t| t.as_slice())
    }

    /// Iterate documents in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&K, &[String])> {
        self.docs.iter().map(|(k, t)| (k, t.as_slice()))
    }

    /// The mode this corpus was tokenized under.
    #[inline]
    pub fn mode(&self) -> &TokenMode {
        &self.mode
    }
}
