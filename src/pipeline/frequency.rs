use std::collections::HashSet;
use std::hash::Hash;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::utils::join::full_join;

use super::corpus::Corpus;
use super::tokenizer::TokenMode;

/// TermFrequency
/// Occurrence counts of each term within one document, plus the running
/// total used as the TF denominator.
///
/// # Examples
/// ```
/// use text_miner::TermFrequency;
///
/// let mut freq = TermFrequency::new();
/// freq.add_term("cat").add_term("sat").add_term("cat");
/// assert_eq!(freq.term_count("cat"), 2);
/// assert_eq!(freq.term_sum(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    term_count: IndexMap<String, u64>,
    total_term_count: u64,
}

impl TermFrequency {
    pub fn new() -> Self {
        Self {
            term_count: IndexMap::new(),
            total_term_count: 0,
        }
    }

    /// Count one term occurrence.
    #[inline]
    pub fn add_term(&mut self, term: &str) -> &mut Self {
        *self.term_count.entry(term.to_string()).or_insert(0) += 1;
        self.total_term_count += 1;
        self
    }

    /// Count a slice of term occurrences.
    #[inline]
    pub fn add_terms<T>(&mut self, terms: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for term in terms {
            self.add_term(term.as_ref());
        }
        self
    }

    /// Occurrence count of one term (0 when absent).
    #[inline]
    pub fn term_count(&self, term: &str) -> u64 {
        *self.term_count.get(term).unwrap_or(&0)
    }

    /// Total number of counted occurrences.
    /// Invariant: equals the sum of `term_count` over all terms.
    #[inline]
    pub fn term_sum(&self) -> u64 {
        self.total_term_count
    }

    /// Number of distinct terms.
    #[inline]
    pub fn term_num(&self) -> usize {
        self.term_count.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total_term_count == 0
    }

    #[inline]
    pub fn contains_term(&self, term: &str) -> bool {
        self.term_count.contains_key(term)
    }

    /// Raw counts in insertion order.
    #[inline]
    pub fn counts(&self) -> &IndexMap<String, u64> {
        &self.term_count
    }

    /// Distinct terms in insertion order.
    #[inline]
    pub fn term_set_ref_str(&self) -> Vec<&str> {
        self.term_count.keys().map(|t| t.as_str()).collect()
    }

    /// Count of the most frequent term (0 when empty).
    #[inline]
    pub fn most_frequent_term_count(&self) -> u64 {
        self.term_count.values().copied().max().unwrap_or(0)
    }

    /// Counts sorted by frequency descending, ties in lexical order.
    #[inline]
    pub fn sorted_frequency_vector(&self) -> Vec<(String, u64)> {
        let mut list: Vec<(String, u64)> = self
            .term_count
            .iter()
            .map(|(term, &count)| (term.clone(), count))
            .collect();
        list.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        list
    }

    /// Remove terms matching a condition.
    ///
    /// # Arguments
    /// * `condition` - terms for which this returns true are removed
    ///
    /// # Returns
    /// * `u64` - total count removed
    #[inline]
    pub fn remove_terms_by_condition<F>(&mut self, condition: F) -> u64
    where
        F: Fn(&str, u64) -> bool,
    {
        let mut removed_total: u64 = 0;
        self.term_count.retain(|term, count| {
            if condition(term, *count) {
                removed_total += *count;
                false
            } else {
                true
            }
        });
        self.total_term_count -= removed_total;
        removed_total
    }

    /// Ratio of distinct terms to total occurrences.
    /// 1.0 means every occurrence is unique, 0.0 means the document is empty.
    #[inline]
    pub fn unique_term_ratio(&self) -> f64 {
        if self.total_term_count == 0 {
            return 0.0;
        }
        self.term_count.len() as f64 / self.total_term_count as f64
    }

    /// Reset all counts.
    #[inline]
    pub fn clear(&mut self) {
        self.term_count.clear();
        self.total_term_count = 0;
    }
}

/// Corpus-wide difference row produced by `FrequencyTable::diff`.
/// Built with a full outer join, so terms unique to either side appear
/// with a zero on the missing side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermDelta {
    pub term: String,
    pub left: u64,
    pub right: u64,
}

impl TermDelta {
    /// Signed count difference, left minus right.
    #[inline]
    pub fn delta(&self) -> i64 {
        self.left as i64 - self.right as i64
    }
}

/// FrequencyTable
/// Per-document term counts for a whole corpus: the shared input of the
/// TF-IDF, pairwise, topic and sentiment stages.
///
/// Built once per corpus snapshot and never mutated in place; rebuilding
/// from an unchanged corpus yields a byte-identical serialized table.
/// A document that ended up with zero tokens keeps its row (with an empty
/// count map), so `doc_num` always reflects what was actually processed
/// and IDF denominators stay honest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Serialize",
    deserialize = "K: Deserialize<'de> + Eq + Hash"
))]
pub struct FrequencyTable<K = String>
where
    K: Eq + Hash,
{
    #[serde(with = "indexmap::map::serde_seq")]
    docs: IndexMap<K, TermFrequency>,
    mode: TokenMode,
}

impl<K> FrequencyTable<K>
where
    K: Clone + Eq + Hash,
{
    /// Build the table by counting every document of the corpus.
    /// Deterministic: document order and per-document term order follow
    /// the corpus and token order, not a hash order.
    pub fn build(corpus: &Corpus<K>) -> Self {
        let mut docs = IndexMap::with_capacity(corpus.doc_num());
        for (key, tokens) in corpus.iter() {
            let mut freq = TermFrequency::new();
            freq.add_terms(tokens);
            docs.insert(key.clone(), freq);
        }
        Self {
            docs,
            mode: corpus.mode().clone(),
        }
    }

    /// Number of documents, including empty ones.
    #[inline]
    pub fn doc_num(&self) -> usize {
        self.docs.len()
    }

    /// Number of documents with at least one term.
    #[inline]
    pub fn non_empty_doc_num(&self) -> usize {
        self.docs.values().filter(|f| !f.is_empty()).count()
    }

    /// Per-document counts for one key.
    #[inline]
    pub fn get(&self, key: &K) -> Option<&TermFrequency> {
        self.docs.get(key)
    }

    /// Iterate documents in corpus order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&K, &TermFrequency)> {
        self.docs.iter()
    }

    /// The token mode of the underlying corpus.
    #[inline]
    pub fn mode(&self) -> &TokenMode {
        &self.mode
    }

    /// Number of documents containing the term at least once.
    #[inline]
    pub fn doc_freq(&self, term: &str) -> usize {
        self.docs
            .values()
            .filter(|freq| freq.contains_term(term))
            .count()
    }

    /// Distinct terms of the whole table, in first-seen order.
    pub fn vocabulary(&self) -> Vec<&str> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut vocab = Vec::new();
        for freq in self.docs.values() {
            for term in freq.counts().keys() {
                if seen.insert(term.as_str()) {
                    vocab.push(term.as_str());
                }
            }
        }
        vocab
    }

    /// Corpus-wide occurrence counts, in first-seen term order.
    pub fn corpus_counts(&self) -> IndexMap<String, u64> {
        let mut counts: IndexMap<String, u64> = IndexMap::new();
        for freq in self.docs.values() {
            for (term, &count) in freq.counts() {
                *counts.entry(term.clone()).or_insert(0) += count;
            }
        }
        counts
    }

    /// A copy of this table without its empty documents.
    /// The copy's `doc_num` reflects the drop, so later IDF denominators
    /// stay consistent with what is actually scored.
    pub fn drop_empty_docs(&self) -> Self {
        Self {
            docs: self
                .docs
                .iter()
                .filter(|(_, freq)| !freq.is_empty())
                .map(|(key, freq)| (key.clone(), freq.clone()))
                .collect(),
            mode: self.mode.clone(),
        }
    }

    /// Compare corpus-wide counts against another table, for trend
    /// analysis between two corpus snapshots.
    /// Full outer join on `term`: terms missing on a side count as 0 there.
    pub fn diff(&self, other: &Self) -> Vec<TermDelta> {
        let left = self.corpus_counts();
        let right = other.corpus_counts();
        full_join(&left, &right)
            .into_iter()
            .map(|(term, l, r)| TermDelta {
                term: term.clone(),
                left: l.copied().unwrap_or(0),
                right: r.copied().unwrap_or(0),
            })
            .collect()
    }
}
