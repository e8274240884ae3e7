use std::hash::Hash;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::frequency::FrequencyTable;

/// Sparse document-term matrix.
/// Rows follow the frequency table's document order; each row holds
/// `(term_index, count)` pairs in the table's term order. Empty documents
/// keep an empty row so row indices line up with `docs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocTermMatrix<K> {
    docs: Vec<K>,
    vocab: Vec<String>,
    rows: Vec<Vec<(u32, u64)>>,
}

impl<K> DocTermMatrix<K>
where
    K: Clone + Eq + Hash,
{
    /// Build the matrix from a frequency table.
    /// The vocabulary is the table's first-seen term order, so the same
    /// table always produces the same index assignment.
    pub fn from_table(table: &FrequencyTable<K>) -> Self {
        let mut term_index: IndexMap<&str, u32> = IndexMap::new();
        let mut rows = Vec::with_capacity(table.doc_num());
        let mut docs = Vec::with_capacity(table.doc_num());

        for (key, freq) in table.iter() {
            let mut row = Vec::with_capacity(freq.term_num());
            for (term, &count) in freq.counts() {
                let next = term_index.len() as u32;
                let idx = *term_index.entry(term.as_str()).or_insert(next);
                row.push((idx, count));
            }
            rows.push(row);
            docs.push(key.clone());
        }

        let vocab = term_index.keys().map(|t| t.to_string()).collect();
        Self { docs, vocab, rows }
    }

    #[inline]
    pub fn doc_num(&self) -> usize {
        self.docs.len()
    }

    #[inline]
    pub fn non_empty_doc_num(&self) -> usize {
        self.rows.iter().filter(|r| !r.is_empty()).count()
    }

    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    #[inline]
    pub fn docs(&self) -> &[K] {
        &self.docs
    }

    #[inline]
    pub fn vocab(&self) -> &[String] {
        &self.vocab
    }

    #[inline]
    pub fn rows(&self) -> &[Vec<(u32, u64)>] {
        &self.rows
    }

    /// Term string for a vocabulary index.
    #[inline]
    pub fn term(&self, idx: u32) -> Option<&str> {
        self.vocab.get(idx as usize).map(|t| t.as_str())
    }
}
