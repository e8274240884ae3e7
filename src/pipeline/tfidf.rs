use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{MinerError, Result};

use super::frequency::FrequencyTable;

/// TF-IDF Calculation Engine Trait
/// Pluggable weighting strategy for `TfIdfScorer<E>`.
///
/// The default implementation, `DefaultTfIdfEngine`, performs the textbook
/// calculation. Callers wanting sublinear TF, smoothed IDF and so on
/// implement this trait and swap the type parameter.
pub trait TfIdfEngine {
    /// Term frequency of one term within one document.
    /// The scorer guarantees `total > 0` before calling.
    fn tf(count: u64, total: u64) -> f64;

    /// Inverse document frequency of one term across the corpus.
    /// The scorer guarantees `doc_freq >= 1` (the term was observed).
    fn idf(doc_num: usize, doc_freq: usize) -> f64;
}

/// Textbook TF-IDF weighting.
/// `tf = n / total`, `idf = ln(doc_num / doc_freq)`.
///
/// A term present in every document gets `idf = ln(1) = 0` exactly, and
/// therefore `tf_idf = 0` regardless of its raw count. That is the
/// expected result, not an error.
#[derive(Debug, Clone, Default)]
pub struct DefaultTfIdfEngine;

impl TfIdfEngine for DefaultTfIdfEngine {
    #[inline]
    fn tf(count: u64, total: u64) -> f64 {
        count as f64 / total as f64
    }

    #[inline]
    fn idf(doc_num: usize, doc_freq: usize) -> f64 {
        (doc_num as f64 / doc_freq as f64).ln()
    }
}

/// One (document, term) weighting row.
/// `n` and `total` are carried along so consumers can filter degenerate
/// documents without going back to the frequency table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfRecord<K> {
    pub doc: K,
    pub term: String,
    /// Raw occurrence count of the term in the document.
    pub n: u64,
    /// Total term occurrences of the document (TF denominator).
    pub total: u64,
    pub tf: f64,
    pub idf: f64,
    pub tf_idf: f64,
}

/// The full TF-IDF long-form table of a corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfTable<K> {
    pub records: Vec<TfIdfRecord<K>>,
}

impl<K> TfIdfTable<K> {
    /// Sort by weight descending; ties break on lexical term order so a
    /// top-k cut is deterministic.
    pub fn sort_by_weight_desc(&mut self) -> &mut Self {
        self.records.sort_by(|a, b| {
            b.tf_idf
                .total_cmp(&a.tf_idf)
                .then_with(|| a.term.cmp(&b.term))
        });
        self
    }

    /// Top `k` records after `sort_by_weight_desc`.
    pub fn top_k(&mut self, k: usize) -> &[TfIdfRecord<K>] {
        self.sort_by_weight_desc();
        &self.records[..k.min(self.records.len())]
    }

    /// Drop rows from documents with fewer than `min_total` term
    /// occurrences.
    ///
    /// A document whose only term appears once has `tf = 1` and
    /// `tf_idf = idf`, which can rank spuriously high. Filtering short
    /// documents before reading the top ranks is the documented remedy
    /// for that degenerate case.
    pub fn filter_doc_total(&mut self, min_total: u64) -> &mut Self {
        self.records.retain(|r| r.total >= min_total);
        self
    }
}

/// TF-IDF Scorer
/// Walks a `FrequencyTable` and emits one `TfIdfRecord` per
/// (document, term) pair, using engine `E` for the weighting.
///
/// Documents with zero terms fail with `EmptyDocument`: the table keeps
/// their rows to keep `doc_num` honest, so the caller must either remove
/// them from the source corpus or use `FrequencyTable::drop_empty_docs`
/// (which makes the count change observable) before scoring.
#[derive(Debug, Clone, Default)]
pub struct TfIdfScorer<E = DefaultTfIdfEngine>
where
    E: TfIdfEngine,
{
    _marker: PhantomData<E>,
}

impl<E> TfIdfScorer<E>
where
    E: TfIdfEngine,
{
    /// Score every (document, term) pair of the table.
    ///
    /// # Arguments
    /// * `table` - frequency table built from one corpus snapshot
    ///
    /// # Returns
    /// * `TfIdfTable<K>` - long-form records in table order
    pub fn score<K>(table: &FrequencyTable<K>) -> Result<TfIdfTable<K>>
    where
        K: Clone + Eq + Hash + Debug,
    {
        let doc_num = table.doc_num();

        // document frequencies in one pass over the table
        let mut doc_freqs: IndexMap<&str, usize> = IndexMap::new();
        for (_, freq) in table.iter() {
            for term in freq.counts().keys() {
                *doc_freqs.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let mut records = Vec::new();
        for (key, freq) in table.iter() {
            let total = freq.term_sum();
            if total == 0 {
                return Err(MinerError::EmptyDocument {
                    doc: format!("{:?}", key),
                });
            }
            for (term, &count) in freq.counts() {
                let tf = E::tf(count, total);
                let idf = E::idf(doc_num, doc_freqs[term.as_str()]);
                records.push(TfIdfRecord {
                    doc: key.clone(),
                    term: term.clone(),
                    n: count,
                    total,
                    tf,
                    idf,
                    tf_idf: tf * idf,
                });
            }
        }
        Ok(TfIdfTable { records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::corpus::Corpus;
    use crate::pipeline::tokenizer::TokenMode;

    const EPS: f64 = 1e-9;

    fn table_of(pairs: &[(&str, &[&str])]) -> FrequencyTable {
        let mut corpus = Corpus::new(TokenMode::Words);
        for (key, tokens) in pairs {
            corpus.add_doc(
                key.to_string(),
                tokens.iter().map(|t| t.to_string()).collect(),
            );
        }
        FrequencyTable::build(&corpus)
    }

    fn record<'a>(table: &'a TfIdfTable<String>, doc: &str, term: &str) -> &'a TfIdfRecord<String> {
        table
            .records
            .iter()
            .find(|r| r.doc == doc && r.term == term)
            .unwrap()
    }

    #[test]
    fn known_corpus_weights_by_hand() {
        let table = table_of(&[("doc1", &["cat", "sat"]), ("doc2", &["dog", "sat"])]);
        let scored = TfIdfScorer::<DefaultTfIdfEngine>::score(&table).unwrap();

        // "sat" is in both documents: idf = ln(2/2) = 0
        let sat1 = record(&scored, "doc1", "sat");
        assert!(sat1.idf.abs() < EPS);
        assert!(sat1.tf_idf.abs() < EPS);
        let sat2 = record(&scored, "doc2", "sat");
        assert!(sat2.tf_idf.abs() < EPS);

        // "cat" only in doc1: tf_idf = (1/2) * ln(2) ~= 0.3466
        let cat = record(&scored, "doc1", "cat");
        assert!((cat.tf - 0.5).abs() < EPS);
        assert!((cat.tf_idf - 0.5 * 2.0_f64.ln()).abs() < EPS);
        assert!((cat.tf_idf - 0.3466).abs() < 1e-4);
    }

    #[test]
    fn ubiquitous_term_has_zero_weight_regardless_of_count() {
        let table = table_of(&[
            ("a", &["sat", "sat", "sat", "cat"]),
            ("b", &["sat"]),
            ("c", &["sat", "dog"]),
        ]);
        let scored = TfIdfScorer::<DefaultTfIdfEngine>::score(&table).unwrap();
        for r in scored.records.iter().filter(|r| r.term == "sat") {
            assert!(r.idf.abs() < EPS);
            assert!(r.tf_idf.abs() < EPS);
        }
    }

    #[test]
    fn per_document_tf_sums_to_one() {
        let table = table_of(&[
            ("a", &["x", "y", "x", "z", "x"]),
            ("b", &["y"]),
            ("c", &["p", "q", "p", "q"]),
        ]);
        let scored = TfIdfScorer::<DefaultTfIdfEngine>::score(&table).unwrap();
        for doc in ["a", "b", "c"] {
            let sum: f64 = scored
                .records
                .iter()
                .filter(|r| r.doc == doc)
                .map(|r| r.tf)
                .sum();
            assert!((sum - 1.0).abs() < EPS, "tf sum for {doc} was {sum}");
        }
    }

    #[test]
    fn empty_document_is_a_scoring_error() {
        let table = table_of(&[("empty", &[]), ("full", &["word"])]);
        match TfIdfScorer::<DefaultTfIdfEngine>::score(&table) {
            Err(MinerError::EmptyDocument { doc }) => assert!(doc.contains("empty")),
            other => panic!("expected EmptyDocument, got {:?}", other.map(|t| t.records.len())),
        }

        // dropping the empty row makes the remaining corpus scorable,
        // with the smaller doc_num visible in the idf
        let kept = table.drop_empty_docs();
        let scored = TfIdfScorer::<DefaultTfIdfEngine>::score(&kept).unwrap();
        assert!(record(&scored, "full", "word").idf.abs() < EPS); // ln(1/1)
    }

    #[test]
    fn degenerate_single_term_doc_is_filterable() {
        let table = table_of(&[
            ("tiny", &["rare"]),
            ("a", &["common", "common", "other"]),
            ("b", &["common", "thing", "thing"]),
        ]);
        let mut scored = TfIdfScorer::<DefaultTfIdfEngine>::score(&table).unwrap();

        // tf = 1 for the single-term document: tf_idf = idf, ranks first
        let top = scored.top_k(1)[0].clone();
        assert_eq!(top.doc, "tiny");
        assert!((top.tf - 1.0).abs() < EPS);

        scored.filter_doc_total(2);
        assert!(scored.records.iter().all(|r| r.doc != "tiny"));
    }

    #[test]
    fn top_k_tie_break_is_lexical() {
        // two terms with identical weight profiles
        let table = table_of(&[("a", &["zeta", "beta"]), ("b", &["mid", "mid"])]);
        let mut scored = TfIdfScorer::<DefaultTfIdfEngine>::score(&table).unwrap();
        let top = scored.top_k(3);
        assert_eq!(top[0].term, "mid");
        assert!((top[1].tf_idf - top[2].tf_idf).abs() < EPS);
        assert_eq!(top[1].term, "beta");
        assert_eq!(top[2].term, "zeta");
    }
}
