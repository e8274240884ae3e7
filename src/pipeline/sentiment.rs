use std::hash::Hash;

use indexmap::IndexMap;
use num::Num;
use serde::{Deserialize, Serialize};

use crate::utils::join::inner_join;

use super::frequency::FrequencyTable;

/// Categorical lexicon polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Positive,
    Negative,
}

/// Signed-numeric sentiment lexicon (e.g. a -5..5 intensity scale).
/// `V` follows the crate's numeric-parameter convention
/// (`V: Num + Copy + Into<f64>`), so integer scales and float weights
/// both work without conversion at the call site.
///
/// The lexicon is an injected immutable table, never a process-wide
/// singleton: tests run with tiny synthetic lexicons.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(bound(serialize = "V: Serialize", deserialize = "V: Deserialize<'de>"))]
pub struct SignedLexicon<V>
where
    V: Num + Copy,
{
    #[serde(with = "indexmap::map::serde_seq")]
    entries: IndexMap<String, V>,
}

impl<V> SignedLexicon<V>
where
    V: Num + Copy + Into<f64>,
{
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, V)>,
        S: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(term, value)| (term.as_ref().to_string(), value))
                .collect(),
        }
    }

    pub fn insert(&mut self, term: &str, value: V) -> &mut Self {
        self.entries.insert(term.to_string(), value);
        self
    }

    #[inline]
    pub fn value(&self, term: &str) -> Option<V> {
        self.entries.get(term).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn entries(&self) -> &IndexMap<String, V> {
        &self.entries
    }
}

/// Categorical sentiment lexicon (positive/negative word lists).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoricalLexicon {
    #[serde(with = "indexmap::map::serde_seq")]
    entries: IndexMap<String, Polarity>,
}

impl CategoricalLexicon {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Polarity)>,
        S: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(term, polarity)| (term.as_ref().to_string(), polarity))
                .collect(),
        }
    }

    pub fn insert(&mut self, term: &str, polarity: Polarity) -> &mut Self {
        self.entries.insert(term.to_string(), polarity);
        self
    }

    #[inline]
    pub fn polarity(&self, term: &str) -> Option<Polarity> {
        self.entries.get(term).copied()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn entries(&self) -> &IndexMap<String, Polarity> {
        &self.entries
    }
}

/// Aggregated sentiment of one group (document or caller-derived section).
/// `matched` is the number of token occurrences the join matched; a group
/// with `matched == 0` reports a value of 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord<K> {
    pub group: K,
    pub value: f64,
    pub matched: u64,
}

/// Corpus-wide contribution of one lexicon term:
/// `value = lexicon value * total occurrences`, for ranking which terms
/// drive the overall sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermContribution {
    pub term: String,
    pub n: u64,
    pub value: f64,
}

/// Weighted-mean signed sentiment per group:
/// `sum(value * n) / sum(n)` over the terms the lexicon matched.
///
/// The join against the lexicon is an inner join on `term`: tokens absent
/// from the lexicon are excluded, never an error. A zero-match join over
/// a non-empty table is syntactically valid but almost always a
/// normalization mismatch (case, language, token mode), so it is surfaced
/// as a warning-level diagnostic.
pub fn score_signed<K, V>(
    table: &FrequencyTable<K>,
    lexicon: &SignedLexicon<V>,
) -> Vec<SentimentRecord<K>>
where
    K: Clone + Eq + Hash,
    V: Num + Copy + Into<f64>,
{
    let mut records = Vec::with_capacity(table.doc_num());
    let mut matched_total: u64 = 0;

    for (key, freq) in table.iter() {
        let mut weighted_sum = 0.0;
        let mut matched: u64 = 0;
        // inner join: only terms present in both sides contribute
        for (_, &count, &value) in inner_join(freq.counts(), lexicon.entries()) {
            weighted_sum += value.into() * count as f64;
            matched += count;
        }
        let value = if matched == 0 {
            0.0
        } else {
            weighted_sum / matched as f64
        };
        matched_total += matched;
        records.push(SentimentRecord {
            group: key.clone(),
            value,
            matched,
        });
    }

    warn_on_zero_match(table, lexicon.is_empty(), matched_total);
    records
}

/// Corpus-wide signed contribution per lexicon term:
/// `sum(value * n)` across all groups, for contribution ranking.
/// Inner join on `term`, output sorted by absolute contribution
/// descending with lexical tie-break.
pub fn contributions_signed<K, V>(
    table: &FrequencyTable<K>,
    lexicon: &SignedLexicon<V>,
) -> Vec<TermContribution>
where
    K: Clone + Eq + Hash,
    V: Num + Copy + Into<f64>,
{
    let counts = table.corpus_counts();
    let mut matched_total: u64 = 0;
    let mut records: Vec<TermContribution> = inner_join(&counts, lexicon.entries())
        .into_iter()
        .map(|(term, &n, &value)| {
            matched_total += n;
            TermContribution {
                term: term.clone(),
                n,
                value: value.into() * n as f64,
            }
        })
        .collect();
    records.sort_by(|a, b| {
        b.value
            .abs()
            .total_cmp(&a.value.abs())
            .then_with(|| a.term.cmp(&b.term))
    });

    warn_on_zero_match(table, lexicon.is_empty(), matched_total);
    records
}

/// Categorical sentiment per group: occurrences of positive terms minus
/// occurrences of negative terms. Inner join on `term`.
pub fn score_categorical<K>(
    table: &FrequencyTable<K>,
    lexicon: &CategoricalLexicon,
) -> Vec<SentimentRecord<K>>
where
    K: Clone + Eq + Hash,
{
    let mut records = Vec::with_capacity(table.doc_num());
    let mut matched_total: u64 = 0;

    for (key, freq) in table.iter() {
        let mut positive: u64 = 0;
        let mut negative: u64 = 0;
        for (_, &count, &polarity) in inner_join(freq.counts(), lexicon.entries()) {
            match polarity {
                Polarity::Positive => positive += count,
                Polarity::Negative => negative += count,
            }
        }
        let matched = positive + negative;
        matched_total += matched;
        records.push(SentimentRecord {
            group: key.clone(),
            value: positive as f64 - negative as f64,
            matched,
        });
    }

    warn_on_zero_match(table, lexicon.is_empty(), matched_total);
    records
}

/// Zero matches over a non-empty table and lexicon is reported, not
/// raised: the join result stays valid.
fn warn_on_zero_match<K>(table: &FrequencyTable<K>, lexicon_empty: bool, matched_total: u64)
where
    K: Clone + Eq + Hash,
{
    if matched_total == 0 && !lexicon_empty && table.iter().any(|(_, f)| !f.is_empty()) {
        log::warn!(
            "sentiment lexicon matched no terms across {} documents (mode {:?}); \
             likely a normalization mismatch between lexicon and tokenizer",
            table.doc_num(),
            table.mode()
        );
    }
}
