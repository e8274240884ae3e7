use std::collections::HashMap;
use std::hash::Hash;

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{MinerError, Result};

use super::frequency::FrequencyTable;

/// Co-occurrence count of one term pair.
/// `n` is the number of groups in which both terms appear at least once.
/// Symmetric by construction: only the `term_a < term_b` ordering is
/// stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairCount {
    pub term_a: String,
    pub term_b: String,
    pub n: u64,
}

/// Phi-coefficient correlation of one term pair's binary presence vectors
/// across all groups. Stored in `term_a < term_b` order only; the value is
/// identical for both orderings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairCorrelation {
    pub term_a: String,
    pub term_b: String,
    pub correlation: f64,
}

/// Result table of `count_pairs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairCountTable {
    pub records: Vec<PairCount>,
}

/// Result table of `correlate_pairs`, pre-sorted by the engine
/// (correlation descending, ties in lexical pair order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairCorrelationTable {
    pub records: Vec<PairCorrelation>,
}

impl PairCountTable {
    /// Sort by count descending; ties break on lexical `(term_a, term_b)`
    /// so a top-k cut is deterministic.
    pub fn sort_by_count_desc(&mut self) -> &mut Self {
        self.records.sort_by(|a, b| {
            b.n.cmp(&a.n)
                .then_with(|| a.term_a.cmp(&b.term_a))
                .then_with(|| a.term_b.cmp(&b.term_b))
        });
        self
    }

    /// All pairs involving `term`, in table order.
    /// A never-observed term yields an empty vector, not an error.
    pub fn pairs_of(&self, term: &str) -> Vec<&PairCount> {
        self.records
            .iter()
            .filter(|r| r.term_a == term || r.term_b == term)
            .collect()
    }

    /// Like `pairs_of`, but the caller demands the term to exist in the
    /// table; an absent term is `UnknownTerm`.
    pub fn require_pairs_of(&self, term: &str) -> Result<Vec<&PairCount>> {
        let pairs = self.pairs_of(term);
        if pairs.is_empty() {
            return Err(MinerError::UnknownTerm {
                term: term.to_string(),
            });
        }
        Ok(pairs)
    }
}

impl PairCorrelationTable {
    /// Sort by correlation descending; ties break on lexical
    /// `(term_a, term_b)`.
    pub fn sort_by_correlation_desc(&mut self) -> &mut Self {
        self.records.sort_by(|a, b| {
            b.correlation
                .total_cmp(&a.correlation)
                .then_with(|| a.term_a.cmp(&b.term_a))
                .then_with(|| a.term_b.cmp(&b.term_b))
        });
        self
    }

    /// Correlation of one pair, queried in either order.
    pub fn correlation_of(&self, term_x: &str, term_y: &str) -> Option<f64> {
        let (a, b) = if term_x <= term_y {
            (term_x, term_y)
        } else {
            (term_y, term_x)
        };
        self.records
            .iter()
            .find(|r| r.term_a == a && r.term_b == b)
            .map(|r| r.correlation)
    }

    /// All pairs involving `term`, empty for a never-observed term.
    pub fn pairs_of(&self, term: &str) -> Vec<&PairCorrelation> {
        self.records
            .iter()
            .filter(|r| r.term_a == term || r.term_b == term)
            .collect()
    }

    /// Like `pairs_of`, but an absent term is `UnknownTerm`.
    pub fn require_pairs_of(&self, term: &str) -> Result<Vec<&PairCorrelation>> {
        let pairs = self.pairs_of(term);
        if pairs.is_empty() {
            return Err(MinerError::UnknownTerm {
                term: term.to_string(),
            });
        }
        Ok(pairs)
    }
}

/// Count, per term pair, the number of groups where both terms co-occur.
///
/// The grouping key is whatever the caller built the table with: document
/// ids, or derived section ids such as `line_number / section_size`.
/// Output is sorted by count descending with lexical tie-break.
pub fn count_pairs<G>(table: &FrequencyTable<G>) -> PairCountTable
where
    G: Clone + Eq + Hash,
{
    let mut counts: HashMap<(String, String), u64> = HashMap::new();
    for (_, freq) in table.iter() {
        let mut terms = freq.term_set_ref_str();
        terms.sort_unstable();
        for (i, &a) in terms.iter().enumerate() {
            for &b in &terms[i + 1..] {
                *counts
                    .entry((a.to_string(), b.to_string()))
                    .or_insert(0) += 1;
            }
        }
    }

    let records = counts
        .into_iter()
        .map(|((term_a, term_b), n)| PairCount { term_a, term_b, n })
        .collect();
    let mut out = PairCountTable { records };
    out.sort_by_count_desc();
    out
}

/// Correlate, per term pair, the binary presence vectors across groups
/// (phi coefficient, i.e. Pearson on 0/1 vectors).
///
/// Terms present in fewer than `min_occurrences` groups are pruned before
/// the pairwise pass. The pruning is mandatory for tractability: the pass
/// is O(distinct_terms²). It is sharded over the first term with rayon;
/// shards emit independent rows and the merged output is sorted
/// (correlation descending, lexical tie-break), so the result is
/// deterministic regardless of scheduling.
///
/// Pairs whose phi denominator is zero (a term present in every group or
/// in none) are skipped: their correlation is undefined.
pub fn correlate_pairs<G>(table: &FrequencyTable<G>, min_occurrences: u64) -> PairCorrelationTable
where
    G: Clone + Eq + Hash + Sync,
{
    let group_num = table.doc_num();

    // presence lists per term, pruned by group-presence threshold
    let mut presence: IndexMap<&str, Vec<u32>> = IndexMap::new();
    for (idx, (_, freq)) in table.iter().enumerate() {
        for term in freq.counts().keys() {
            presence.entry(term.as_str()).or_default().push(idx as u32);
        }
    }
    let mut terms: Vec<(&str, &Vec<u32>)> = presence
        .iter()
        .filter(|(_, groups)| groups.len() as u64 >= min_occurrences)
        .map(|(term, groups)| (*term, groups))
        .collect();
    // 辞書順に並べてからペアを張る (term_a < term_b を保証)
    terms.sort_unstable_by_key(|(term, _)| *term);

    let n = group_num as f64;
    let mut records: Vec<PairCorrelation> = (0..terms.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            let (term_a, groups_a) = terms[i];
            terms[i + 1..].iter().filter_map(move |&(term_b, groups_b)| {
                let n_a = groups_a.len() as f64;
                let n_b = groups_b.len() as f64;
                let denom = n_a * n_b * (n - n_a) * (n - n_b);
                if denom == 0.0 {
                    return None;
                }
                let n_ab = intersection_len(groups_a, groups_b) as f64;
                let phi = (n * n_ab - n_a * n_b) / denom.sqrt();
                Some(PairCorrelation {
                    term_a: term_a.to_string(),
                    term_b: term_b.to_string(),
                    correlation: phi,
                })
            })
        })
        .collect();

    records.sort_by(|a, b| {
        b.correlation
            .total_cmp(&a.correlation)
            .then_with(|| a.term_a.cmp(&b.term_a))
            .then_with(|| a.term_b.cmp(&b.term_b))
    });
    PairCorrelationTable { records }
}

/// Two-pointer intersection size of ascending index lists.
#[inline]
fn intersection_len(a: &[u32], b: &[u32]) -> usize {
    let mut count = 0;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                count += 1;
                i += 1;
                j += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::corpus::Corpus;
    use crate::pipeline::tokenizer::TokenMode;

    const EPS: f64 = 1e-9;

    fn table_of(groups: &[&[&str]]) -> FrequencyTable<usize> {
        let mut corpus: Corpus<usize> = Corpus::new(TokenMode::Words);
        for (idx, tokens) in groups.iter().enumerate() {
            corpus.add_doc(idx, tokens.iter().map(|t| t.to_string()).collect());
        }
        FrequencyTable::build(&corpus)
    }

    #[test]
    fn pair_counts_are_upper_triangle_only() {
        let table = table_of(&[&["cat", "sat"], &["cat", "sat", "dog"], &["dog"]]);
        let counts = count_pairs(&table);

        for r in &counts.records {
            assert!(r.term_a < r.term_b, "{} !< {}", r.term_a, r.term_b);
        }
        // no (b, a) duplicate of any (a, b)
        for r in &counts.records {
            assert!(!counts
                .records
                .iter()
                .any(|o| o.term_a == r.term_b && o.term_b == r.term_a));
        }

        let cat_sat = counts
            .records
            .iter()
            .find(|r| r.term_a == "cat" && r.term_b == "sat")
            .unwrap();
        assert_eq!(cat_sat.n, 2);
    }

    #[test]
    fn count_in_a_group_needs_both_terms_once_only() {
        // repeated occurrences inside one group still count the group once
        let table = table_of(&[&["a", "a", "b", "b", "b"]]);
        let counts = count_pairs(&table);
        assert_eq!(counts.records.len(), 1);
        assert_eq!(counts.records[0].n, 1);
    }

    #[test]
    fn perfectly_correlated_and_anticorrelated_pairs() {
        // x and y always together, z exactly where they are not
        let table = table_of(&[
            &["x", "y"],
            &["x", "y"],
            &["z"],
            &["z"],
        ]);
        let corr = correlate_pairs(&table, 1);

        let xy = corr.correlation_of("x", "y").unwrap();
        assert!((xy - 1.0).abs() < EPS);
        let xz = corr.correlation_of("x", "z").unwrap();
        assert!((xz + 1.0).abs() < EPS);
    }

    #[test]
    fn correlation_is_symmetric_under_query_order() {
        let table = table_of(&[&["a", "b"], &["a"], &["b"], &["a", "b"]]);
        let corr = correlate_pairs(&table, 1);
        let ab = corr.correlation_of("a", "b").unwrap();
        let ba = corr.correlation_of("b", "a").unwrap();
        assert!((ab - ba).abs() < EPS);
    }

    #[test]
    fn min_occurrences_prunes_rare_terms() {
        // "rare" appears in 1 of 1000 groups, "x"/"y" in half of them
        let mut groups: Vec<Vec<&str>> = Vec::new();
        for i in 0..1000 {
            if i == 0 {
                groups.push(vec!["rare", "x", "y"]);
            } else if i % 2 == 0 {
                groups.push(vec!["x", "y"]);
            } else {
                groups.push(vec!["filler"]);
            }
        }
        let refs: Vec<&[&str]> = groups.iter().map(|g| g.as_slice()).collect();
        let table = table_of(&refs);

        let corr = correlate_pairs(&table, 5);
        assert!(corr.pairs_of("rare").is_empty());
        assert!(corr.correlation_of("x", "y").is_some());
        assert!(matches!(
            corr.require_pairs_of("rare"),
            Err(MinerError::UnknownTerm { .. })
        ));
    }

    #[test]
    fn term_in_every_group_has_no_defined_correlation() {
        let table = table_of(&[&["always", "a"], &["always", "b"], &["always"]]);
        let corr = correlate_pairs(&table, 1);
        assert!(corr.pairs_of("always").is_empty());
    }

    #[test]
    fn unknown_term_lookup_is_empty_not_fatal() {
        let table = table_of(&[&["a", "b"]]);
        let counts = count_pairs(&table);
        assert!(counts.pairs_of("never").is_empty());
        assert!(matches!(
            counts.require_pairs_of("never"),
            Err(MinerError::UnknownTerm { .. })
        ));
    }

    #[test]
    fn output_order_is_deterministic() {
        let table = table_of(&[&["a", "b", "c"], &["a", "b"], &["c", "a"]]);
        let first = correlate_pairs(&table, 1);
        let second = correlate_pairs(&table, 1);
        assert_eq!(first.records, second.records);

        // ties in the count table resolve lexically
        let counts = count_pairs(&table);
        for window in counts.records.windows(2) {
            assert!(
                window[0].n > window[1].n
                    || (window[0].n == window[1].n
                        && (window[0].term_a.as_str(), window[0].term_b.as_str())
                            <= (window[1].term_a.as_str(), window[1].term_b.as_str()))
            );
        }
    }
}
