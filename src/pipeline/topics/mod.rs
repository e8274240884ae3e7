pub mod gibbs;

use std::hash::Hash;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::error::{MinerError, Result};

use super::dtm::DocTermMatrix;
use super::snapshot::TopicModelData;

pub use gibbs::GibbsLdaEngine;

/// Posterior of a fitted model in matrix form.
/// `beta[topic][term_idx]` and `gamma[doc_idx][topic]`; every row of both
/// matrices sums to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LdaPosterior {
    pub beta: Vec<Vec<f64>>,
    pub gamma: Vec<Vec<f64>>,
}

/// LDA Inference Engine Trait
/// The inference algorithm is a pluggable capability: this crate ships a
/// collapsed Gibbs sampler (`GibbsLdaEngine`), and any other
/// implementation (variational, external library binding) can be swapped
/// in through the type parameter of `TopicModel`.
pub trait LdaEngine {
    /// Fit `k` topics over the sparse rows of a document-term matrix.
    /// Implementations must be deterministic for a fixed `seed` and must
    /// return row-stochastic `beta` and `gamma`.
    fn fit(rows: &[Vec<(u32, u64)>], vocab_len: usize, k: usize, seed: u64) -> LdaPosterior;
}

/// Per-topic-per-term probability row (long form).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetaRecord {
    pub topic: usize,
    pub term: String,
    pub beta: f64,
}

/// Per-document-per-topic probability row (long form).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GammaRecord<K> {
    pub doc: K,
    pub topic: usize,
    pub gamma: f64,
}

/// One token occurrence mapped to its document's most probable topic,
/// for confusion-matrix evaluation against known document labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicAssignment<K> {
    pub doc: K,
    pub term: String,
    /// Occurrences of the term in the document, all assigned together.
    pub n: u64,
    pub topic: usize,
}

/// Topic Model
/// A fitted LDA-style model over a document-term matrix, exposing the
/// Beta (topic, term) and Gamma (document, topic) distributions in
/// normalized long form.
///
/// The wrapper validates the topic count, fixes the random seed for
/// reproducibility, and keeps the matrix content needed to map token
/// occurrences back to topics. Inference itself is delegated to the
/// engine `E`.
#[derive(Debug, Clone)]
pub struct TopicModel<K, E = GibbsLdaEngine>
where
    E: LdaEngine,
{
    docs: Vec<K>,
    vocab: Vec<String>,
    rows: Vec<Vec<(u32, u64)>>,
    posterior: LdaPosterior,
    k: usize,
    seed: u64,
    _marker: PhantomData<E>,
}

impl<K, E> TopicModel<K, E>
where
    K: Clone + Eq + Hash,
    E: LdaEngine,
{
    /// Fit the model.
    ///
    /// # Arguments
    /// * `dtm` - document-term matrix
    /// * `k` - topic count, `1 <= k <= non-empty documents`
    /// * `seed` - random seed, fixed for reproducibility
    ///
    /// # Returns
    /// * `TopicModel` - fitted model
    pub fn fit(dtm: &DocTermMatrix<K>, k: usize, seed: u64) -> Result<Self> {
        let non_empty = dtm.non_empty_doc_num();
        if k < 1 || k > non_empty {
            return Err(MinerError::InvalidTopicCount {
                k,
                non_empty_docs: non_empty,
            });
        }
        let posterior = E::fit(dtm.rows(), dtm.vocab_size(), k, seed);
        Ok(Self {
            docs: dtm.docs().to_vec(),
            vocab: dtm.vocab().to_vec(),
            rows: dtm.rows().to_vec(),
            posterior,
            k,
            seed,
            _marker: PhantomData,
        })
    }

    /// Detach a plain serializable form (see `pipeline::snapshot`).
    pub fn to_data(&self) -> TopicModelData<K> {
        TopicModelData {
            docs: self.docs.clone(),
            vocab: self.vocab.clone(),
            rows: self.rows.clone(),
            posterior: self.posterior.clone(),
            k: self.k,
            seed: self.seed,
        }
    }

    /// Rebuild a model from its stored form without refitting.
    pub fn from_data(data: TopicModelData<K>) -> Self {
        Self {
            docs: data.docs,
            vocab: data.vocab,
            rows: data.rows,
            posterior: data.posterior,
            k: data.k,
            seed: data.seed,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn topic_num(&self) -> usize {
        self.k
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn posterior(&self) -> &LdaPosterior {
        &self.posterior
    }

    /// Beta table in long form: one row per (topic, term).
    pub fn beta(&self) -> Vec<BetaRecord> {
        let mut records = Vec::with_capacity(self.k * self.vocab.len());
        for (topic, row) in self.posterior.beta.iter().enumerate() {
            for (idx, &beta) in row.iter().enumerate() {
                records.push(BetaRecord {
                    topic,
                    term: self.vocab[idx].clone(),
                    beta,
                });
            }
        }
        records
    }

    /// Gamma table in long form: one row per (document, topic).
    pub fn gamma(&self) -> Vec<GammaRecord<K>> {
        let mut records = Vec::with_capacity(self.docs.len() * self.k);
        for (d, row) in self.posterior.gamma.iter().enumerate() {
            for (topic, &gamma) in row.iter().enumerate() {
                records.push(GammaRecord {
                    doc: self.docs[d].clone(),
                    topic,
                    gamma,
                });
            }
        }
        records
    }

    /// Top `n` terms of one topic by beta, ties in lexical order.
    pub fn top_terms(&self, topic: usize, n: usize) -> Vec<(String, f64)> {
        let Some(row) = self.posterior.beta.get(topic) else {
            return Vec::new();
        };
        let mut terms: Vec<(String, f64)> = row
            .iter()
            .enumerate()
            .map(|(idx, &beta)| (self.vocab[idx].clone(), beta))
            .collect();
        terms.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        terms.truncate(n);
        terms
    }

    /// Most probable topic of one document row: argmax over its gamma
    /// row, ties broken by the lowest topic index.
    pub fn dominant_topic(&self, doc_idx: usize) -> Option<usize> {
        let row = self.posterior.gamma.get(doc_idx)?;
        let mut best = 0;
        for (topic, &gamma) in row.iter().enumerate() {
            if gamma > row[best] {
                best = topic;
            }
        }
        Some(best)
    }

    /// Dominant topic per document, in matrix order.
    pub fn dominant_topics(&self) -> Vec<(K, usize)> {
        self.docs
            .iter()
            .enumerate()
            .filter_map(|(idx, key)| self.dominant_topic(idx).map(|t| (key.clone(), t)))
            .collect()
    }

    /// Assign every token occurrence to its document's most probable
    /// topic. Within a document all occurrences share the dominant topic,
    /// so each (doc, term) pair is emitted once with its count.
    pub fn assign(&self) -> Vec<TopicAssignment<K>> {
        let mut out = Vec::new();
        for (d, row) in self.rows.iter().enumerate() {
            let Some(topic) = self.dominant_topic(d) else {
                continue;
            };
            for &(idx, count) in row {
                out.push(TopicAssignment {
                    doc: self.docs[d].clone(),
                    term: self.vocab[idx as usize].clone(),
                    n: count,
                    topic,
                });
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::corpus::Corpus;
    use crate::pipeline::frequency::FrequencyTable;
    use crate::pipeline::tokenizer::TokenMode;

    const EPS: f64 = 1e-9;

    /// Two clearly separated vocabularies, several documents each.
    fn two_cluster_dtm() -> DocTermMatrix<String> {
        let mut corpus = Corpus::new(TokenMode::Words);
        let fish = ["fish", "river", "water", "fin"];
        let star = ["star", "orbit", "light", "sky"];
        for i in 0..6 {
            let words: Vec<String> = fish
                .iter()
                .cycle()
                .skip(i)
                .take(8)
                .map(|t| t.to_string())
                .collect();
            corpus.add_doc(format!("fish{i}"), words);
            let words: Vec<String> = star
                .iter()
                .cycle()
                .skip(i)
                .take(8)
                .map(|t| t.to_string())
                .collect();
            corpus.add_doc(format!("star{i}"), words);
        }
        DocTermMatrix::from_table(&FrequencyTable::build(&corpus))
    }

    #[test]
    fn rejects_unusable_topic_counts() {
        let dtm = two_cluster_dtm();
        assert!(matches!(
            TopicModel::<String>::fit(&dtm, 0, 7),
            Err(MinerError::InvalidTopicCount { k: 0, .. })
        ));
        assert!(matches!(
            TopicModel::<String>::fit(&dtm, 13, 7),
            Err(MinerError::InvalidTopicCount { k: 13, non_empty_docs: 12 })
        ));
        assert!(TopicModel::<String>::fit(&dtm, 12, 7).is_ok());
    }

    #[test]
    fn beta_and_gamma_rows_are_stochastic() {
        let dtm = two_cluster_dtm();
        let model = TopicModel::<String>::fit(&dtm, 2, 42).unwrap();

        for row in &model.posterior().beta {
            let sum: f64 = row.iter().sum();
            assert!((sum - 1.0).abs() < EPS, "beta row sum {sum}");
            assert!(row.iter().all(|&p| p > 0.0));
        }
        for row in &model.posterior().gamma {
            let sum: f64 = row.iter().sum();
            assert!((sum - 1.0).abs() < EPS, "gamma row sum {sum}");
        }

        // long forms agree with the matrices
        assert_eq!(model.beta().len(), 2 * dtm.vocab_size());
        assert_eq!(model.gamma().len(), dtm.doc_num() * 2);
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let dtm = two_cluster_dtm();
        let a = TopicModel::<String>::fit(&dtm, 2, 42).unwrap();
        let b = TopicModel::<String>::fit(&dtm, 2, 42).unwrap();
        assert_eq!(a.posterior(), b.posterior());
    }

    #[test]
    fn separated_clusters_land_in_different_topics() {
        let dtm = two_cluster_dtm();
        let model = TopicModel::<String>::fit(&dtm, 2, 42).unwrap();

        let topics = model.dominant_topics();
        let fish_topic = topics
            .iter()
            .find(|(doc, _)| doc == "fish0")
            .map(|(_, t)| *t)
            .unwrap();
        let star_topic = topics
            .iter()
            .find(|(doc, _)| doc == "star0")
            .map(|(_, t)| *t)
            .unwrap();
        assert_ne!(fish_topic, star_topic);

        // every fish document should side with fish0
        for (doc, topic) in &topics {
            if doc.starts_with("fish") {
                assert_eq!(*topic, fish_topic, "{doc} strayed");
            } else {
                assert_eq!(*topic, star_topic, "{doc} strayed");
            }
        }
    }

    #[test]
    fn assign_covers_every_token_occurrence() {
        let dtm = two_cluster_dtm();
        let model = TopicModel::<String>::fit(&dtm, 2, 42).unwrap();

        let assignments = model.assign();
        let assigned_tokens: u64 = assignments.iter().map(|a| a.n).sum();
        let matrix_tokens: u64 = dtm
            .rows()
            .iter()
            .flat_map(|row| row.iter().map(|&(_, c)| c))
            .sum();
        assert_eq!(assigned_tokens, matrix_tokens);

        // all rows of one document share its dominant topic
        for a in &assignments {
            let idx = dtm.docs().iter().position(|d| d == &a.doc).unwrap();
            assert_eq!(a.topic, model.dominant_topic(idx).unwrap());
        }
    }

    #[test]
    fn dominant_topic_ties_pick_the_lowest_index() {
        // an empty-row document gets a uniform gamma from the engine,
        // which must resolve to topic 0
        let mut corpus = Corpus::new(TokenMode::Words);
        corpus.add_doc("a".to_string(), vec!["x".into(), "y".into()]);
        corpus.add_doc("b".to_string(), vec!["y".into(), "z".into()]);
        corpus.add_doc("empty".to_string(), vec![]);
        let dtm = DocTermMatrix::from_table(&FrequencyTable::build(&corpus));

        let model = TopicModel::<String>::fit(&dtm, 2, 1).unwrap();
        assert_eq!(model.dominant_topic(2), Some(0));
    }
}
