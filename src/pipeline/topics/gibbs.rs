use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{LdaEngine, LdaPosterior};

/// Collapsed Gibbs sampling LDA engine.
///
/// Symmetric priors, a fixed sweep count, and a seeded `StdRng`, so a
/// given `(matrix, k, seed)` always produces the same posterior. This is
/// the default engine; heavier inference (variational, more sweeps,
/// hyperparameter optimization) plugs in through `LdaEngine`.
#[derive(Debug, Clone, Default)]
pub struct GibbsLdaEngine;

/// Document-topic concentration.
const ALPHA: f64 = 0.1;
/// Topic-term concentration.
const BETA: f64 = 0.01;
/// Gibbs sweeps over every token occurrence.
const SWEEPS: usize = 100;

impl LdaEngine for GibbsLdaEngine {
    fn fit(rows: &[Vec<(u32, u64)>], vocab_len: usize, k: usize, seed: u64) -> LdaPosterior {
        let mut rng = StdRng::seed_from_u64(seed);
        let doc_num = rows.len();
        let v = vocab_len;

        // expand counts into individual token occurrences
        let docs: Vec<Vec<u32>> = rows
            .iter()
            .map(|row| {
                let mut tokens = Vec::new();
                for &(term, count) in row {
                    for _ in 0..count {
                        tokens.push(term);
                    }
                }
                tokens
            })
            .collect();

        let mut topic_word = vec![vec![0u64; v]; k];
        let mut topic_total = vec![0u64; k];
        let mut doc_topic = vec![vec![0u64; k]; doc_num];
        let mut assignments: Vec<Vec<usize>> = Vec::with_capacity(doc_num);

        // random initial assignment
        for (d, tokens) in docs.iter().enumerate() {
            let mut doc_assign = Vec::with_capacity(tokens.len());
            for &w in tokens {
                let topic = rng.random_range(0..k);
                topic_word[topic][w as usize] += 1;
                topic_total[topic] += 1;
                doc_topic[d][topic] += 1;
                doc_assign.push(topic);
            }
            assignments.push(doc_assign);
        }

        let mut weights = vec![0.0f64; k];
        for _sweep in 0..SWEEPS {
            for (d, tokens) in docs.iter().enumerate() {
                for (pos, &w) in tokens.iter().enumerate() {
                    let old = assignments[d][pos];
                    topic_word[old][w as usize] -= 1;
                    topic_total[old] -= 1;
                    doc_topic[d][old] -= 1;

                    // full conditional over topics
                    let mut total = 0.0;
                    for (t, weight) in weights.iter_mut().enumerate() {
                        let word_part = (topic_word[t][w as usize] as f64 + BETA)
                            / (topic_total[t] as f64 + v as f64 * BETA);
                        let doc_part = doc_topic[d][t] as f64 + ALPHA;
                        *weight = word_part * doc_part;
                        total += *weight;
                    }

                    // 累積和から新しいトピックを抽出
                    let mut target = rng.random::<f64>() * total;
                    let mut new = k - 1;
                    for (t, &weight) in weights.iter().enumerate() {
                        if target < weight {
                            new = t;
                            break;
                        }
                        target -= weight;
                    }

                    topic_word[new][w as usize] += 1;
                    topic_total[new] += 1;
                    doc_topic[d][new] += 1;
                    assignments[d][pos] = new;
                }
            }
        }

        // smoothed posterior estimates; each row sums to 1 exactly
        let beta = topic_word
            .iter()
            .zip(topic_total.iter())
            .map(|(counts, &total)| {
                let denom = total as f64 + v as f64 * BETA;
                counts
                    .iter()
                    .map(|&c| (c as f64 + BETA) / denom)
                    .collect()
            })
            .collect();
        let gamma = doc_topic
            .iter()
            .map(|counts| {
                let doc_total: u64 = counts.iter().sum();
                let denom = doc_total as f64 + k as f64 * ALPHA;
                counts
                    .iter()
                    .map(|&c| (c as f64 + ALPHA) / denom)
                    .collect()
            })
            .collect();

        LdaPosterior { beta, gamma }
    }
}
