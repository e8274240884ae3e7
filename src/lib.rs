/// This crate is a text mining engine: a batch pipeline turning raw text
/// into term-weight, co-occurrence, topic and sentiment tables.
///
/// Data flows strictly downstream:
/// raw text -> tokens -> frequency table -> {tf-idf, pairwise statistics,
/// topic model, sentiment}. Only the frequency table is shared by the
/// later stages, and every stage returns a new, independently owned
/// table; nothing mutates shared state. All inputs (stop words, lexicons)
/// are injected explicitly, never read from process-wide globals.
pub mod pipeline;
pub mod utils;
pub mod error;

/// Tokenizer
/// Splits raw lines into normalized tokens under a `TokenMode`:
/// - `Words`: unicode word splitting, lowercasing, stop-word removal
/// - `Ngrams(n)`: sliding windows of n words, space-joined into one term
/// - `Sentences`: locale-aware sentence units (documented as lossy on
///   unusual encodings)
///
/// Pure punctuation and numeric tokens are dropped unless explicitly
/// requested. The stop-word set is supplied by the caller.
pub use pipeline::tokenizer::{TokenMode, Tokenizer};

/// Corpus
/// An ordered mapping from document key to token sequence, tagged with
/// the token mode it was produced under. Immutable once assembled;
/// re-tokenizing produces a new corpus.
pub use pipeline::corpus::Corpus;

/// Term Frequency structure
/// Occurrence counts of each term within one document, with the running
/// total used as the TF denominator. The per-document building block of
/// `FrequencyTable`.
pub use pipeline::frequency::TermFrequency;

/// Frequency Table
/// Per-document term counts for a whole corpus: the one table every
/// later stage (TF-IDF, pairwise, topics, sentiment) reads. Built once
/// per corpus snapshot, never mutated in place; rebuilding from an
/// unchanged corpus is byte-identical under serialization.
pub use pipeline::frequency::{FrequencyTable, TermDelta};

/// TF-IDF Scorer and Calculation Engine Trait
/// `TfIdfScorer<E>` emits one `TfIdfRecord` per (document, term) pair.
/// The weighting strategy is the pluggable `TfIdfEngine`; the provided
/// `DefaultTfIdfEngine` performs the textbook calculation
/// (`tf = n / total`, `idf = ln(docs / docs_with_term)`).
///
/// A term present in every document weighs exactly 0. A document with no
/// terms fails with `EmptyDocument` instead of dividing by zero.
pub use pipeline::tfidf::{DefaultTfIdfEngine, TfIdfEngine, TfIdfRecord, TfIdfScorer, TfIdfTable};

/// Pairwise Statistics Engine
/// `count_pairs` counts, per term pair, the groups where both terms
/// co-occur (upper triangle only). `correlate_pairs` computes the phi
/// coefficient of binary presence vectors across groups, pruning terms
/// below a mandatory minimum group-presence before the O(n²) pass.
/// Output order is deterministic: statistic descending, lexical
/// tie-break.
pub use pipeline::pairwise::{
    correlate_pairs, count_pairs, PairCorrelation, PairCorrelationTable, PairCount, PairCountTable,
};

/// Document-Term Matrix
/// Sparse counts in matrix form, the input of topic modeling.
pub use pipeline::dtm::DocTermMatrix;

/// Topic Model and LDA Engine Trait
/// `TopicModel<K, E>` validates the topic count, fixes the seed, runs the
/// engine and exposes the Beta (topic, term) and Gamma (document, topic)
/// distributions in normalized long form, plus per-token topic
/// assignments for evaluation against ground-truth labels.
///
/// Inference is a pluggable capability (`LdaEngine`); the default is a
/// seeded collapsed Gibbs sampler, `GibbsLdaEngine`.
pub use pipeline::topics::{
    BetaRecord, GammaRecord, GibbsLdaEngine, LdaEngine, LdaPosterior, TopicAssignment, TopicModel,
};

/// Sentiment Scorer
/// Joins a frequency table against an injected lexicon (inner join on
/// `term`) and aggregates per group. Signed lexicons support two named
/// modes: weighted mean per group (`score_signed`) and per-term
/// contribution ranking (`contributions_signed`). Categorical lexicons
/// score positive minus negative occurrences (`score_categorical`).
/// A zero-match join is valid and reported as a warning-level
/// diagnostic, not an error.
pub use pipeline::sentiment::{
    contributions_signed, score_categorical, score_signed, CategoricalLexicon, Polarity,
    SentimentRecord, SignedLexicon, TermContribution,
};

/// Snapshots
/// CBOR value snapshots for the expensive artifacts (frequency tables,
/// fitted topic models), so a collaborator can memoize them keyed by a
/// content hash. The pipeline itself stays stateless.
pub use pipeline::snapshot::{from_cbor_bytes, to_cbor_bytes, TopicModelData};

/// Error type of the pipeline
/// `EmptyDocument`, `InvalidTopicCount`, `UnknownTerm` and snapshot codec
/// failures. Everything is local and recoverable by fixing the inputs.
pub use error::{MinerError, Result};
