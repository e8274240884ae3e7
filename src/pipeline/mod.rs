pub mod corpus;
pub mod dtm;
pub mod frequency;
pub mod pairwise;
pub mod sentiment;
pub mod snapshot;
pub mod tfidf;
pub mod tokenizer;
pub mod topics;
