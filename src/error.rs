use thiserror::Error;

/// Error type for the mining pipeline.
/// Every variant is local and recoverable: the caller fixes the input and
/// retries. Nothing here is process-fatal.
#[derive(Debug, Error)]
pub enum MinerError {
    /// TF was requested for a document whose post-filter token total is 0.
    /// Dividing by the total would be undefined, so the scorer refuses.
    #[error("document {doc} has no terms after filtering")]
    EmptyDocument { doc: String },

    /// The requested topic count is unusable for this matrix.
    /// `k` must be at least 1 and must not exceed the number of non-empty
    /// documents.
    #[error("invalid topic count k={k}: matrix has {non_empty_docs} non-empty documents")]
    InvalidTopicCount { k: usize, non_empty_docs: usize },

    /// A lookup explicitly demanded a term that was never observed.
    /// Plain lookups return an empty result instead; only the `require_*`
    /// variants surface this.
    #[error("term \"{term}\" was never observed in this table")]
    UnknownTerm { term: String },

    /// A snapshot failed to encode or decode.
    #[error("snapshot codec error: {0}")]
    Snapshot(#[from] serde_cbor::Error),
}

pub type Result<T> = std::result::Result<T, MinerError>;
