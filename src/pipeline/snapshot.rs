use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::topics::{LdaEngine, LdaPosterior, TopicModel};

/// Encode any snapshotable value (tables, records, model data) to CBOR.
/// The encoding is deterministic for a deterministic value, so a
/// content-hash cache key over these bytes is stable.
pub fn to_cbor_bytes<T>(value: &T) -> Result<Vec<u8>>
where
    T: Serialize,
{
    Ok(serde_cbor::to_vec(value)?)
}

/// Decode a CBOR snapshot produced by `to_cbor_bytes`.
pub fn from_cbor_bytes<T>(bytes: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    Ok(serde_cbor::from_slice(bytes)?)
}

/// Topic Model Data Structure for Serialization
/// A plain serializable form of a fitted `TopicModel`, detached from the
/// engine type parameter so it can be stored and later rehydrated with
/// any engine. Fitting is the expensive step; a collaborator may memoize
/// these bytes keyed by a hash of the matrix, `k` and `seed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicModelData<K> {
    pub docs: Vec<K>,
    pub vocab: Vec<String>,
    pub rows: Vec<Vec<(u32, u64)>>,
    pub posterior: LdaPosterior,
    pub k: usize,
    pub seed: u64,
}

impl<K> TopicModelData<K>
where
    K: Clone + Eq + Hash,
{
    pub fn from_model<E>(model: &TopicModel<K, E>) -> Self
    where
        E: LdaEngine,
    {
        model.to_data()
    }

    /// Rehydrate a model without refitting.
    pub fn into_topic_model<E>(self) -> TopicModel<K, E>
    where
        E: LdaEngine,
    {
        TopicModel::from_data(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::corpus::Corpus;
    use crate::pipeline::dtm::DocTermMatrix;
    use crate::pipeline::frequency::FrequencyTable;
    use crate::pipeline::tokenizer::TokenMode;
    use crate::pipeline::topics::GibbsLdaEngine;

    fn small_table() -> FrequencyTable {
        let mut corpus = Corpus::new(TokenMode::Words);
        corpus.add_doc("d1".to_string(), vec!["a".into(), "b".into(), "a".into()]);
        corpus.add_doc("d2".to_string(), vec!["c".into(), "b".into()]);
        FrequencyTable::build(&corpus)
    }

    #[test]
    fn frequency_table_round_trips_through_cbor() {
        let table = small_table();
        let bytes = to_cbor_bytes(&table).unwrap();
        let restored: FrequencyTable = from_cbor_bytes(&bytes).unwrap();
        assert_eq!(table, restored);
    }

    #[test]
    fn topic_model_data_round_trips_without_refitting() {
        let dtm = DocTermMatrix::from_table(&small_table());
        let model = TopicModel::<String, GibbsLdaEngine>::fit(&dtm, 2, 9).unwrap();

        let data = TopicModelData::from_model(&model);
        let bytes = to_cbor_bytes(&data).unwrap();
        let restored: TopicModelData<String> = from_cbor_bytes(&bytes).unwrap();
        assert_eq!(data, restored);

        let rehydrated = restored.into_topic_model::<GibbsLdaEngine>();
        assert_eq!(rehydrated.posterior(), model.posterior());
        assert_eq!(rehydrated.topic_num(), 2);
        assert_eq!(rehydrated.seed(), 9);
    }

    #[test]
    fn decoding_garbage_is_a_snapshot_error() {
        let err = from_cbor_bytes::<TopicModelData<String>>(&[0xff, 0x00, 0x12]).unwrap_err();
        assert!(matches!(err, crate::error::MinerError::Snapshot(_)));
    }
}
