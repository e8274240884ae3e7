use text_miner::{
    from_cbor_bytes, to_cbor_bytes, Corpus, DocTermMatrix, FrequencyTable, GibbsLdaEngine,
    TokenMode, Tokenizer, TopicModel, TopicModelData,
};

fn main() {
    let tokenizer = Tokenizer::new().with_stop_words(["the", "a", "of", "and", "in"]);

    // two thematic clusters of documents
    let texts = [
        ("sea1", "The whale dove in the cold sea, the waves closed over the ship."),
        ("sea2", "Sailors watched the sea and the waves from the deck of the ship."),
        ("sea3", "A storm drove the ship across the sea, waves against the hull."),
        ("sky1", "The star burned in the night sky, its light crossing the void."),
        ("sky2", "Astronomers mapped the sky, star by star, light by light."),
        ("sky3", "A comet crossed the night sky trailing light and dust."),
    ];

    let mut corpus = Corpus::new(TokenMode::Words);
    for (key, text) in texts {
        corpus.add_doc(key.to_string(), tokenizer.tokenize(&[text], &TokenMode::Words));
    }

    let table = FrequencyTable::build(&corpus);
    let dtm = DocTermMatrix::from_table(&table);

    // fit two topics with a fixed seed
    let model = TopicModel::<String, GibbsLdaEngine>::fit(&dtm, 2, 42).unwrap();

    for topic in 0..model.topic_num() {
        println!("topic {topic}:");
        for (term, beta) in model.top_terms(topic, 5) {
            println!("  {:<12} beta={:.4}", term, beta);
        }
    }

    println!("\ndominant topic per document:");
    for (doc, topic) in model.dominant_topics() {
        println!("  {:<6} -> topic {}", doc, topic);
    }

    // snapshot the fitted model and rehydrate it without refitting
    let bytes = to_cbor_bytes(&model.to_data()).unwrap();
    println!("\nsnapshot size: {} bytes", bytes.len());
    let restored: TopicModelData<String> = from_cbor_bytes(&bytes).unwrap();
    let model_again = restored.into_topic_model::<GibbsLdaEngine>();
    assert_eq!(model_again.posterior(), model.posterior());
    println!("rehydrated model matches the fitted one");
}
