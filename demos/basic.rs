use text_miner::{
    contributions_signed, correlate_pairs, count_pairs, score_signed, Corpus, DefaultTfIdfEngine,
    FrequencyTable, SignedLexicon, TfIdfScorer, TokenMode, Tokenizer,
};

fn main() {
    // tokenize a tiny corpus
    let tokenizer = Tokenizer::new().with_stop_words(["the", "a", "of", "and"]);
    let texts = [
        ("doc1", "The cat sat on the mat. A good nap, and a good dream."),
        ("doc2", "The dog sat by the door. A bad storm raged outside."),
        ("doc3", "The cat and the dog sat together. Good times."),
    ];

    let mut corpus = Corpus::new(TokenMode::Words);
    for (key, text) in texts {
        corpus.add_doc(key.to_string(), tokenizer.tokenize(&[text], &TokenMode::Words));
    }

    // the shared table every later stage reads
    let table = FrequencyTable::build(&corpus);

    // tf-idf: which terms characterize which document
    let mut weights = TfIdfScorer::<DefaultTfIdfEngine>::score(&table).unwrap();
    println!("top tf-idf terms:");
    for record in weights.top_k(5) {
        println!(
            "  {:<8} {:<8} tf_idf={:.4}",
            record.doc, record.term, record.tf_idf
        );
    }

    // pairwise statistics across documents
    let mut pairs = count_pairs(&table);
    pairs.sort_by_count_desc();
    println!("\nco-occurring pairs:");
    for record in pairs.records.iter().take(5) {
        println!("  ({}, {}) in {} documents", record.term_a, record.term_b, record.n);
    }

    let correlations = correlate_pairs(&table, 2);
    println!("\nphi correlations (terms in >= 2 documents):");
    for record in correlations.records.iter().take(5) {
        println!(
            "  ({}, {}) phi={:+.3}",
            record.term_a, record.term_b, record.correlation
        );
    }

    // sentiment against a small signed lexicon
    let lexicon = SignedLexicon::from_entries([("good", 3), ("bad", -3), ("storm", -1)]);
    println!("\nsentiment per document (weighted mean):");
    for record in score_signed(&table, &lexicon) {
        println!(
            "  {:<8} value={:+.2} matched={}",
            record.group, record.value, record.matched
        );
    }
    println!("\nterm contributions:");
    for record in contributions_signed(&table, &lexicon) {
        println!("  {:<8} {:+.1} ({} occurrences)", record.term, record.value, record.n);
    }
}
