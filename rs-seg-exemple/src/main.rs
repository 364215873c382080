use rs_seg_core::Trie;
use rs_seg_core::config::{EvaluationConfig, TrainingConfig};
use rs_seg_core::model::evaluation::evaluate;
use rs_seg_core::model::training::{prune_and_report, train};

const CORPUS: &[&str] = &[
    "the cat sat on the mat",
    "the dog sat on the log",
    "a cat and a dog",
    "the mat and the log",
    "on the mat sat the cat",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Windows of up to 5 characters (depth 4)
    let config = TrainingConfig::new(4)?;
    let mut trie = train(CORPUS.iter().map(|row| Ok(row.to_string())), &config)?;

    // Keep only the top prediction under each all-leaf sibling set
    prune_and_report(&mut trie);

    // Round-trip through the model stream, as a separate process would
    let mut bytes = Vec::new();
    trie.save(&mut bytes)?;
    let model = Trie::from_bytes(&bytes)?;
    println!("Model: {} bytes, {} nodes", bytes.len(), model.node_count());

    for text in ["thecatsat", "thedogandthecat", "onthelog"] {
        println!("{text} -> {}", model.segment(text));
    }

    // Score the corpus against itself
    let eval = EvaluationConfig::default();
    let metrics = evaluate(&model, CORPUS.iter().map(|row| Ok(row.to_string())), &eval, |_| ())?;
    println!("Precision: {:.6}", metrics.precision());
    println!("Recall: {:.6}", metrics.recall());

    Ok(())
}
