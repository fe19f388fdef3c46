//! Example: Model I/O - Saving and Loading GIS Models
//!
//! Demonstrates saving a model as plain text and gzip, then loading it back.

use maxent_persist::io::{load_model, save_model, to_text, ActiveOutcome, GisModel, SaveConfig};

fn main() {
    println!("=== GIS Model I/O Example ===\n");

    println!("Creating model...");
    let model = GisModel::new(
        5,
        0.25,
        vec!["yes".to_string(), "no".to_string()],
        vec!["word=the".to_string(), "word=a".to_string()],
        vec![
            vec![ActiveOutcome::new(0, 1.386294)],
            vec![ActiveOutcome::new(0, 0.4), ActiveOutcome::new(1, -0.7)],
        ],
    )
    .expect("Invalid model");

    println!("  Outcomes: {}", model.num_outcomes());
    println!("  Predicates: {}", model.num_predicates());
    println!("  Active parameters: {}", model.num_active_parameters());
    println!();

    println!("Plain-text encoding:");
    for line in to_text(&model).expect("Failed to encode").lines() {
        println!("  {line}");
    }
    println!();

    println!("Saving model...");
    save_model(&model, "example_model.txt", &SaveConfig::default()).expect("Failed to save");
    println!("  ✓ Saved to example_model.txt");
    save_model(&model, "example_model.txt.gz", &SaveConfig::default())
        .expect("Failed to save gzip");
    println!("  ✓ Saved to example_model.txt.gz");
    println!();

    println!("Loading model...");
    let plain = load_model("example_model.txt").expect("Failed to load");
    let gzip = load_model("example_model.txt.gz").expect("Failed to load gzip");
    println!("  ✓ Plain matches original: {}", plain == model);
    println!("  ✓ Gzip matches original: {}", gzip == model);
    println!();

    if let Some(params) = gzip.predicate_parameters("word=a") {
        println!("Parameters for word=a:");
        for active in params {
            println!(
                "  {}: {}",
                gzip.outcome_labels()[active.outcome],
                active.weight
            );
        }
    }

    std::fs::remove_file("example_model.txt").ok();
    std::fs::remove_file("example_model.txt.gz").ok();
    println!("\n=== Example Complete ===");
}
