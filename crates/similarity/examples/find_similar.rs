//! Example: Find movies similar to a title
//!
//! Run with: cargo run --package similarity --example find_similar -- data/movies.csv "Toy Story"
//!
//! This example shows how to:
//! 1. Load a catalog CSV
//! 2. Build the TF-IDF feature index
//! 3. Resolve a title to a catalog ordinal
//! 4. Rank the rest of the catalog against it

use data_loader::{Catalog, CatalogSource, CsvCatalogSource};
use similarity::{FeatureIndex, SimilarityEngine};
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "data/movies.csv".to_string());
    let title = args.next().unwrap_or_else(|| "Toy Story".to_string());

    println!("=== Genre Similarity Example ===\n");

    // Load catalog
    let start = Instant::now();
    let catalog = Catalog::load(CsvCatalogSource::new(&path).read_rows()?)?;
    println!("Loaded {} movies in {:?}", catalog.len(), start.elapsed());

    // Build index
    let start = Instant::now();
    let index = FeatureIndex::build(&catalog);
    println!(
        "Built index with {} terms in {:?}\n",
        index.vocabulary_size(),
        start.elapsed()
    );

    // Resolve the query
    let Some(ordinal) = catalog.find_ordinal(&title) else {
        println!("Could not find movie: \"{}\"", title);
        return Ok(());
    };
    let Some(selected) = catalog.get_by_ordinal(ordinal) else {
        return Ok(());
    };
    println!("Selected: {} [{}]\n", selected.title, selected.genres.join(", "));

    // Rank
    let engine = SimilarityEngine::new(&index);
    let start = Instant::now();
    let results = engine.recommend(ordinal, 10);
    println!("Ranked catalog in {:?}", start.elapsed());

    println!("\nTop 10 similar movies:");
    for (i, m) in results.iter().enumerate() {
        if let Some(movie) = catalog.get_by_ordinal(m.ordinal) {
            println!(
                "  {}. {} (Score: {:.1}%)",
                i + 1,
                movie.title,
                m.score * 100.0
            );
            println!("     - {}", movie.genres.join(", "));
        }
    }

    Ok(())
}
