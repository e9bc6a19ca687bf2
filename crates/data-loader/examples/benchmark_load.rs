use data_loader::{Catalog, CatalogSource, CsvCatalogSource};
use std::time::Instant;

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/movies.csv".to_string());

    println!("Loading catalog from {}...\n", path);

    let start = Instant::now();
    let rows = CsvCatalogSource::new(&path)
        .read_rows()
        .expect("Failed to read catalog");
    let row_count = rows.len();
    let catalog = Catalog::load(rows).expect("Failed to load catalog");
    let elapsed = start.elapsed();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Rows read: {}", row_count);
    println!("Movies kept: {}", catalog.len());
    println!("Genres: {}", catalog.all_genres().len());
    println!("\nPerformance: {:.0} rows/second",
             row_count as f64 / elapsed.as_secs_f64());
}
