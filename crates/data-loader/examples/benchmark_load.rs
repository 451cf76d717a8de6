use data_loader::DataIndex;
use std::path::Path;
use std::time::Instant;

fn main() {
    let data_dir = Path::new("data/ml-latest-small");

    println!("Loading MovieLens dataset...\n");

    let start = Instant::now();
    let index = DataIndex::load_from_dir(data_dir)
        .expect("Failed to load dataset");
    let elapsed = start.elapsed();

    let counts = index.counts();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Users: {}", counts.users);
    println!("Movies: {}", counts.movies);
    println!("Ratings: {}", counts.ratings);
    println!("Tags: {}", counts.tags);
    println!("\nPerformance: {:.0} ratings/second",
             counts.ratings as f64 / elapsed.as_secs_f64());
}
