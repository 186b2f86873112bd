use data_loader::JobBoard;
use std::path::Path;
use std::time::Instant;

fn main() {
    let data_dir = Path::new("data/sample");

    println!("Loading marketplace data...\n");

    let start = Instant::now();
    let board = JobBoard::load_from_files(data_dir)
        .expect("Failed to load data");
    let elapsed = start.elapsed();

    let (jobs, cvs) = board.counts();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Jobs: {}", jobs);
    println!("CVs: {}", cvs);
    println!("\nPerformance: {:.0} records/second",
             (jobs + cvs) as f64 / elapsed.as_secs_f64());
}
