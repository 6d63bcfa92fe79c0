//! Write a zone-numbered travel-time matrix to a binary file

use odmx::{log_matrix_stats, BinaryMatrixFile, DenseMatrix, ZoneIndex};
use std::time::Instant;

fn main() -> odmx::Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::DEBUG.into()),
        )
        .init();

    // Zone numbers are sparse, as in a real model: 100 zones per district
    let zones: Vec<i32> = (1..=12)
        .flat_map(|district| (1..=50).map(move |zone| district * 100 + zone))
        .collect();
    let index = ZoneIndex::new(&zones)?;
    println!("Building {} x {} matrix", index.len(), index.len());

    let mut time = DenseMatrix::with_zones(index.clone(), index)?
        .with_name("time")
        .with_description("AM peak auto travel time (minutes)");
    for &origin in &zones {
        for &destination in &zones {
            let districts = (origin / 100 - destination / 100).abs() as f32;
            let local = ((origin % 100) - (destination % 100)).abs() as f32 * 0.2;
            time.set(origin, destination, 2.0 + districts * 6.5 + local)?;
        }
    }
    log_matrix_stats(&time);

    let start = Instant::now();
    BinaryMatrixFile::write_matrix(&time, "example_matrix.bin")?;
    println!("Written in {:?}", start.elapsed());
    println!("\nRun 'cargo run --example read_matrix' to read it back!");
    Ok(())
}
