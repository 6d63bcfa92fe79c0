//! Read a binary matrix back, by row and in full, and collapse it

use odmx::{
    log_matrix_stats, BinaryMatrixFile, CollapsedCollection, CompactCells, FormatRegistry,
    RegistryConfig,
};
use std::time::Instant;

fn main() -> odmx::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let filename = "example_matrix.bin";
    if !std::path::Path::new(filename).exists() {
        println!("File '{filename}' not found!");
        println!("   Run 'cargo run --example write_matrix' first");
        return Ok(());
    }

    let file = BinaryMatrixFile::open(filename)?;
    println!("\nMatrix Information:");
    println!("   Name: {}", file.name);
    println!("   Description: {}", file.description);
    println!("   Dimensions: {} x {}", file.header.rows, file.header.cols);
    println!("   Layout: {}", file.header.version);

    // One row per disk access
    let mut reader = file.reader()?;
    let mut row = vec![0.0f32; file.header.cols];
    let start = Instant::now();
    reader.read_row(705, &mut row)?;
    println!(
        "\nRow 705 read in {:.3}ms, first cells: {:?}",
        start.elapsed().as_secs_f64() * 1000.0,
        &row[..5]
    );

    // Whole matrix through format dispatch
    let registry = FormatRegistry::builder(RegistryConfig::default()).build();
    let start = Instant::now();
    let time = registry.read(filename)?;
    println!("Full matrix read in {:?}", start.elapsed());
    log_matrix_stats(&time);

    // Keep only origin-destination pairs under 20 minutes, at two decimals
    let mut short_trips = time.clone().with_name("short");
    for i in 0..short_trips.rows() {
        for value in short_trips.internal_row_mut(i) {
            if *value >= 20.0 {
                *value = 0.0;
            }
        }
    }
    let collection = CollapsedCollection::<CompactCells>::new(&short_trips)?;
    println!(
        "\nCollapsed {} of {} cells; time(101, 150) = {}",
        collection.total_cells(),
        file.header.rows * file.header.cols,
        collection.get_value(101, 150, "short")?
    );
    Ok(())
}
