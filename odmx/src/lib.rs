//! ODMX - Zone-indexed origin-destination matrix persistence
//!
//! This library reads and writes transportation-planning matrices that are
//! addressed by zone numbers rather than dense indices.
//!
//! ## Architecture
//!
//! - **odmx-core**: matrix model, collapsed storage and binary format
//!   definitions (no I/O)
//! - **odmx**: file access, memory mapping and format dispatch
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use odmx::{BinaryMatrixFile, DenseMatrix, ZoneIndex};
//!
//! fn example() -> odmx::Result<()> {
//!     let zones = ZoneIndex::new(&[101, 102, 205])?;
//!     let mut time = DenseMatrix::with_zones(zones.clone(), zones)?.with_name("time");
//!     time.set(101, 205, 12.5)?;
//!     BinaryMatrixFile::write_matrix(&time, "time.bin")?;
//!
//!     let read = BinaryMatrixFile::read_matrix("time.bin")?;
//!     assert_eq!(read.get(101, 205)?, 12.5);
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Events are emitted through `tracing`; install a subscriber to see them.

pub use odmx_core::{
    // Model
    CollapsedCollection, CollapsedMatrix, CompactCells, CompactCollapsedMatrix, DenseMatrix,
    FloatCells, FloatCollapsedMatrix, LookupTable, MatrixStats, Percentiles, ZoneIndex, ZoneIter,
    ABSENT,
    // Traits
    CellEncoding, RowSource,
    // Format definitions
    FormatVersion, MatrixHeader,
    // Core errors
    ErrorCategory, MatrixError,
};

pub mod binary;
pub mod config;
pub mod error;
#[cfg(feature = "mmap")]
pub mod mmap;
pub mod registry;
pub mod stats;

pub use binary::{BinaryMatrixFile, BinaryMatrixReader, BinaryMatrixWriter};
pub use config::{BinaryWriteOptions, RegistryConfig};
pub use error::{OdmxError, Result};
#[cfg(feature = "mmap")]
pub use mmap::MappedBinaryMatrix;
pub use registry::{
    BinaryAdapter, FormatRegistry, FormatRegistryBuilder, MatrixFormat, MatrixReader,
    MatrixWriter,
};
pub use stats::log_matrix_stats;
