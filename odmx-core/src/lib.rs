#![no_std]

//! ODMX Core - Zone-indexed origin-destination matrices
//!
//! This crate provides the in-memory matrix model and the pure definitions
//! of the binary matrix format. It performs no I/O; file access lives in the
//! `odmx` crate.

extern crate alloc;

pub mod collapsed;
pub mod dense;
pub mod error;
pub mod format;
pub mod stats;
pub mod traits;
pub mod zone;

pub use collapsed::{
    CollapsedCollection, CollapsedMatrix, CompactCells, CompactCollapsedMatrix, FloatCells,
    FloatCollapsedMatrix, LookupTable,
};
pub use dense::DenseMatrix;
pub use error::{ErrorCategory, MatrixError, Result};
pub use format::constants::ABSENT;
pub use format::{BodyLayout, FormatVersion, MatrixHeader, MatrixPreamble};
pub use stats::{MatrixStats, Percentiles};
pub use traits::{CellEncoding, RowSource};
pub use zone::{ZoneIndex, ZoneIter};
