//! Binary matrix file format definitions
//!
//! This module contains pure definitions for the on-disk layout.
//! No I/O operations - only encoding, decoding and offset arithmetic.

pub mod constants;
pub mod header;
pub mod layout;
pub mod utf;

pub use header::{FormatVersion, MatrixHeader};
pub use layout::{BodyLayout, MatrixPreamble};
