//! Cell value encodings for collapsed storage
//!
//! This module defines the trait that constrains how a collapsed matrix
//! stores its present cells.

use core::fmt::Debug;

use crate::Result;

/// Encoding of a single `f32` cell value into its stored representation
///
/// Implementations must be lossless for `FloatCells`-style encodings and
/// document their precision otherwise. Encoding fails with
/// [`crate::MatrixError::ValueOutOfRange`] rather than wrapping.
pub trait CellEncoding {
    /// Stored representation of one cell
    type Stored: Copy + Default + PartialEq + Debug;

    /// Short name used in log events
    const NAME: &'static str;

    /// Encode a value for storage
    fn encode(value: f32) -> Result<Self::Stored>;

    /// Decode a stored value
    fn decode(stored: Self::Stored) -> f32;

    /// Size in bytes of one stored cell
    fn stored_size() -> usize {
        core::mem::size_of::<Self::Stored>()
    }
}
