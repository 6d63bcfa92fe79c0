//! Row-granular matrix access
//!
//! Binary matrix files are read and written one whole row at a time. This
//! trait is the seam shared by in-memory matrices and file-backed readers so
//! that collapsing and copying code can consume either.

use crate::{MatrixError, ZoneIndex};

/// A zone-indexed matrix that serves whole rows
pub trait RowSource {
    /// Error raised by row reads
    type Error: From<MatrixError>;

    /// Row zone numbering
    fn row_zones(&self) -> &ZoneIndex;

    /// Column zone numbering
    fn col_zones(&self) -> &ZoneIndex;

    /// Copy the row for the external zone `row` into `out`
    ///
    /// `out.len()` must equal the column count.
    fn read_row(&mut self, row: i32, out: &mut [f32]) -> Result<(), Self::Error>;

    /// Matrix dimensions as (rows, cols)
    fn dimensions(&self) -> (usize, usize) {
        (self.row_zones().len(), self.col_zones().len())
    }
}
