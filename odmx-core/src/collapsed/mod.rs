//! Collapsed (sparse-in-dense) matrix storage
//!
//! A [`CollapsedMatrix`] keeps, for each internal row, only the cells that a
//! [`LookupTable`] marks present. Absent cells are never stored and read
//! back as exactly `0`. The lookup table and zone numbering are held by the
//! caller (typically a [`CollapsedCollection`]) so that many matrices can
//! share them.

pub mod collection;
pub mod encoding;
pub mod lookup;

pub use collection::CollapsedCollection;
pub use encoding::{CompactCells, FloatCells};
pub use lookup::LookupTable;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::marker::PhantomData;

use crate::{CellEncoding, DenseMatrix, MatrixError, Result, ZoneIndex};

/// Collapsed matrix with full-precision cells
pub type FloatCollapsedMatrix = CollapsedMatrix<FloatCells>;

/// Collapsed matrix with two-decimal fixed-point cells
pub type CompactCollapsedMatrix = CollapsedMatrix<CompactCells>;

/// Row-wise compressed matrix whose layout is given by a [`LookupTable`]
#[derive(Debug, Clone, PartialEq)]
pub struct CollapsedMatrix<E: CellEncoding> {
    name: String,
    storage: Vec<Vec<E::Stored>>,
    _encoding: PhantomData<E>,
}

impl<E: CellEncoding> CollapsedMatrix<E> {
    /// Encode the present cells of `source`
    pub fn collapse(source: &DenseMatrix, lookup: &LookupTable) -> Result<Self> {
        check_dimensions(lookup, source.rows(), source.cols())?;

        let mut storage = Vec::with_capacity(lookup.rows());
        for (i, row) in source.internal_rows().enumerate() {
            let mut stored = vec![E::Stored::default(); lookup.row_length(i)];
            for (j, &value) in row.iter().enumerate() {
                if let Some(offset) = lookup.offset(i, j) {
                    stored[offset] = E::encode(value)?;
                }
            }
            storage.push(stored);
        }

        tracing::debug!(
            name = source.name(),
            encoding = E::NAME,
            cells = lookup.total_cells(),
            "collapsed matrix"
        );

        Ok(Self {
            name: String::from(source.name()),
            storage,
            _encoding: PhantomData,
        })
    }

    /// All-zero matrix with storage sized by `lookup`
    pub fn empty(name: impl Into<String>, lookup: &LookupTable) -> Self {
        let storage = lookup
            .row_lengths()
            .iter()
            .map(|&len| vec![E::Stored::default(); len])
            .collect();

        Self {
            name: name.into(),
            storage,
            _encoding: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Number of stored cells
    pub fn stored_cells(&self) -> usize {
        self.storage.iter().map(Vec::len).sum()
    }

    /// Bytes used by stored cells
    pub fn storage_bytes(&self) -> usize {
        self.stored_cells() * E::stored_size()
    }

    /// Encoded cells of one internal row
    pub fn stored_row(&self, row: usize) -> &[E::Stored] {
        &self.storage[row]
    }

    /// Value at external zones (`row`, `col`); absent cells are `0`
    pub fn get_value(
        &self,
        row: i32,
        col: i32,
        lookup: &LookupTable,
        row_zones: &ZoneIndex,
        col_zones: &ZoneIndex,
    ) -> Result<f32> {
        let (i, j) = self.internal_cell(row, col, lookup, row_zones, col_zones)?;
        Ok(match lookup.offset(i, j) {
            Some(offset) => E::decode(self.cell(i, offset)?),
            None => 0.0,
        })
    }

    /// Set the value at external zones (`row`, `col`)
    ///
    /// Absent cells have no storage and cannot be written.
    pub fn set_value(
        &mut self,
        row: i32,
        col: i32,
        value: f32,
        lookup: &LookupTable,
        row_zones: &ZoneIndex,
        col_zones: &ZoneIndex,
    ) -> Result<()> {
        let (i, j) = self.internal_cell(row, col, lookup, row_zones, col_zones)?;
        let offset = lookup
            .offset(i, j)
            .ok_or(MatrixError::AbsentCellWrite { row, col })?;
        let encoded = E::encode(value)?;

        let len = self.storage[i].len();
        let cell = self.storage[i]
            .get_mut(offset)
            .ok_or(MatrixError::IndexOutOfRange { index: offset, len })?;
        *cell = encoded;
        Ok(())
    }

    /// Materialize a dense matrix, writing `0` for every absent cell
    pub fn expand(
        &self,
        lookup: &LookupTable,
        row_zones: &ZoneIndex,
        col_zones: &ZoneIndex,
    ) -> Result<DenseMatrix> {
        check_dimensions(lookup, row_zones.len(), col_zones.len())?;
        self.check_stored_rows(lookup)?;

        let mut dense = DenseMatrix::with_zones(row_zones.clone(), col_zones.clone())?
            .with_name(self.name.clone());
        for i in 0..lookup.rows() {
            let stored = &self.storage[i];
            let target = dense.internal_row_mut(i);
            for (j, value) in target.iter_mut().enumerate() {
                if let Some(offset) = lookup.offset(i, j) {
                    let cell = stored.get(offset).copied().ok_or(MatrixError::IndexOutOfRange {
                        index: offset,
                        len: stored.len(),
                    })?;
                    *value = E::decode(cell);
                }
            }
        }

        tracing::debug!(name = %self.name, encoding = E::NAME, "expanded matrix");
        Ok(dense)
    }

    fn check_stored_rows(&self, lookup: &LookupTable) -> Result<()> {
        if self.storage.len() != lookup.rows() {
            return Err(MatrixError::DimensionMismatch {
                what: "stored rows",
                expected: lookup.rows(),
                found: self.storage.len(),
            });
        }
        Ok(())
    }

    /// Internal position of (`row`, `col`) once the lookup, the zone indices
    /// and this matrix's storage agree on the shape
    fn internal_cell(
        &self,
        row: i32,
        col: i32,
        lookup: &LookupTable,
        row_zones: &ZoneIndex,
        col_zones: &ZoneIndex,
    ) -> Result<(usize, usize)> {
        check_dimensions(lookup, row_zones.len(), col_zones.len())?;
        self.check_stored_rows(lookup)?;
        Ok((row_zones.internal_of(row)?, col_zones.internal_of(col)?))
    }

    fn cell(&self, row: usize, offset: usize) -> Result<E::Stored> {
        let stored = &self.storage[row];
        stored.get(offset).copied().ok_or(MatrixError::IndexOutOfRange {
            index: offset,
            len: stored.len(),
        })
    }
}

fn check_dimensions(lookup: &LookupTable, rows: usize, cols: usize) -> Result<()> {
    if lookup.rows() != rows {
        return Err(MatrixError::DimensionMismatch {
            what: "lookup rows",
            expected: lookup.rows(),
            found: rows,
        });
    }
    if lookup.cols() != cols {
        return Err(MatrixError::DimensionMismatch {
            what: "lookup columns",
            expected: lookup.cols(),
            found: cols,
        });
    }
    Ok(())
}
