//! Lookup tables for collapsed storage
//!
//! A [`LookupTable`] maps every internal `(row, col)` pair either to
//! [`ABSENT`] or to an offset into that row's storage. Which cells are
//! present is decided by the caller; the table only checks that the offsets
//! it is given describe each row's storage exactly once.

use alloc::vec;
use alloc::vec::Vec;

use crate::format::constants::{ABSENT, KEY_UPPER_BOUND};
use crate::{DenseMatrix, MatrixError, Result};

/// Per-cell storage offsets plus per-row stored-cell counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTable {
    rows: usize,
    cols: usize,
    entries: Vec<i32>,
    row_lengths: Vec<usize>,
}

impl LookupTable {
    /// Build from row-major `entries` and per-row stored-cell counts
    ///
    /// Every entry must be [`ABSENT`] or an offset below its row length,
    /// and each offset of a row must be used exactly once.
    pub fn new(rows: usize, cols: usize, entries: Vec<i32>, row_lengths: Vec<usize>) -> Result<Self> {
        if entries.len() != rows * cols {
            return Err(MatrixError::DimensionMismatch {
                what: "lookup entries",
                expected: rows * cols,
                found: entries.len(),
            });
        }
        if row_lengths.len() != rows {
            return Err(MatrixError::DimensionMismatch {
                what: "row lengths",
                expected: rows,
                found: row_lengths.len(),
            });
        }

        let mut seen = Vec::new();
        for (row, &len) in row_lengths.iter().enumerate() {
            seen.clear();
            seen.resize(len, false);
            let mut present = 0;

            for col in 0..cols {
                let entry = entries[row * cols + col];
                if entry == ABSENT {
                    continue;
                }
                let offset = usize::try_from(entry)
                    .ok()
                    .filter(|&offset| offset < len && !seen[offset])
                    .ok_or(MatrixError::InvalidLookup { row, col })?;
                seen[offset] = true;
                present += 1;
            }

            if present != len {
                return Err(MatrixError::DimensionMismatch {
                    what: "stored cells in row",
                    expected: len,
                    found: present,
                });
            }
        }

        Ok(Self {
            rows,
            cols,
            entries,
            row_lengths,
        })
    }

    /// Build by marking present cells, assigning offsets left to right
    pub fn from_presence(rows: usize, cols: usize, mut present: impl FnMut(usize, usize) -> bool) -> Self {
        let mut entries = vec![ABSENT; rows * cols];
        let mut row_lengths = vec![0usize; rows];

        for (row, len) in row_lengths.iter_mut().enumerate() {
            for col in 0..cols {
                if present(row, col) {
                    entries[row * cols + col] = *len as i32;
                    *len += 1;
                }
            }
        }

        Self {
            rows,
            cols,
            entries,
            row_lengths,
        }
    }

    /// Cells of `key` with `0 < value < 99999.9` are present
    pub fn from_key_matrix(key: &DenseMatrix) -> Self {
        let (rows, cols) = key.dimensions();
        let values = key.values();
        Self::from_presence(rows, cols, |row, col| {
            let value = values[row * cols + col];
            value > 0.0 && value < KEY_UPPER_BOUND
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Matrix dimensions as (rows, cols)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Storage offset of an internal cell, or `None` when absent
    ///
    /// Panics if the cell is outside the table.
    pub fn offset(&self, row: usize, col: usize) -> Option<usize> {
        assert!(col < self.cols, "lookup column {col} out of range");
        match self.entries[row * self.cols + col] {
            ABSENT => None,
            offset => Some(offset as usize),
        }
    }

    pub fn is_present(&self, row: usize, col: usize) -> bool {
        self.offset(row, col).is_some()
    }

    /// Raw entries of one internal row
    pub fn row_entries(&self, row: usize) -> &[i32] {
        &self.entries[row * self.cols..(row + 1) * self.cols]
    }

    /// Stored-cell count of one internal row
    pub fn row_length(&self, row: usize) -> usize {
        self.row_lengths[row]
    }

    pub fn row_lengths(&self) -> &[usize] {
        &self.row_lengths
    }

    /// Total number of stored cells
    pub fn total_cells(&self) -> usize {
        self.row_lengths.iter().sum()
    }
}
