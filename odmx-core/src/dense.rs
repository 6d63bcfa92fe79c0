//! Dense zone-indexed matrices
//!
//! [`DenseMatrix`] is the canonical in-memory matrix: a row-major grid of
//! `f32` values addressed through a row [`ZoneIndex`] and a column
//! [`ZoneIndex`]. Every public cell accessor takes external zone numbers.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::{MatrixError, MatrixStats, Result, RowSource, ZoneIndex};

/// Dense `f32` matrix with zone numbering on both axes
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    name: String,
    description: String,
    rows: usize,
    cols: usize,
    values: Vec<f32>,
    row_zones: ZoneIndex,
    col_zones: ZoneIndex,
}

impl DenseMatrix {
    /// Zero-filled matrix numbered `1..=rows` and `1..=cols`
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Self::with_zones(ZoneIndex::sequential(rows)?, ZoneIndex::sequential(cols)?)
    }

    /// Zero-filled matrix with explicit zone numbering
    pub fn with_zones(row_zones: ZoneIndex, col_zones: ZoneIndex) -> Result<Self> {
        let (rows, cols) = (row_zones.len(), col_zones.len());
        check_shape(rows, cols)?;

        Ok(Self {
            name: String::new(),
            description: String::new(),
            rows,
            cols,
            values: vec![0.0; rows * cols],
            row_zones,
            col_zones,
        })
    }

    /// Matrix over row-major `values` with sequential numbering
    pub fn from_values(rows: usize, cols: usize, values: Vec<f32>) -> Result<Self> {
        check_shape(rows, cols)?;
        if values.len() != rows * cols {
            return Err(MatrixError::DimensionMismatch {
                what: "value count",
                expected: rows * cols,
                found: values.len(),
            });
        }

        Ok(Self {
            name: String::new(),
            description: String::new(),
            rows,
            cols,
            values,
            row_zones: ZoneIndex::sequential(rows)?,
            col_zones: ZoneIndex::sequential(cols)?,
        })
    }

    /// Copy every row of `source` into a new matrix
    pub fn from_source<S: RowSource>(source: &mut S) -> core::result::Result<Self, S::Error> {
        let mut matrix = Self::with_zones(source.row_zones().clone(), source.col_zones().clone())?;
        for internal in 0..matrix.rows {
            let zone = matrix.row_zones.external_of(internal)?;
            let start = internal * matrix.cols;
            source.read_row(zone, &mut matrix.values[start..start + matrix.cols])?;
        }
        Ok(matrix)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Matrix dimensions as (rows, cols)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn row_zones(&self) -> &ZoneIndex {
        &self.row_zones
    }

    pub fn col_zones(&self) -> &ZoneIndex {
        &self.col_zones
    }

    /// Replace both zone numberings
    pub fn set_zones(&mut self, row_zones: ZoneIndex, col_zones: ZoneIndex) -> Result<()> {
        check_len("row zones", self.rows, row_zones.len())?;
        check_len("column zones", self.cols, col_zones.len())?;
        self.row_zones = row_zones;
        self.col_zones = col_zones;
        Ok(())
    }

    /// Row-major backing values
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Value at external zones (`row`, `col`)
    pub fn get(&self, row: i32, col: i32) -> Result<f32> {
        let index = self.cell_index(row, col)?;
        Ok(self.values[index])
    }

    /// Set the value at external zones (`row`, `col`)
    pub fn set(&mut self, row: i32, col: i32, value: f32) -> Result<()> {
        let index = self.cell_index(row, col)?;
        self.values[index] = value;
        Ok(())
    }

    /// Set a cell from an `f64`, substituting stand-ins for values beyond
    /// the `f32` range
    ///
    /// Values below `-f32::MAX` become `negative_infinity` and values above
    /// `f32::MAX` become `positive_infinity`; others are narrowed with `as`.
    pub fn set_from_f64(
        &mut self,
        row: i32,
        col: i32,
        value: f64,
        negative_infinity: f32,
        positive_infinity: f32,
    ) -> Result<()> {
        let narrowed = if value < -f64::from(f32::MAX) {
            negative_infinity
        } else if value > f64::from(f32::MAX) {
            positive_infinity
        } else {
            value as f32
        };
        self.set(row, col, narrowed)
    }

    /// Add to the value at external zones (`row`, `col`)
    pub fn add_to(&mut self, row: i32, col: i32, value: f32) -> Result<()> {
        let index = self.cell_index(row, col)?;
        self.values[index] += value;
        Ok(())
    }

    /// Borrow the row of external zone `row`
    pub fn row(&self, row: i32) -> Result<&[f32]> {
        let internal = self.row_zones.internal_of(row)?;
        Ok(self.internal_row(internal))
    }

    /// Copy the row of external zone `row` into `out`
    pub fn get_row(&self, row: i32, out: &mut [f32]) -> Result<()> {
        check_len("row buffer", self.cols, out.len())?;
        out.copy_from_slice(self.row(row)?);
        Ok(())
    }

    /// Overwrite the row of external zone `row`
    pub fn set_row(&mut self, row: i32, values: &[f32]) -> Result<()> {
        check_len("row buffer", self.cols, values.len())?;
        let internal = self.row_zones.internal_of(row)?;
        self.internal_row_mut(internal).copy_from_slice(values);
        Ok(())
    }

    /// Copy the column of external zone `col` into `out`
    pub fn get_column(&self, col: i32, out: &mut [f32]) -> Result<()> {
        check_len("column buffer", self.rows, out.len())?;
        let c = self.col_zones.internal_of(col)?;
        for (r, value) in out.iter_mut().enumerate() {
            *value = self.values[r * self.cols + c];
        }
        Ok(())
    }

    /// Overwrite the column of external zone `col`
    pub fn set_column(&mut self, col: i32, values: &[f32]) -> Result<()> {
        check_len("column buffer", self.rows, values.len())?;
        let c = self.col_zones.internal_of(col)?;
        for (r, &value) in values.iter().enumerate() {
            self.values[r * self.cols + c] = value;
        }
        Ok(())
    }

    /// Row at an internal position
    ///
    /// Panics if `internal >= rows`.
    pub fn internal_row(&self, internal: usize) -> &[f32] {
        let start = internal * self.cols;
        &self.values[start..start + self.cols]
    }

    /// Mutable row at an internal position
    ///
    /// Panics if `internal >= rows`.
    pub fn internal_row_mut(&mut self, internal: usize) -> &mut [f32] {
        let start = internal * self.cols;
        &mut self.values[start..start + self.cols]
    }

    /// Iterate rows in internal order
    pub fn internal_rows(&self) -> core::slice::ChunksExact<'_, f32> {
        self.values.chunks_exact(self.cols)
    }

    /// Set every cell to `value`
    pub fn fill(&mut self, value: f32) {
        self.values.fill(value);
    }

    /// Multiply every cell by `k` in place
    pub fn scale(&mut self, k: f32) {
        self.values.iter_mut().for_each(|v| *v *= k);
    }

    /// Copy multiplied by `k`
    pub fn scaled(&self, k: f32) -> Self {
        let mut out = self.clone();
        out.scale(k);
        out
    }

    /// Element-wise sum
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a + b)
    }

    /// Element-wise difference
    pub fn subtract(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a - b)
    }

    /// Element-wise product
    pub fn multiply_elements(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a * b)
    }

    /// Element-wise quotient
    pub fn divide_elements(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a / b)
    }

    fn zip_with(&self, other: &Self, op: impl Fn(f32, f32) -> f32) -> Result<Self> {
        check_len("rows", self.rows, other.rows)?;
        check_len("columns", self.cols, other.cols)?;

        let values = self
            .values
            .iter()
            .zip(&other.values)
            .map(|(&a, &b)| op(a, b))
            .collect();

        Ok(Self {
            name: String::new(),
            description: String::new(),
            rows: self.rows,
            cols: self.cols,
            values,
            row_zones: self.row_zones.clone(),
            col_zones: self.col_zones.clone(),
        })
    }

    /// Swap rows and columns, including zone numbering
    pub fn transpose(&self) -> Self {
        let mut values = vec![0.0; self.values.len()];
        for r in 0..self.rows {
            for c in 0..self.cols {
                values[c * self.rows + r] = self.values[r * self.cols + c];
            }
        }

        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            rows: self.cols,
            cols: self.rows,
            values,
            row_zones: self.col_zones.clone(),
            col_zones: self.row_zones.clone(),
        }
    }

    /// Copy the named zones into a new matrix numbered by them
    pub fn sub_matrix(&self, rows: &[i32], cols: &[i32]) -> Result<Self> {
        let mut out = Self::with_zones(ZoneIndex::new(rows)?, ZoneIndex::new(cols)?)?;
        for (r, &row) in rows.iter().enumerate() {
            let source = self.row(row)?;
            let target = out.internal_row_mut(r);
            for (c, &col) in cols.iter().enumerate() {
                target[c] = source[self.col_zones.internal_of(col)?];
            }
        }
        out.name = self.name.clone();
        out.description = self.description.clone();
        Ok(out)
    }

    /// Sum of all cells, accumulated in `f64`
    pub fn sum(&self) -> f64 {
        self.values.iter().map(|&v| v as f64).sum()
    }

    /// Smallest cell value; NaN cells are ignored
    pub fn min(&self) -> f32 {
        self.values.iter().copied().fold(f32::INFINITY, f32::min)
    }

    /// Largest cell value; NaN cells are ignored
    pub fn max(&self) -> f32 {
        self.values.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Number of cells equal to zero
    pub fn zero_count(&self) -> usize {
        self.values.iter().filter(|&&v| v == 0.0).count()
    }

    /// Sum of the row of external zone `row`
    pub fn row_sum(&self, row: i32) -> Result<f32> {
        Ok(self.row(row)?.iter().map(|&v| v as f64).sum::<f64>() as f32)
    }

    /// Sum of the column of external zone `col`
    pub fn column_sum(&self, col: i32) -> Result<f32> {
        let c = self.col_zones.internal_of(col)?;
        Ok(self
            .internal_rows()
            .map(|row| row[c] as f64)
            .sum::<f64>() as f32)
    }

    /// Smallest value in the column of external zone `col`; NaN cells are
    /// ignored
    pub fn column_min(&self, col: i32) -> Result<f32> {
        let c = self.col_zones.internal_of(col)?;
        Ok(self
            .internal_rows()
            .map(|row| row[c])
            .fold(f32::INFINITY, f32::min))
    }

    /// Replace each intrazonal cell with half of the smallest other value in
    /// its row
    ///
    /// The intrazonal cell of a row is the column numbered with the same
    /// zone. Rows whose zone has no column, or that have no other column,
    /// are left unchanged. Used to fill skim diagonals from the nearest
    /// neighbouring zone.
    pub fn set_intrazonal_to_half_nearest_neighbor(&mut self) {
        for r in 0..self.rows {
            let zone = self.row_zones.as_slice()[r];
            let Ok(diagonal) = self.col_zones.internal_of(zone) else {
                continue;
            };

            let row = self.internal_row_mut(r);
            let nearest = row
                .iter()
                .enumerate()
                .filter(|&(c, _)| c != diagonal)
                .map(|(_, &value)| value)
                .reduce(f32::min);
            if let Some(nearest) = nearest {
                row[diagonal] = 0.5 * nearest;
            }
        }
    }

    /// Row sums in internal order
    pub fn row_totals(&self) -> Vec<f64> {
        self.internal_rows()
            .map(|row| row.iter().map(|&v| v as f64).sum())
            .collect()
    }

    /// Column sums in internal order
    pub fn column_totals(&self) -> Vec<f64> {
        let mut totals = vec![0.0f64; self.cols];
        for row in self.internal_rows() {
            for (total, &v) in totals.iter_mut().zip(row) {
                *total += v as f64;
            }
        }
        totals
    }

    /// Summary statistics over every cell
    pub fn stats(&self) -> MatrixStats {
        MatrixStats::from_values(&self.values)
    }

    /// External (row, column) zones of every cell holding `-inf`
    pub fn negative_infinity_cells(&self) -> Vec<(i32, i32)> {
        let mut cells = Vec::new();
        for (r, row) in self.internal_rows().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                if value == f32::NEG_INFINITY {
                    cells.push((self.row_zones.as_slice()[r], self.col_zones.as_slice()[c]));
                }
            }
        }
        cells
    }

    fn cell_index(&self, row: i32, col: i32) -> Result<usize> {
        let r = self.row_zones.internal_of(row)?;
        let c = self.col_zones.internal_of(col)?;
        Ok(r * self.cols + c)
    }
}

impl RowSource for DenseMatrix {
    type Error = MatrixError;

    fn row_zones(&self) -> &ZoneIndex {
        &self.row_zones
    }

    fn col_zones(&self) -> &ZoneIndex {
        &self.col_zones
    }

    fn read_row(&mut self, row: i32, out: &mut [f32]) -> Result<()> {
        self.get_row(row, out)
    }
}

fn check_shape(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(MatrixError::InvalidDimensions { rows, cols });
    }
    Ok(())
}

fn check_len(what: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(MatrixError::DimensionMismatch {
            what,
            expected,
            found,
        });
    }
    Ok(())
}
