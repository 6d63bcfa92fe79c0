//! Named collapsed matrices sharing one lookup table

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

use super::{CollapsedMatrix, LookupTable};
use crate::{CellEncoding, DenseMatrix, MatrixError, Result, ZoneIndex};

/// Set of collapsed matrices over the same zones and presence pattern
///
/// The lookup table is derived once from a key matrix: a cell is present
/// when the key value lies strictly between `0` and `99999.9`.
#[derive(Debug, Clone)]
pub struct CollapsedCollection<E: CellEncoding> {
    lookup: LookupTable,
    row_zones: ZoneIndex,
    col_zones: ZoneIndex,
    matrices: HashMap<String, CollapsedMatrix<E>>,
}

impl<E: CellEncoding> CollapsedCollection<E> {
    /// Build the shared lookup from `key` and store `key` itself
    pub fn new(key: &DenseMatrix) -> Result<Self> {
        let lookup = LookupTable::from_key_matrix(key);
        let mut collection = Self {
            lookup,
            row_zones: key.row_zones().clone(),
            col_zones: key.col_zones().clone(),
            matrices: HashMap::new(),
        };
        collection.add_matrix(key)?;

        tracing::debug!(
            key = key.name(),
            cells = collection.lookup.total_cells(),
            "created collapsed collection"
        );
        Ok(collection)
    }

    /// Collapse `matrix` into the collection under its own name
    ///
    /// A matrix numbered differently from the collection is reordered first;
    /// it must cover every zone of the collection. An existing matrix with
    /// the same name is replaced.
    pub fn add_matrix(&mut self, matrix: &DenseMatrix) -> Result<()> {
        let collapsed = if matrix.row_zones() == &self.row_zones
            && matrix.col_zones() == &self.col_zones
        {
            CollapsedMatrix::collapse(matrix, &self.lookup)?
        } else {
            let reordered =
                matrix.sub_matrix(self.row_zones.as_slice(), self.col_zones.as_slice())?;
            CollapsedMatrix::collapse(&reordered, &self.lookup)?
        };

        self.matrices.insert(String::from(matrix.name()), collapsed);
        Ok(())
    }

    /// Add an all-zero matrix called `name`
    pub fn add_empty(&mut self, name: impl Into<String>) {
        let name = name.into();
        let empty = CollapsedMatrix::empty(name.clone(), &self.lookup);
        self.matrices.insert(name, empty);
    }

    pub fn get_value(&self, row: i32, col: i32, name: &str) -> Result<f32> {
        self.matrix(name)?
            .get_value(row, col, &self.lookup, &self.row_zones, &self.col_zones)
    }

    pub fn set_value(&mut self, row: i32, col: i32, name: &str, value: f32) -> Result<()> {
        let matrix = self
            .matrices
            .get_mut(name)
            .ok_or_else(|| MatrixError::UnknownMatrix { name: String::from(name) })?;
        matrix.set_value(row, col, value, &self.lookup, &self.row_zones, &self.col_zones)
    }

    /// Expand the named matrix to dense form
    pub fn get_matrix(&self, name: &str) -> Result<DenseMatrix> {
        self.matrix(name)?
            .expand(&self.lookup, &self.row_zones, &self.col_zones)
    }

    /// Borrow the collapsed form of the named matrix
    pub fn matrix(&self, name: &str) -> Result<&CollapsedMatrix<E>> {
        self.matrices
            .get(name)
            .ok_or_else(|| MatrixError::UnknownMatrix { name: String::from(name) })
    }

    pub fn remove(&mut self, name: &str) -> Option<CollapsedMatrix<E>> {
        self.matrices.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.matrices.contains_key(name)
    }

    /// Matrix names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.matrices.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    /// Stored cells across all matrices
    pub fn total_cells(&self) -> usize {
        self.matrices.values().map(CollapsedMatrix::stored_cells).sum()
    }

    pub fn lookup(&self) -> &LookupTable {
        &self.lookup
    }

    pub fn row_zones(&self) -> &ZoneIndex {
        &self.row_zones
    }

    pub fn col_zones(&self) -> &ZoneIndex {
        &self.col_zones
    }
}
