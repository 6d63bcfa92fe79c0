//! Binary matrix files
//!
//! The layout is big-endian throughout: a fixed integer header, the name and
//! description as length-prefixed modified UTF-8, the row zone table, the
//! column zone table (version 2 only) and a row-major `f32` body. Readers
//! and writers move whole rows at a time.

pub mod reader;
pub mod writer;

use std::path::{Path, PathBuf};

use odmx_core::{DenseMatrix, MatrixHeader};

pub use reader::BinaryMatrixReader;
pub use writer::BinaryMatrixWriter;

use crate::config::BinaryWriteOptions;
use crate::error::Result;

/// File handle for binary matrix files
#[derive(Debug, Clone)]
pub struct BinaryMatrixFile {
    pub header: MatrixHeader,
    pub name: String,
    pub description: String,
    pub path: PathBuf,
}

impl BinaryMatrixFile {
    /// Open an existing file and read its header
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BinaryMatrixReader::open(&path)?;
        Ok(Self {
            header: *reader.header(),
            name: reader.name().to_string(),
            description: reader.description().to_string(),
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Start a row-reading session on this file
    pub fn reader(&self) -> Result<BinaryMatrixReader<std::io::BufReader<std::fs::File>>> {
        BinaryMatrixReader::open(&self.path)
    }

    /// Read a whole matrix
    pub fn read_matrix<P: AsRef<Path>>(path: P) -> Result<DenseMatrix> {
        BinaryMatrixReader::open(path)?.read_matrix()
    }

    /// Write a matrix in the default (version 2) layout
    pub fn write_matrix<P: AsRef<Path>>(matrix: &DenseMatrix, path: P) -> Result<()> {
        Self::write_matrix_with(matrix, path, BinaryWriteOptions::default())
    }

    /// Write a matrix with explicit options
    pub fn write_matrix_with<P: AsRef<Path>>(
        matrix: &DenseMatrix,
        path: P,
        options: BinaryWriteOptions,
    ) -> Result<()> {
        BinaryMatrixWriter::new(options).write(matrix, path)
    }
}
