//! Writing binary matrix files

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use odmx_core::format::constants::FIELD_SIZE;
use odmx_core::{DenseMatrix, FormatVersion, MatrixHeader, MatrixPreamble};

use crate::config::BinaryWriteOptions;
use crate::error::{OdmxError, Result};

/// Writer for binary matrix files
///
/// Each row is written and flushed as one unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryMatrixWriter {
    options: BinaryWriteOptions,
}

impl BinaryMatrixWriter {
    pub fn new(options: BinaryWriteOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BinaryWriteOptions {
        &self.options
    }

    /// Create or truncate `path` and write `matrix` to it
    ///
    /// The preamble is encoded before the file is touched, so a matrix that
    /// cannot be written leaves an existing file intact.
    pub fn write<P: AsRef<Path>>(&self, matrix: &DenseMatrix, path: P) -> Result<()> {
        let path = path.as_ref();
        let span = tracing::info_span!("write_matrix", path = %path.display());
        let _enter = span.enter();

        let preamble = self.encode_preamble(matrix, path)?;
        let file = File::create(path).map_err(|source| OdmxError::file_access(path, source))?;
        tracing::debug!(version = %self.options.version, "created binary matrix");

        let mut out = BufWriter::new(file);
        write_encoded(&mut out, &preamble, matrix, path)?;
        tracing::debug!(rows = matrix.rows(), cols = matrix.cols(), "closed binary matrix");
        Ok(())
    }

    /// Write `matrix` to any byte sink
    ///
    /// `path` only labels errors.
    pub fn write_to<W: Write, P: AsRef<Path>>(
        &self,
        matrix: &DenseMatrix,
        out: &mut W,
        path: P,
    ) -> Result<()> {
        let path = path.as_ref();
        let preamble = self.encode_preamble(matrix, path)?;
        write_encoded(out, &preamble, matrix, path)
    }

    fn encode_preamble(&self, matrix: &DenseMatrix, path: &Path) -> Result<Vec<u8>> {
        let version = self.options.version;
        if version == FormatVersion::V1 && matrix.row_zones() != matrix.col_zones() {
            return Err(OdmxError::Version1RequiresSquare {
                path: path.to_path_buf(),
            });
        }

        let preamble = MatrixPreamble {
            header: MatrixHeader::new(version, matrix.rows(), matrix.cols()),
            name: matrix.name().to_string(),
            description: matrix.description().to_string(),
            row_zones: matrix.row_zones().as_slice().to_vec(),
            col_zones: matrix.col_zones().as_slice().to_vec(),
        };
        Ok(preamble.to_bytes()?)
    }
}

fn write_encoded<W: Write>(
    out: &mut W,
    preamble: &[u8],
    matrix: &DenseMatrix,
    path: &Path,
) -> Result<()> {
    let io_err = |source| OdmxError::file_access(path, source);

    out.write_all(preamble).map_err(io_err)?;

    let mut row_bytes: Vec<[u8; FIELD_SIZE]> = Vec::with_capacity(matrix.cols());
    for row in matrix.internal_rows() {
        row_bytes.clear();
        row_bytes.extend(row.iter().map(|value| value.to_be_bytes()));
        out.write_all(bytemuck::cast_slice(&row_bytes)).map_err(io_err)?;
        out.flush().map_err(io_err)?;
    }
    Ok(())
}
