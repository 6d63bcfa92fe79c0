//! Memory-mapped access to binary matrix files

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use odmx_core::format::constants::FIELD_SIZE;
use odmx_core::{BodyLayout, DenseMatrix, MatrixHeader, MatrixPreamble, RowSource, ZoneIndex};

use crate::binary::reader::check_row_buffer;
use crate::error::{lift, OdmxError, Result};

/// Read-only binary matrix served straight from a memory mapping
///
/// The preamble is parsed once; each row access decodes one row of the
/// mapped body.
#[derive(Debug)]
pub struct MappedBinaryMatrix {
    mmap: Mmap,
    path: PathBuf,
    header: MatrixHeader,
    name: String,
    description: String,
    row_zones: ZoneIndex,
    col_zones: ZoneIndex,
    layout: BodyLayout,
}

impl MappedBinaryMatrix {
    /// Map a binary matrix file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| OdmxError::file_access(path, source))?;

        // SAFETY: read-only mapping; the file is not modified while mapped by
        // this crate, and every slice taken from it is bounds-checked below
        let mmap = unsafe { Mmap::map(&file) }.map_err(|source| OdmxError::file_access(path, source))?;

        let (preamble, layout) = MatrixPreamble::parse(&mmap).map_err(|err| lift(path, err))?;
        if layout.end_offset() > mmap.len() as u64 {
            return Err(OdmxError::CorruptFormat {
                path: path.to_path_buf(),
                detail: format!(
                    "body needs {} bytes, file has {}",
                    layout.end_offset(),
                    mmap.len()
                ),
            });
        }

        let row_zones = ZoneIndex::new(&preamble.row_zones)?;
        let col_zones = ZoneIndex::new(&preamble.col_zones)?;

        tracing::debug!(
            path = %path.display(),
            version = %preamble.header.version,
            rows = preamble.header.rows,
            cols = preamble.header.cols,
            "mapped binary matrix"
        );

        Ok(Self {
            mmap,
            path: path.to_path_buf(),
            header: preamble.header,
            name: preamble.name,
            description: preamble.description,
            row_zones,
            col_zones,
            layout,
        })
    }

    pub fn header(&self) -> &MatrixHeader {
        &self.header
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Matrix dimensions as (rows, cols)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.header.rows, self.header.cols)
    }

    /// Copy the row of the external zone `row` into `out`
    pub fn row(&self, row: i32, out: &mut [f32]) -> Result<()> {
        let internal = self.row_zones.internal_of(row)?;
        self.internal_row(internal, out)
    }

    /// Copy the row at internal position `row` into `out`
    pub fn internal_row(&self, row: usize, out: &mut [f32]) -> Result<()> {
        check_row_buffer(out.len(), self.header.cols)?;
        let range = self.layout.row_range(row)?;
        let bytes = &self.mmap[range.start as usize..range.end as usize];

        let cells: &[[u8; FIELD_SIZE]] =
            bytemuck::try_cast_slice(bytes).map_err(|err| OdmxError::CorruptFormat {
                path: self.path.clone(),
                detail: format!("{err:?}"),
            })?;
        for (value, cell) in out.iter_mut().zip(cells) {
            *value = f32::from_be_bytes(*cell);
        }
        Ok(())
    }

    /// Copy the whole mapped matrix into memory
    pub fn to_dense(&self) -> Result<DenseMatrix> {
        let span = tracing::info_span!("read_matrix", path = %self.path.display());
        let _enter = span.enter();

        let mut matrix = DenseMatrix::with_zones(self.row_zones.clone(), self.col_zones.clone())?
            .with_name(self.name.clone())
            .with_description(self.description.clone());
        for row in 0..self.header.rows {
            self.internal_row(row, matrix.internal_row_mut(row))?;
        }
        Ok(matrix)
    }
}

impl RowSource for MappedBinaryMatrix {
    type Error = OdmxError;

    fn row_zones(&self) -> &ZoneIndex {
        &self.row_zones
    }

    fn col_zones(&self) -> &ZoneIndex {
        &self.col_zones
    }

    fn read_row(&mut self, row: i32, out: &mut [f32]) -> Result<()> {
        self.row(row, out)
    }
}
