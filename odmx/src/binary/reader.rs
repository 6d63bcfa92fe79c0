//! Seekable reading of binary matrix files

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use odmx_core::format::constants::FIELD_SIZE;
use odmx_core::format::{layout, utf};
use odmx_core::{
    BodyLayout, DenseMatrix, FormatVersion, MatrixError, MatrixHeader, RowSource, ZoneIndex,
};

use crate::error::{lift, OdmxError, Result};

/// Open reading session over a binary matrix stream
///
/// The header, strings and zone tables are parsed on open. Rows are then
/// fetched one whole row per read, either by zone through seeking or all at
/// once with [`read_matrix`](Self::read_matrix).
#[derive(Debug)]
pub struct BinaryMatrixReader<R> {
    inner: R,
    path: PathBuf,
    header: MatrixHeader,
    name: String,
    description: String,
    row_zones: ZoneIndex,
    col_zones: ZoneIndex,
    layout: BodyLayout,
    buffer: Vec<u8>,
}

impl BinaryMatrixReader<BufReader<File>> {
    /// Open a binary matrix file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| OdmxError::file_access(path, source))?;
        Self::from_reader(BufReader::new(file), path)
    }
}

impl<R: Read + Seek> BinaryMatrixReader<R> {
    /// Start a session over any seekable stream positioned at the file start
    ///
    /// `path` only labels errors and log events.
    pub fn from_reader<P: AsRef<Path>>(mut inner: R, path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut version = [0u8; MatrixHeader::VERSION_SIZE];
        read_exact(&mut inner, &mut version, &path)?;
        let header_size = MatrixHeader::peek_version(&version)
            .map_err(|err| lift(&path, err))?
            .field_count()
            * FIELD_SIZE;

        let mut header_bytes = version.to_vec();
        header_bytes.resize(header_size, 0);
        read_exact(&mut inner, &mut header_bytes[MatrixHeader::VERSION_SIZE..], &path)?;
        let header = MatrixHeader::from_bytes(&header_bytes).map_err(|err| lift(&path, err))?;
        let mut offset = header_size;

        let name = read_string(&mut inner, &path, &mut offset)?;
        let description = read_string(&mut inner, &path, &mut offset)?;

        let row_table = read_zone_table(&mut inner, header.row_zone_count(), &path, &mut offset)?;
        let col_table = match header.version {
            FormatVersion::V1 => row_table.clone(),
            FormatVersion::V2 => {
                read_zone_table(&mut inner, header.col_zone_count(), &path, &mut offset)?
            }
        };
        let row_zones = ZoneIndex::new(&row_table)?;
        let col_zones = ZoneIndex::new(&col_table)?;

        let layout = BodyLayout::new(offset as u64, header.rows, header.cols)
            .map_err(|err| lift(&path, err))?;

        tracing::debug!(
            path = %path.display(),
            version = %header.version,
            rows = header.rows,
            cols = header.cols,
            "opened binary matrix"
        );

        Ok(Self {
            inner,
            path,
            buffer: vec![0u8; layout.row_bytes as usize],
            header,
            name,
            description,
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

    pub fn layout(&self) -> &BodyLayout {
        &self.layout
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the row of the external zone `row` into `out`
    pub fn read_row(&mut self, row: i32, out: &mut [f32]) -> Result<()> {
        let internal = self.row_zones.internal_of(row)?;
        self.read_internal_row(internal, out)
    }

    /// Read the row at internal position `row` into `out`
    pub fn read_internal_row(&mut self, row: usize, out: &mut [f32]) -> Result<()> {
        check_row_buffer(out.len(), self.header.cols)?;
        let range = self.layout.row_range(row)?;
        self.inner
            .seek(SeekFrom::Start(range.start))
            .map_err(|source| OdmxError::file_access(&self.path, source))?;
        self.read_next_row(out)
    }

    /// Read every row into a dense matrix
    pub fn read_matrix(&mut self) -> Result<DenseMatrix> {
        let span = tracing::info_span!("read_matrix", path = %self.path.display());
        let _enter = span.enter();

        let mut matrix = DenseMatrix::with_zones(self.row_zones.clone(), self.col_zones.clone())?
            .with_name(self.name.clone())
            .with_description(self.description.clone());

        self.inner
            .seek(SeekFrom::Start(self.layout.body_offset))
            .map_err(|source| OdmxError::file_access(&self.path, source))?;
        for row in 0..self.header.rows {
            self.read_next_row(matrix.internal_row_mut(row))?;
        }

        tracing::debug!(rows = self.header.rows, cols = self.header.cols, "read matrix body");
        Ok(matrix)
    }

    fn read_next_row(&mut self, out: &mut [f32]) -> Result<()> {
        read_exact(&mut self.inner, &mut self.buffer, &self.path)?;
        layout::decode_row(&self.buffer, out).map_err(|err| lift(&self.path, err))
    }
}

impl<R> Drop for BinaryMatrixReader<R> {
    fn drop(&mut self) {
        tracing::debug!(path = %self.path.display(), "closed binary matrix");
    }
}

impl<R: Read + Seek> RowSource for BinaryMatrixReader<R> {
    type Error = OdmxError;

    fn row_zones(&self) -> &ZoneIndex {
        &self.row_zones
    }

    fn col_zones(&self) -> &ZoneIndex {
        &self.col_zones
    }

    fn read_row(&mut self, row: i32, out: &mut [f32]) -> Result<()> {
        BinaryMatrixReader::read_row(self, row, out)
    }
}

pub(crate) fn check_row_buffer(found: usize, expected: usize) -> Result<()> {
    if found != expected {
        return Err(MatrixError::DimensionMismatch {
            what: "row buffer",
            expected,
            found,
        }
        .into());
    }
    Ok(())
}

fn read_exact<R: Read>(inner: &mut R, buf: &mut [u8], path: &Path) -> Result<()> {
    inner
        .read_exact(buf)
        .map_err(|source| OdmxError::read_failure(path, source))
}

fn read_string<R: Read>(inner: &mut R, path: &Path, offset: &mut usize) -> Result<String> {
    let mut prefix = [0u8; utf::PREFIX_SIZE];
    read_exact(inner, &mut prefix, path)?;
    let len = utf::decode_prefix(&prefix).map_err(|err| lift(path, err))?;

    let mut body = vec![0u8; len];
    read_exact(inner, &mut body, path)?;
    *offset += utf::PREFIX_SIZE + len;
    utf::decode_body(&body).map_err(|err| lift(path, err))
}

fn read_zone_table<R: Read>(
    inner: &mut R,
    count: usize,
    path: &Path,
    offset: &mut usize,
) -> Result<Vec<i32>> {
    // a corrupt count must not drive the allocation
    let mut bytes = Vec::new();
    inner
        .by_ref()
        .take((count * FIELD_SIZE) as u64)
        .read_to_end(&mut bytes)
        .map_err(|source| OdmxError::file_access(path, source))?;
    *offset += bytes.len();
    layout::decode_zone_table(&bytes, count).map_err(|err| lift(path, err))
}
