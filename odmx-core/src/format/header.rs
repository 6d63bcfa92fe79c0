//! Binary matrix header
//!
//! The fixed-width integer header that opens every binary matrix file:
//!
//! ```text
//! int32 version
//! int32 rowCount
//! int32 colCount
//! int32 externalRowCount
//! int32 externalColCount   (version 2 only)
//! ```
//!
//! All fields are big-endian. The external counts include the unused legacy
//! slot 0, so they are one larger than the number of zones.

use alloc::vec::Vec;

use super::constants::FIELD_SIZE;
use crate::{MatrixError, Result};

/// Binary layout revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(i32)]
pub enum FormatVersion {
    /// One zone table shared by rows and columns
    V1 = 1,
    /// Separate row and column zone tables
    #[default]
    V2 = 2,
}

impl FormatVersion {
    /// Convert from the on-disk integer
    pub const fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(FormatVersion::V1),
            2 => Some(FormatVersion::V2),
            _ => None,
        }
    }

    /// Convert to the on-disk integer
    pub const fn to_i32(self) -> i32 {
        self as i32
    }

    /// Number of fixed header fields for this version
    pub const fn field_count(self) -> usize {
        match self {
            FormatVersion::V1 => 4,
            FormatVersion::V2 => 5,
        }
    }
}

impl core::fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "v{}", self.to_i32())
    }
}

/// Fixed-width header of a binary matrix file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatrixHeader {
    /// Layout revision
    pub version: FormatVersion,
    /// Number of rows in the body
    pub rows: usize,
    /// Number of columns in the body
    pub cols: usize,
    /// Length of the legacy row zone array (zones + 1)
    pub external_row_count: usize,
    /// Length of the legacy column zone array (zones + 1)
    pub external_col_count: usize,
}

impl MatrixHeader {
    /// Size of the leading version field
    pub const VERSION_SIZE: usize = FIELD_SIZE;

    /// Header for a matrix of the given shape
    pub const fn new(version: FormatVersion, rows: usize, cols: usize) -> Self {
        Self {
            version,
            rows,
            cols,
            external_row_count: rows + 1,
            external_col_count: cols + 1,
        }
    }

    /// Size of the fixed header in bytes
    pub const fn size(&self) -> usize {
        self.version.field_count() * FIELD_SIZE
    }

    /// Number of row zones stored in the file
    pub const fn row_zone_count(&self) -> usize {
        self.external_row_count - 1
    }

    /// Number of column zones stored in the file
    pub const fn col_zone_count(&self) -> usize {
        self.external_col_count - 1
    }

    /// Decode the version field and return the full header size it implies
    pub fn peek_version(bytes: &[u8]) -> Result<FormatVersion> {
        let raw = read_i32(bytes, 0)?;
        FormatVersion::from_i32(raw).ok_or(MatrixError::UnsupportedVersion { version: raw })
    }

    /// Parse the header from the start of `bytes`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let version = Self::peek_version(bytes)?;

        let rows = read_count(bytes, 1)?;
        let cols = read_count(bytes, 2)?;
        let external_row_count = read_count(bytes, 3)?;
        let external_col_count = match version {
            FormatVersion::V1 => external_row_count,
            FormatVersion::V2 => read_count(bytes, 4)?,
        };

        let header = Self {
            version,
            rows,
            cols,
            external_row_count,
            external_col_count,
        };
        header.validate()?;
        Ok(header)
    }

    /// Check the counts against each other
    ///
    /// A version 1 header only carries the row table length, so a non-square
    /// shape is reported before the table lengths are compared.
    pub fn validate(&self) -> Result<()> {
        if self.version == FormatVersion::V1 && self.rows != self.cols {
            return Err(MatrixError::Version1RequiresSquare);
        }
        if self.rows == 0 || self.cols == 0 {
            return Err(MatrixError::CorruptFormat("header has zero rows or columns"));
        }
        if self.external_row_count != self.rows + 1 {
            return Err(MatrixError::CorruptFormat(
                "external row count does not match row count",
            ));
        }
        if self.external_col_count != self.cols + 1 {
            return Err(MatrixError::CorruptFormat(
                "external column count does not match column count",
            ));
        }
        Ok(())
    }

    /// Encode the header as big-endian bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.size());

        bytes.extend_from_slice(&self.version.to_i32().to_be_bytes());
        bytes.extend_from_slice(&to_field(self.rows)?.to_be_bytes());
        bytes.extend_from_slice(&to_field(self.cols)?.to_be_bytes());
        bytes.extend_from_slice(&to_field(self.external_row_count)?.to_be_bytes());
        if self.version == FormatVersion::V2 {
            bytes.extend_from_slice(&to_field(self.external_col_count)?.to_be_bytes());
        }

        Ok(bytes)
    }
}

fn read_i32(bytes: &[u8], field: usize) -> Result<i32> {
    let start = field * FIELD_SIZE;
    let raw: [u8; FIELD_SIZE] = bytes
        .get(start..start + FIELD_SIZE)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(MatrixError::CorruptFormat("truncated header"))?;
    Ok(i32::from_be_bytes(raw))
}

fn read_count(bytes: &[u8], field: usize) -> Result<usize> {
    let value = read_i32(bytes, field)?;
    usize::try_from(value).map_err(|_| MatrixError::CorruptFormat("negative count in header"))
}

fn to_field(value: usize) -> Result<i32> {
    i32::try_from(value).map_err(|_| MatrixError::CorruptFormat("count exceeds int32 range"))
}
