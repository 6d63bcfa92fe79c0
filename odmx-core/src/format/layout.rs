//! Byte layout of a binary matrix file
//!
//! A file is a [`MatrixHeader`], the name and description strings, the
//! row and column zone tables and a row-major body of big-endian `f32`
//! values. This module computes offsets and encodes the preamble (everything
//! before the body); it performs no I/O.

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use super::constants::FIELD_SIZE;
use super::header::{FormatVersion, MatrixHeader};
use super::utf;
use crate::{MatrixError, Result};

/// Offsets of the value body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyLayout {
    /// Byte offset of the first row
    pub body_offset: u64,
    /// Bytes per row
    pub row_bytes: u64,
    /// Number of rows
    pub rows: usize,
}

impl BodyLayout {
    /// Layout of a `rows x cols` body starting at `body_offset`
    pub fn new(body_offset: u64, rows: usize, cols: usize) -> Result<Self> {
        let row_bytes = (cols as u64)
            .checked_mul(FIELD_SIZE as u64)
            .ok_or(MatrixError::CorruptFormat("row size overflows"))?;
        (rows as u64)
            .checked_mul(row_bytes)
            .and_then(|size| size.checked_add(body_offset))
            .ok_or(MatrixError::CorruptFormat("body size overflows"))?;

        Ok(Self {
            body_offset,
            row_bytes,
            rows,
        })
    }

    /// Total body size in bytes
    pub const fn body_size(&self) -> u64 {
        self.rows as u64 * self.row_bytes
    }

    /// Offset just past the last row
    pub const fn end_offset(&self) -> u64 {
        self.body_offset + self.body_size()
    }

    /// Byte range of one internal row
    pub fn row_range(&self, row: usize) -> Result<Range<u64>> {
        if row >= self.rows {
            return Err(MatrixError::IndexOutOfRange {
                index: row,
                len: self.rows,
            });
        }
        let start = self.body_offset + row as u64 * self.row_bytes;
        Ok(start..start + self.row_bytes)
    }
}

/// Encode a zone table as big-endian `i32` values
pub fn encode_zone_table(zones: &[i32]) -> Vec<u8> {
    zones.iter().flat_map(|zone| zone.to_be_bytes()).collect()
}

/// Decode a zone table of `count` entries
pub fn decode_zone_table(bytes: &[u8], count: usize) -> Result<Vec<i32>> {
    let needed = count
        .checked_mul(FIELD_SIZE)
        .ok_or(MatrixError::CorruptFormat("zone table size overflows"))?;
    let table = bytes
        .get(..needed)
        .ok_or(MatrixError::CorruptFormat("truncated zone table"))?;

    Ok(table
        .chunks_exact(FIELD_SIZE)
        .map(|chunk| i32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

/// Decode a row of big-endian floats into `out`
pub fn decode_row(bytes: &[u8], out: &mut [f32]) -> Result<()> {
    if bytes.len() != out.len() * FIELD_SIZE {
        return Err(MatrixError::DimensionMismatch {
            what: "row bytes",
            expected: out.len() * FIELD_SIZE,
            found: bytes.len(),
        });
    }
    for (value, chunk) in out.iter_mut().zip(bytes.chunks_exact(FIELD_SIZE)) {
        *value = f32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    Ok(())
}

/// Encode a row of floats as big-endian bytes into `out`
pub fn encode_row(values: &[f32], out: &mut Vec<u8>) {
    out.clear();
    out.reserve(values.len() * FIELD_SIZE);
    for value in values {
        out.extend_from_slice(&value.to_be_bytes());
    }
}

/// Everything in a binary matrix file before the value body
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixPreamble {
    pub header: MatrixHeader,
    pub name: String,
    pub description: String,
    pub row_zones: Vec<i32>,
    pub col_zones: Vec<i32>,
}

impl MatrixPreamble {
    /// Encode the preamble
    ///
    /// Version 1 writes a single zone table, so the row and column tables
    /// must be identical.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        if self.header.version == FormatVersion::V1 && self.row_zones != self.col_zones {
            return Err(MatrixError::Version1RequiresSquare);
        }
        self.header.validate()?;
        check_table_len(self.row_zones.len(), self.header.row_zone_count(), "row zones")?;
        check_table_len(self.col_zones.len(), self.header.col_zone_count(), "column zones")?;

        let mut bytes = self.header.to_bytes()?;
        bytes.extend_from_slice(&utf::encode(&self.name)?);
        bytes.extend_from_slice(&utf::encode(&self.description)?);
        bytes.extend_from_slice(&encode_zone_table(&self.row_zones));
        if self.header.version == FormatVersion::V2 {
            bytes.extend_from_slice(&encode_zone_table(&self.col_zones));
        }
        Ok(bytes)
    }

    /// Parse the preamble from the start of `bytes`, returning it with the
    /// body layout that follows
    pub fn parse(bytes: &[u8]) -> Result<(Self, BodyLayout)> {
        let header = MatrixHeader::from_bytes(bytes)?;
        let mut offset = header.size();

        let (name, used) = utf::decode(&bytes[offset..])?;
        offset += used;
        let (description, used) = utf::decode(&bytes[offset..])?;
        offset += used;

        let row_zones = decode_zone_table(&bytes[offset..], header.row_zone_count())?;
        offset += row_zones.len() * FIELD_SIZE;
        let col_zones = match header.version {
            FormatVersion::V1 => row_zones.clone(),
            FormatVersion::V2 => {
                let table = decode_zone_table(&bytes[offset..], header.col_zone_count())?;
                offset += table.len() * FIELD_SIZE;
                table
            }
        };

        let layout = BodyLayout::new(offset as u64, header.rows, header.cols)?;
        let preamble = Self {
            header,
            name,
            description,
            row_zones,
            col_zones,
        };
        Ok((preamble, layout))
    }
}

fn check_table_len(found: usize, expected: usize, what: &'static str) -> Result<()> {
    if found != expected {
        return Err(MatrixError::DimensionMismatch {
            what,
            expected,
            found,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn preamble(version: FormatVersion) -> MatrixPreamble {
        MatrixPreamble {
            header: MatrixHeader::new(version, 2, 2),
            name: String::from("time"),
            description: String::from("am peak"),
            row_zones: vec![10, 20],
            col_zones: vec![10, 20],
        }
    }

    #[test]
    fn test_preamble_round_trip_v2() {
        let mut original = preamble(FormatVersion::V2);
        original.col_zones = vec![7, 3];
        let bytes = original.to_bytes().unwrap();
        // 20 header + 6 + 9 strings + 8 + 8 tables
        assert_eq!(bytes.len(), 51);

        let (parsed, layout) = MatrixPreamble::parse(&bytes).unwrap();
        assert_eq!(parsed, original);
        assert_eq!(layout.body_offset, 51);
        assert_eq!(layout.row_range(1), Ok(59..67));
    }

    #[test]
    fn test_v1_copies_row_table() {
        let original = preamble(FormatVersion::V1);
        let bytes = original.to_bytes().unwrap();
        assert_eq!(bytes.len(), 16 + 6 + 9 + 8);

        let (parsed, _) = MatrixPreamble::parse(&bytes).unwrap();
        assert_eq!(parsed.col_zones, parsed.row_zones);
    }

    #[test]
    fn test_v1_rejects_distinct_tables() {
        let mut original = preamble(FormatVersion::V1);
        original.col_zones = vec![1, 2];
        assert_eq!(original.to_bytes(), Err(MatrixError::Version1RequiresSquare));
    }

    #[test]
    fn test_truncated_table() {
        let bytes = preamble(FormatVersion::V2).to_bytes().unwrap();
        assert!(matches!(
            MatrixPreamble::parse(&bytes[..bytes.len() - 2]),
            Err(MatrixError::CorruptFormat(_))
        ));
    }

    #[test]
    fn test_row_codec() {
        let mut bytes = Vec::new();
        encode_row(&[1.5, -2.25, 0.0], &mut bytes);
        assert_eq!(&bytes[..4], &1.5f32.to_be_bytes());

        let mut out = [0.0f32; 3];
        decode_row(&bytes, &mut out).unwrap();
        assert_eq!(out, [1.5, -2.25, 0.0]);

        let mut short = [0.0f32; 2];
        assert!(decode_row(&bytes, &mut short).is_err());
    }

    #[test]
    fn test_row_range_bounds() {
        let layout = BodyLayout::new(100, 3, 4).unwrap();
        assert_eq!(layout.row_range(0), Ok(100..116));
        assert_eq!(layout.end_offset(), 148);
        assert!(layout.row_range(3).is_err());
    }
}
