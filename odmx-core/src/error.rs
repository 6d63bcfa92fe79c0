//! Error types for ODMX operations

use thiserror::Error;

/// Broad classification of a [`MatrixError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Logical or data errors raised by the in-memory model
    Data,
    /// Errors raised while decoding or encoding the binary layout
    Format,
}

/// Errors that can occur during matrix operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    /// External zone number is not part of the zone index
    #[error("unknown zone {zone}")]
    UnknownZone { zone: i32 },
    /// External zone number appears more than once
    #[error("duplicate zone {zone}")]
    DuplicateZone { zone: i32 },
    /// Internal position outside the dense range
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// Buffer or operand size does not match the matrix
    #[error("{what} mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    /// Matrices need at least one row and one column
    #[error("invalid dimensions {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },
    /// More zones than `i32` zone numbers can label
    #[error("{count} zones exceed the int32 zone number range")]
    TooManyZones { count: usize },
    /// Write to a cell that the lookup table marks as absent
    #[error("cell ({row}, {col}) is absent from the lookup table")]
    AbsentCellWrite { row: i32, col: i32 },
    /// Value cannot be represented by the cell encoding
    #[error("value {value} is outside the representable range")]
    ValueOutOfRange { value: f32 },
    /// Lookup table entries are inconsistent with the row lengths
    #[error("invalid lookup entry at ({row}, {col})")]
    InvalidLookup { row: usize, col: usize },
    /// No member with this name in a collapsed collection
    #[error("matrix {name:?} is not in the collection")]
    UnknownMatrix { name: alloc::string::String },
    /// String does not fit the 16-bit length prefix
    #[error("string of {len} encoded bytes exceeds 65535")]
    StringTooLong { len: usize },
    /// Header or body bytes are malformed
    #[error("corrupt matrix data: {0}")]
    CorruptFormat(&'static str),
    /// Header carries a version other than 1 or 2
    #[error("unsupported format version {version}")]
    UnsupportedVersion { version: i32 },
    /// Version 1 files share one zone table between rows and columns
    #[error("version 1 requires a square matrix with identical row and column zones")]
    Version1RequiresSquare,
}

impl MatrixError {
    /// Classify the error
    pub const fn category(&self) -> ErrorCategory {
        match self {
            MatrixError::StringTooLong { .. }
            | MatrixError::CorruptFormat(_)
            | MatrixError::UnsupportedVersion { .. }
            | MatrixError::Version1RequiresSquare => ErrorCategory::Format,
            _ => ErrorCategory::Data,
        }
    }
}

/// Result type for ODMX core operations
pub type Result<T> = core::result::Result<T, MatrixError>;
