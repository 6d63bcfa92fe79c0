//! Error type for file-backed matrix operations
//!
//! [`OdmxError`] wraps [`MatrixError`] from the core crate and adds the path
//! of the file being read or written. Format errors detected while decoding
//! a file are lifted into the path-carrying variants with [`lift`].

use std::io;
use std::path::{Path, PathBuf};

use odmx_core::{ErrorCategory, MatrixError};
use thiserror::Error;

use crate::registry::MatrixFormat;

/// Errors raised by matrix I/O, format dispatch and configuration
#[derive(Error, Debug)]
pub enum OdmxError {
    /// File could not be opened, created, read or written
    #[error("cannot access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File ended early or holds malformed data
    #[error("corrupt matrix file {}: {detail}", path.display())]
    CorruptFormat { path: PathBuf, detail: String },

    /// File header carries a version other than 1 or 2
    #[error("unsupported format version {version} in {}", path.display())]
    UnsupportedVersion { path: PathBuf, version: i32 },

    /// Version 1 layout used for a non-square matrix or distinct zone tables
    #[error("version 1 requires a square matrix with one zone table: {}", path.display())]
    Version1RequiresSquare { path: PathBuf },

    /// Error from the in-memory matrix model
    #[error(transparent)]
    Matrix(#[from] MatrixError),

    /// Format could not be determined from the path
    #[error("cannot determine matrix format of {}", path.display())]
    UnknownFormat { path: PathBuf },

    /// No adapter is registered for the format
    #[error("no adapter registered for {format} matrices")]
    NoAdapter { format: MatrixFormat },

    /// Configuration file could not be parsed
    #[error("invalid configuration {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl OdmxError {
    pub(crate) fn file_access(path: &Path, source: io::Error) -> Self {
        OdmxError::FileAccess {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Classify an I/O error raised while decoding: a short read is
    /// corruption, anything else is an access failure
    pub(crate) fn read_failure(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::UnexpectedEof {
            OdmxError::CorruptFormat {
                path: path.to_path_buf(),
                detail: String::from("unexpected end of file"),
            }
        } else {
            Self::file_access(path, source)
        }
    }
}

/// Attach `path` to a core error raised while decoding a file
pub(crate) fn lift(path: &Path, err: MatrixError) -> OdmxError {
    match err {
        MatrixError::UnsupportedVersion { version } => OdmxError::UnsupportedVersion {
            path: path.to_path_buf(),
            version,
        },
        MatrixError::Version1RequiresSquare => OdmxError::Version1RequiresSquare {
            path: path.to_path_buf(),
        },
        MatrixError::CorruptFormat(detail) => OdmxError::CorruptFormat {
            path: path.to_path_buf(),
            detail: detail.to_string(),
        },
        other if other.category() == ErrorCategory::Format => OdmxError::CorruptFormat {
            path: path.to_path_buf(),
            detail: other.to_string(),
        },
        other => OdmxError::Matrix(other),
    }
}

/// Result type for ODMX I/O operations
pub type Result<T> = std::result::Result<T, OdmxError>;
