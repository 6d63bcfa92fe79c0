//! Format dispatch for matrix files
//!
//! Every supported format is a [`MatrixFormat`] variant. Reading and writing
//! go through [`MatrixReader`] and [`MatrixWriter`] adapters held by a
//! [`FormatRegistry`]; only the binary format has a built-in adapter, the
//! others are supplied by the caller when the registry is built.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use odmx_core::DenseMatrix;
use serde::{Deserialize, Serialize};

use crate::binary::{BinaryMatrixReader, BinaryMatrixWriter};
use crate::config::{BinaryWriteOptions, RegistryConfig};
use crate::error::{OdmxError, Result};

/// Matrix file formats known to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatrixFormat {
    Binary,
    Zip,
    Csv,
    Emme2,
    Tpplus,
    Transcad,
}

/// Name fragments that identify a format, checked in order
const DETECTION_RULES: &[(MatrixFormat, &[&str])] = &[
    (MatrixFormat::Binary, &[".bin", ".binary"]),
    (MatrixFormat::Zip, &[".zip", ".zmx", ".compressed"]),
    (MatrixFormat::Csv, &[".csv"]),
    (MatrixFormat::Emme2, &[".emme2", ".e2ban", ".em2"]),
    (MatrixFormat::Tpplus, &[".tpp", ".tpplus"]),
    (MatrixFormat::Transcad, &[".mtx", ".transcad"]),
];

impl MatrixFormat {
    pub const ALL: [MatrixFormat; 6] = [
        MatrixFormat::Binary,
        MatrixFormat::Zip,
        MatrixFormat::Csv,
        MatrixFormat::Emme2,
        MatrixFormat::Tpplus,
        MatrixFormat::Transcad,
    ];

    /// Lowercase name, as used in configuration
    pub const fn name(self) -> &'static str {
        match self {
            MatrixFormat::Binary => "binary",
            MatrixFormat::Zip => "zip",
            MatrixFormat::Csv => "csv",
            MatrixFormat::Emme2 => "emme2",
            MatrixFormat::Tpplus => "tpplus",
            MatrixFormat::Transcad => "transcad",
        }
    }

    /// Parse a format name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(name))
    }

    /// Detect the format from a file name
    ///
    /// A format matches when one of its fragments (such as `.bin`) appears
    /// after the first character of the name, so `trips.bin.bak` is binary.
    /// Emme2 databanks are also recognized by the bare names `emme2ban` and
    /// `emmebank`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();

        for &(format, fragments) in DETECTION_RULES {
            if fragments
                .iter()
                .any(|fragment| matches!(name.find(fragment), Some(at) if at > 0))
            {
                return Some(format);
            }
            if format == MatrixFormat::Emme2
                && (name.contains("emme2ban") || name == "emmebank")
            {
                return Some(format);
            }
        }
        None
    }
}

impl fmt::Display for MatrixFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reads a whole matrix from a file of one format
pub trait MatrixReader: Send + Sync {
    fn read(&self, path: &Path) -> Result<DenseMatrix>;
}

/// Writes a whole matrix to a file of one format
pub trait MatrixWriter: Send + Sync {
    fn write(&self, matrix: &DenseMatrix, path: &Path) -> Result<()>;
}

/// Built-in adapter for binary matrix files
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryAdapter {
    options: BinaryWriteOptions,
}

impl BinaryAdapter {
    pub fn new(options: BinaryWriteOptions) -> Self {
        Self { options }
    }
}

impl MatrixReader for BinaryAdapter {
    fn read(&self, path: &Path) -> Result<DenseMatrix> {
        BinaryMatrixReader::open(path)?.read_matrix()
    }
}

impl MatrixWriter for BinaryAdapter {
    fn write(&self, matrix: &DenseMatrix, path: &Path) -> Result<()> {
        BinaryMatrixWriter::new(self.options).write(matrix, path)
    }
}

/// Adapters per format, fixed once built
pub struct FormatRegistry {
    config: RegistryConfig,
    readers: HashMap<MatrixFormat, Box<dyn MatrixReader>>,
    writers: HashMap<MatrixFormat, Box<dyn MatrixWriter>>,
}

impl FormatRegistry {
    /// Start building a registry
    pub fn builder(config: RegistryConfig) -> FormatRegistryBuilder {
        FormatRegistryBuilder::new(config)
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Format of `path`: configured extensions first, then the built-in
    /// name rules
    pub fn detect(&self, path: &Path) -> Result<MatrixFormat> {
        self.config
            .format_for_extension(path)
            .or_else(|| MatrixFormat::from_path(path))
            .ok_or_else(|| OdmxError::UnknownFormat {
                path: path.to_path_buf(),
            })
    }

    pub fn reader_for(&self, format: MatrixFormat) -> Result<&dyn MatrixReader> {
        self.readers
            .get(&format)
            .map(|adapter| &**adapter)
            .ok_or(OdmxError::NoAdapter { format })
    }

    pub fn writer_for(&self, format: MatrixFormat) -> Result<&dyn MatrixWriter> {
        self.writers
            .get(&format)
            .map(|adapter| &**adapter)
            .ok_or(OdmxError::NoAdapter { format })
    }

    /// Read a matrix, choosing the adapter from the path
    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<DenseMatrix> {
        let path = path.as_ref();
        let format = self.detect(path)?;
        tracing::debug!(path = %path.display(), %format, "dispatching read");
        self.reader_for(format)?.read(path)
    }

    /// Write a matrix, choosing the adapter from the path
    pub fn write<P: AsRef<Path>>(&self, matrix: &DenseMatrix, path: P) -> Result<()> {
        let path = path.as_ref();
        let format = self.detect(path)?;
        tracing::debug!(path = %path.display(), %format, "dispatching write");
        self.writer_for(format)?.write(matrix, path)
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut readers: Vec<_> = self.readers.keys().collect();
        let mut writers: Vec<_> = self.writers.keys().collect();
        readers.sort();
        writers.sort();
        f.debug_struct("FormatRegistry")
            .field("config", &self.config)
            .field("readers", &readers)
            .field("writers", &writers)
            .finish()
    }
}

/// Builder for [`FormatRegistry`]
///
/// Starts with the binary adapter configured from `config.binary`;
/// registering an adapter for a format replaces any earlier one.
pub struct FormatRegistryBuilder {
    config: RegistryConfig,
    readers: HashMap<MatrixFormat, Box<dyn MatrixReader>>,
    writers: HashMap<MatrixFormat, Box<dyn MatrixWriter>>,
}

impl FormatRegistryBuilder {
    fn new(config: RegistryConfig) -> Self {
        let binary = BinaryAdapter::new(config.binary);
        let mut readers: HashMap<MatrixFormat, Box<dyn MatrixReader>> = HashMap::new();
        let mut writers: HashMap<MatrixFormat, Box<dyn MatrixWriter>> = HashMap::new();
        readers.insert(MatrixFormat::Binary, Box::new(binary));
        writers.insert(MatrixFormat::Binary, Box::new(binary));

        Self {
            config,
            readers,
            writers,
        }
    }

    pub fn register_reader(mut self, format: MatrixFormat, reader: impl MatrixReader + 'static) -> Self {
        self.readers.insert(format, Box::new(reader));
        self
    }

    pub fn register_writer(mut self, format: MatrixFormat, writer: impl MatrixWriter + 'static) -> Self {
        self.writers.insert(format, Box::new(writer));
        self
    }

    pub fn build(self) -> FormatRegistry {
        tracing::debug!(
            readers = self.readers.len(),
            writers = self.writers.len(),
            overrides = self.config.extensions.len(),
            "built format registry"
        );
        FormatRegistry {
            config: self.config,
            readers: self.readers,
            writers: self.writers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(MatrixFormat::from_name("BINARY"), Some(MatrixFormat::Binary));
        assert_eq!(MatrixFormat::from_name("TpPlus"), Some(MatrixFormat::Tpplus));
        assert_eq!(MatrixFormat::from_name("parquet"), None);
    }

    #[test]
    fn test_from_path() {
        let detect = |name: &str| MatrixFormat::from_path(Path::new(name));
        assert_eq!(detect("dir/trips.bin"), Some(MatrixFormat::Binary));
        assert_eq!(detect("TRIPS.BINARY"), Some(MatrixFormat::Binary));
        assert_eq!(detect("skims.zmx"), Some(MatrixFormat::Zip));
        assert_eq!(detect("od.csv"), Some(MatrixFormat::Csv));
        assert_eq!(detect("emmebank"), Some(MatrixFormat::Emme2));
        assert_eq!(detect("emme2ban"), Some(MatrixFormat::Emme2));
        assert_eq!(detect("am.tpp"), Some(MatrixFormat::Tpplus));
        assert_eq!(detect("am.mtx"), Some(MatrixFormat::Transcad));
        assert_eq!(detect("trips.bin.bak"), Some(MatrixFormat::Binary));
        assert_eq!(detect(".bin"), None);
        assert_eq!(detect("notes.txt"), None);
    }

    #[test]
    fn test_display_and_serde_names_agree() {
        for format in MatrixFormat::ALL {
            let json = serde_json::to_string(&format).unwrap();
            assert_eq!(json, format!("\"{format}\""));
        }
    }

    #[test]
    fn test_no_adapter() {
        let registry = FormatRegistry::builder(RegistryConfig::default()).build();
        assert!(registry.reader_for(MatrixFormat::Binary).is_ok());
        assert!(matches!(
            registry.reader_for(MatrixFormat::Csv),
            Err(OdmxError::NoAdapter { format: MatrixFormat::Csv })
        ));
        assert!(matches!(
            registry.read("od.csv"),
            Err(OdmxError::NoAdapter { .. })
        ));
        assert!(matches!(
            registry.read("od.unknown"),
            Err(OdmxError::UnknownFormat { .. })
        ));
    }

    #[test]
    fn test_config_extension_wins() {
        let config = RegistryConfig::default().with_extension("bin", MatrixFormat::Csv);
        let registry = FormatRegistry::builder(config).build();
        assert_eq!(registry.detect(Path::new("a.bin")).unwrap(), MatrixFormat::Csv);
        assert_eq!(registry.detect(Path::new("a.zip")).unwrap(), MatrixFormat::Zip);
    }
}
