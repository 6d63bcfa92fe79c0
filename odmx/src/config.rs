//! Configuration for binary writing and format dispatch
//!
//! Both types deserialize from JSON with every field optional, so a config
//! file only needs to name what it changes:
//!
//! ```json
//! { "binary": { "version": "v1" }, "extensions": { "skim": "binary" } }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use odmx_core::FormatVersion;
use serde::{Deserialize, Serialize};

use crate::error::{OdmxError, Result};
use crate::registry::MatrixFormat;

/// Options for writing binary matrix files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinaryWriteOptions {
    /// Layout revision to write; version 1 only for square matrices with
    /// identical row and column zones
    pub version: FormatVersion,
}

impl BinaryWriteOptions {
    /// Write the given layout revision
    pub fn with_version(mut self, version: FormatVersion) -> Self {
        self.version = version;
        self
    }
}

/// Configuration consumed when building a [`crate::FormatRegistry`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Options for the built-in binary adapter
    pub binary: BinaryWriteOptions,
    /// File extension (lowercase, without the dot) to format, checked
    /// before the built-in detection rules
    pub extensions: BTreeMap<String, MatrixFormat>,
}

impl RegistryConfig {
    /// Set binary write options
    pub fn with_binary(mut self, binary: BinaryWriteOptions) -> Self {
        self.binary = binary;
        self
    }

    /// Map an extension to a format
    pub fn with_extension(mut self, extension: &str, format: MatrixFormat) -> Self {
        self.extensions.insert(normalize_extension(extension), format);
        self
    }

    /// Format configured for the extension of `path`, if any
    pub fn format_for_extension(&self, path: &Path) -> Option<MatrixFormat> {
        let extension = path.extension()?.to_str()?;
        self.extensions.get(&normalize_extension(extension)).copied()
    }

    /// Parse from a JSON document
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.extensions = std::mem::take(&mut config.extensions)
            .into_iter()
            .map(|(extension, format)| (normalize_extension(&extension), format))
            .collect();
        Ok(config)
    }

    /// Load from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json =
            std::fs::read_to_string(path).map_err(|source| OdmxError::file_access(path, source))?;
        let config = Self::from_json_str(&json).map_err(|source| OdmxError::Config {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), overrides = config.extensions.len(), "loaded registry config");
        Ok(config)
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_ascii_lowercase()
}
