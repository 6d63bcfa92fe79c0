use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use odmx::{
    BinaryMatrixFile, BinaryWriteOptions, DenseMatrix, FormatRegistry, FormatVersion,
    MatrixFormat, MatrixReader, MatrixWriter, OdmxError, RegistryConfig, Result,
};

/// Reads every file as a fixed 1x1 matrix and counts calls
struct CountingReader {
    calls: Arc<AtomicUsize>,
}

impl MatrixReader for CountingReader {
    fn read(&self, _path: &Path) -> Result<DenseMatrix> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut matrix = DenseMatrix::new(1, 1)?.with_name("stub");
        matrix.set(1, 1, 42.0)?;
        Ok(matrix)
    }
}

/// Writes the sum of all cells as text
struct SumWriter;

impl MatrixWriter for SumWriter {
    fn write(&self, matrix: &DenseMatrix, path: &Path) -> Result<()> {
        let mut file = fs::File::create(path).map_err(|source| OdmxError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        write!(file, "{}", matrix.sum()).map_err(|source| OdmxError::FileAccess {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn sample() -> DenseMatrix {
    DenseMatrix::from_values(2, 2, vec![1.0, 2.0, 3.0, 4.0])
        .unwrap()
        .with_name("sample")
}

#[test]
fn binary_dispatch_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.bin");
    let registry = FormatRegistry::builder(RegistryConfig::default()).build();

    registry.write(&sample(), &path).unwrap();
    assert_eq!(registry.read(&path).unwrap(), sample());
}

#[test]
fn registered_adapters_are_used() {
    let dir = tempfile::tempdir().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = FormatRegistry::builder(RegistryConfig::default())
        .register_reader(
            MatrixFormat::Csv,
            CountingReader {
                calls: Arc::clone(&calls),
            },
        )
        .register_writer(MatrixFormat::Csv, SumWriter)
        .build();

    let path = dir.path().join("od.csv");
    registry.write(&sample(), &path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "10");

    let read = registry.read(&path).unwrap();
    assert_eq!(read.get(1, 1), Ok(42.0));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn registration_replaces_built_in_adapter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("replaced.bin");
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = FormatRegistry::builder(RegistryConfig::default())
        .register_reader(
            MatrixFormat::Binary,
            CountingReader {
                calls: Arc::clone(&calls),
            },
        )
        .build();

    assert_eq!(registry.read(&path).unwrap().name(), "stub");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn missing_adapter_and_unknown_format() {
    let registry = FormatRegistry::builder(RegistryConfig::default()).build();

    match registry.read("skims.mtx") {
        Err(OdmxError::NoAdapter { format }) => assert_eq!(format, MatrixFormat::Transcad),
        other => panic!("expected NoAdapter, got {other:?}"),
    }
    assert!(matches!(
        registry.write(&sample(), "matrix.parquet"),
        Err(OdmxError::UnknownFormat { .. })
    ));
}

#[test]
fn config_file_drives_detection_and_binary_version() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("registry.json");
    fs::write(
        &config_path,
        r#"{ "binary": { "version": "v1" }, "extensions": { "skim": "binary" } }"#,
    )
    .unwrap();

    let config = RegistryConfig::from_json_file(&config_path).unwrap();
    let registry = FormatRegistry::builder(config).build();

    let path = dir.path().join("am.skim");
    registry.write(&sample(), &path).unwrap();

    let file = BinaryMatrixFile::open(&path).unwrap();
    assert_eq!(file.header.version, FormatVersion::V1);
    assert_eq!(registry.read(&path).unwrap(), sample());
}

#[test]
fn bad_config_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("broken.json");
    fs::write(&config_path, "{ \"binary\": ").unwrap();

    match RegistryConfig::from_json_file(&config_path) {
        Err(OdmxError::Config { path, .. }) => assert_eq!(path, config_path),
        other => panic!("expected Config error, got {other:?}"),
    }
    assert!(matches!(
        RegistryConfig::from_json_file(dir.path().join("missing.json")),
        Err(OdmxError::FileAccess { .. })
    ));
}

#[test]
fn registry_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<FormatRegistry>();

    let options = BinaryWriteOptions::default();
    assert_eq!(options.version, FormatVersion::V2);
}
