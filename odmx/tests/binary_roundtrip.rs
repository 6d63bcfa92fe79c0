use std::fs::{self, File};
use std::io::Write;

use odmx::{
    BinaryMatrixFile, BinaryMatrixReader, BinaryWriteOptions, DenseMatrix, FormatVersion,
    OdmxError, ZoneIndex,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_matrix(rows: &[i32], cols: &[i32], seed: u64) -> DenseMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut matrix =
        DenseMatrix::with_zones(ZoneIndex::new(rows).unwrap(), ZoneIndex::new(cols).unwrap())
            .unwrap()
            .with_name("random")
            .with_description("seeded test matrix");
    for i in 0..rows.len() {
        for value in matrix.internal_row_mut(i) {
            *value = rng.gen_range(-1.0e6..1.0e6);
        }
    }
    matrix
}

#[test]
fn binary_round_trip_is_exact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("random.bin");
    let matrix = random_matrix(&[4, 8, 15, 16, 23, 42], &[1, 3, 5, 7, 9, 11, 13], 11);

    BinaryMatrixFile::write_matrix(&matrix, &path).unwrap();
    let read = BinaryMatrixFile::read_matrix(&path).unwrap();

    assert_eq!(read, matrix);
    assert_eq!(read.description(), "seeded test matrix");
}

#[test]
fn version_two_keeps_distinct_zone_tables() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("v2.bin");
    let mut matrix = DenseMatrix::with_zones(
        ZoneIndex::new(&[100, 200]).unwrap(),
        ZoneIndex::new(&[7, 3]).unwrap(),
    )
    .unwrap();
    matrix.set(200, 3, 2.5).unwrap();

    BinaryMatrixFile::write_matrix(&matrix, &path).unwrap();
    let file = BinaryMatrixFile::open(&path).unwrap();
    assert_eq!(file.header.version, FormatVersion::V2);
    assert_eq!(file.header.external_row_count, 3);
    assert_eq!(file.header.external_col_count, 3);

    let read = BinaryMatrixFile::read_matrix(&path).unwrap();
    assert_eq!(read.row_zones().as_slice(), &[100, 200]);
    assert_eq!(read.col_zones().as_slice(), &[7, 3]);
    assert_eq!(read.get(200, 3), Ok(2.5));
}

#[test]
fn version_one_copies_row_zones_to_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("v1.bin");
    let zones = [10, 20, 30];
    let matrix = random_matrix(&zones, &zones, 5);

    let options = BinaryWriteOptions::default().with_version(FormatVersion::V1);
    BinaryMatrixFile::write_matrix_with(&matrix, &path, options).unwrap();

    let read = BinaryMatrixFile::read_matrix(&path).unwrap();
    assert_eq!(read.col_zones(), read.row_zones());
    assert_eq!(read, matrix);
}

#[test]
fn version_one_rejects_rectangular_without_touching_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keep.bin");
    fs::write(&path, b"existing").unwrap();

    let matrix = DenseMatrix::new(2, 3).unwrap();
    let options = BinaryWriteOptions::default().with_version(FormatVersion::V1);
    let err = BinaryMatrixFile::write_matrix_with(&matrix, &path, options).unwrap_err();

    assert!(matches!(
        err,
        OdmxError::Version1RequiresSquare { ref path } if path.ends_with("keep.bin")
    ));
    assert_eq!(fs::read(&path).unwrap(), b"existing");
}

#[test]
fn rows_are_served_by_zone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rows.bin");
    let matrix = random_matrix(&[9, 2, 6], &[1, 2], 3);
    BinaryMatrixFile::write_matrix(&matrix, &path).unwrap();

    let mut reader = BinaryMatrixReader::open(&path).unwrap();
    let mut row = [0.0f32; 2];
    for zone in [6, 9, 2] {
        reader.read_row(zone, &mut row).unwrap();
        assert_eq!(&row, matrix.row(zone).unwrap());
    }

    let copied = DenseMatrix::from_source(&mut reader).unwrap();
    assert_eq!(copied.values(), matrix.values());
}

#[test]
fn writing_truncates_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shrink.bin");
    BinaryMatrixFile::write_matrix(&random_matrix(&[1, 2, 3, 4], &[1, 2, 3, 4], 1), &path)
        .unwrap();
    let small = random_matrix(&[1], &[1], 2);
    BinaryMatrixFile::write_matrix(&small, &path).unwrap();

    assert_eq!(BinaryMatrixFile::read_matrix(&path).unwrap(), small);
}

#[test]
fn truncated_file_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("truncated.bin");
    BinaryMatrixFile::write_matrix(&random_matrix(&[1, 2], &[1, 2], 4), &path).unwrap();

    let bytes = fs::read(&path).unwrap();
    for cut in [2, 10, 30, bytes.len() - 1] {
        fs::write(&path, &bytes[..cut]).unwrap();
        let err = BinaryMatrixFile::read_matrix(&path).unwrap_err();
        assert!(
            matches!(err, OdmxError::CorruptFormat { .. }),
            "cut at {cut}: {err}"
        );
    }
}

#[test]
fn unknown_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("v3.bin");
    let mut file = File::create(&path).unwrap();
    for field in [3i32, 1, 1, 2, 2] {
        file.write_all(&field.to_be_bytes()).unwrap();
    }
    drop(file);

    let err = BinaryMatrixFile::read_matrix(&path).unwrap_err();
    assert!(matches!(err, OdmxError::UnsupportedVersion { version: 3, .. }));
}

fn write_raw(path: &std::path::Path, fields: &[i32], tail: &[u8]) {
    let mut file = File::create(path).unwrap();
    for field in fields {
        file.write_all(&field.to_be_bytes()).unwrap();
    }
    file.write_all(tail).unwrap();
}

#[test]
fn empty_shape_in_header_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.bin");
    // zero rows, one column zone (7), empty name and description
    write_raw(&path, &[2, 0, 1, 1, 2], &[0, 0, 0, 0, 0, 0, 0, 7]);

    match BinaryMatrixFile::open(&path) {
        Err(OdmxError::CorruptFormat { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected CorruptFormat, got {other:?}"),
    }
}

#[test]
fn version_one_rectangular_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("v1.bin");
    write_raw(&path, &[1, 3, 2, 4], &[]);

    match BinaryMatrixFile::read_matrix(&path) {
        Err(OdmxError::Version1RequiresSquare { path: reported }) => assert_eq!(reported, path),
        other => panic!("expected Version1RequiresSquare, got {other:?}"),
    }
}

#[test]
fn missing_file_is_an_access_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.bin");

    match BinaryMatrixFile::read_matrix(&path) {
        Err(OdmxError::FileAccess { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected FileAccess, got {other:?}"),
    }
}

#[test]
fn names_survive_modified_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("names.bin");
    let matrix = DenseMatrix::new(1, 1)
        .unwrap()
        .with_name("trips\u{0}am")
        .with_description("Zürich 🚆");

    BinaryMatrixFile::write_matrix(&matrix, &path).unwrap();
    let read = BinaryMatrixFile::read_matrix(&path).unwrap();
    assert_eq!(read.name(), "trips\u{0}am");
    assert_eq!(read.description(), "Zürich 🚆");
}

#[cfg(feature = "mmap")]
#[test]
fn mapped_and_streamed_reads_agree() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mapped.bin");
    let matrix = random_matrix(&[5, 1, 3, 8], &[2, 4, 6], 17);
    BinaryMatrixFile::write_matrix(&matrix, &path).unwrap();

    let mut mapped = odmx::MappedBinaryMatrix::open(&path).unwrap();
    assert_eq!(mapped.to_dense().unwrap(), matrix);
    assert_eq!(mapped.dimensions(), (4, 3));

    let from_rows = DenseMatrix::from_source(&mut mapped).unwrap();
    assert_eq!(from_rows.values(), matrix.values());
}
