use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use odmx::{
    BinaryMatrixFile, BinaryMatrixReader, CompactCollapsedMatrix, DenseMatrix, LookupTable,
    ZoneIndex,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SIZES: [usize; 3] = [100, 500, 1500];

fn build_matrix(zones: usize) -> DenseMatrix {
    let mut rng = StdRng::seed_from_u64(zones as u64);
    let ids: Vec<i32> = (0..zones as i32).map(|i| 1000 + i * 3).collect();
    let index = ZoneIndex::new(&ids).expect("unique zone ids");
    let mut matrix = DenseMatrix::with_zones(index.clone(), index)
        .expect("non-empty matrix")
        .with_name("bench");
    for i in 0..zones {
        for value in matrix.internal_row_mut(i) {
            *value = rng.gen_range(0.0..300.0);
        }
    }
    matrix
}

fn bench_write(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut group = c.benchmark_group("binary_write");

    for zones in SIZES {
        let matrix = build_matrix(zones);
        let path = dir.path().join(format!("write_{zones}.bin"));
        group.throughput(Throughput::Bytes((zones * zones * 4) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(zones), &matrix, |b, m| {
            b.iter(|| BinaryMatrixFile::write_matrix(black_box(m), &path).expect("write"))
        });
    }
    group.finish();
}

fn bench_read(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut group = c.benchmark_group("binary_read");

    for zones in SIZES {
        let path = dir.path().join(format!("read_{zones}.bin"));
        BinaryMatrixFile::write_matrix(&build_matrix(zones), &path).expect("write");
        group.throughput(Throughput::Bytes((zones * zones * 4) as u64));
        group.bench_with_input(BenchmarkId::new("full", zones), &path, |b, p| {
            b.iter(|| BinaryMatrixFile::read_matrix(black_box(p)).expect("read"))
        });

        let mut reader = BinaryMatrixReader::open(&path).expect("open");
        let mut row = vec![0.0f32; zones];
        let last = 1000 + (zones as i32 - 1) * 3;
        group.bench_with_input(BenchmarkId::new("single_row", zones), &last, |b, &zone| {
            b.iter(|| reader.read_row(black_box(zone), &mut row).expect("row"))
        });
    }
    group.finish();
}

fn bench_collapse(c: &mut Criterion) {
    let mut group = c.benchmark_group("collapse_compact");

    for zones in SIZES {
        let matrix = build_matrix(zones);
        let lookup = LookupTable::from_presence(zones, zones, |i, j| (i + j) % 4 == 0);
        group.bench_with_input(BenchmarkId::from_parameter(zones), &matrix, |b, m| {
            b.iter(|| CompactCollapsedMatrix::collapse(black_box(m), &lookup).expect("collapse"))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_write, bench_read, bench_collapse);
criterion_main!(benches);
