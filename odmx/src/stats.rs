//! Matrix summary logging

use odmx_core::{DenseMatrix, MatrixStats};

/// Emit `info` events summarizing `matrix` and return the statistics
///
/// One event carries the shape, zone ranges and cell counts by class, and a
/// second the finite-value distribution. Cells holding `-inf` are listed by
/// zone, since they usually mark unreachable pairs in skims.
pub fn log_matrix_stats(matrix: &DenseMatrix) -> MatrixStats {
    let stats = matrix.stats();
    let zone_range = |zones: &[i32]| {
        let min = zones.iter().min().copied().unwrap_or_default();
        let max = zones.iter().max().copied().unwrap_or_default();
        format!("[{min},{max}]")
    };

    tracing::info!(
        name = matrix.name(),
        description = matrix.description(),
        rows = matrix.rows(),
        cols = matrix.cols(),
        row_zones = %zone_range(matrix.row_zones().as_slice()),
        col_zones = %zone_range(matrix.col_zones().as_slice()),
        cells = stats.cells,
        finite = stats.finite_count(),
        zero = stats.zero_count,
        negative = stats.negative_count,
        positive = stats.positive_count,
        nan = stats.nan_count,
        negative_infinity = stats.negative_infinity_count,
        positive_infinity = stats.positive_infinity_count,
        "matrix statistics"
    );
    if stats.negative_infinity_count > 0 {
        tracing::info!(
            name = matrix.name(),
            cells = ?matrix.negative_infinity_cells(),
            "negative infinity cells"
        );
    }

    match stats.percentiles {
        Some(p) => tracing::info!(
            name = matrix.name(),
            min = stats.min,
            p5 = p.p5,
            p25 = p.p25,
            p50 = p.p50,
            p75 = p.p75,
            p95 = p.p95,
            max = stats.max,
            sum_negative = stats.sum_negative,
            sum_positive = stats.sum_positive,
            sum = stats.sum,
            mean = stats.mean(),
            "matrix value distribution"
        ),
        None => tracing::info!(name = matrix.name(), "matrix has no finite cells"),
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_returns_stats() {
        let matrix = DenseMatrix::from_values(2, 2, vec![1.0, 0.0, -2.0, 5.0])
            .unwrap()
            .with_name("flows");
        let stats = log_matrix_stats(&matrix);
        assert_eq!(stats.sum, 4.0);
        assert_eq!(stats.min, -2.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.zero_count, 1);
        assert_eq!(stats.percentiles.map(|p| p.p50), Some(1.0));
    }

    #[test]
    fn test_non_finite_matrix() {
        let matrix =
            DenseMatrix::from_values(1, 3, vec![f32::NEG_INFINITY, f32::NAN, 2.0]).unwrap();
        let stats = log_matrix_stats(&matrix);
        assert_eq!(stats.negative_infinity_count, 1);
        assert_eq!(stats.nan_count, 1);
        assert_eq!(stats.finite_count(), 1);

        let empty = DenseMatrix::from_values(1, 1, vec![f32::NAN]).unwrap();
        assert_eq!(log_matrix_stats(&empty).percentiles, None);
    }
}
