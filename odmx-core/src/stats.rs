//! Matrix summary statistics
//!
//! Non-finite cells (NaN and the two infinities) are counted separately and
//! left out of every sum, extreme and percentile.

use alloc::vec::Vec;

/// Percentile points over the finite cells of a matrix
///
/// Finite values are sorted and split into one-percent bins; percentile `p`
/// is the largest value falling in bin `p`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Percentiles {
    pub p5: f32,
    pub p25: f32,
    pub p50: f32,
    pub p75: f32,
    pub p95: f32,
}

impl Percentiles {
    /// Percentiles of an ascending, non-empty slice
    fn from_sorted(sorted: &[f32]) -> Option<Self> {
        if sorted.is_empty() {
            return None;
        }
        let at = |p: usize| {
            let k = sorted.len();
            sorted[((p + 1) * k).div_ceil(100) - 1]
        };
        Some(Self {
            p5: at(5),
            p25: at(25),
            p50: at(50),
            p75: at(75),
            p95: at(95),
        })
    }
}

/// Summary of the cell values of a matrix
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatrixStats {
    /// Sum of finite cells, accumulated in `f64`
    pub sum: f64,
    /// Sum of negative finite cells
    pub sum_negative: f64,
    /// Sum of positive finite cells
    pub sum_positive: f64,
    /// Smallest finite cell, `+inf` when no cell is finite
    pub min: f32,
    /// Largest finite cell, `-inf` when no cell is finite
    pub max: f32,
    /// Number of cells equal to zero
    pub zero_count: usize,
    pub negative_count: usize,
    pub positive_count: usize,
    pub nan_count: usize,
    pub negative_infinity_count: usize,
    pub positive_infinity_count: usize,
    /// Total number of cells
    pub cells: usize,
    /// `None` when no cell is finite
    pub percentiles: Option<Percentiles>,
}

impl MatrixStats {
    /// Summarize `values`
    pub fn from_values(values: &[f32]) -> Self {
        let mut stats = Self {
            sum: 0.0,
            sum_negative: 0.0,
            sum_positive: 0.0,
            min: f32::INFINITY,
            max: f32::NEG_INFINITY,
            zero_count: 0,
            negative_count: 0,
            positive_count: 0,
            nan_count: 0,
            negative_infinity_count: 0,
            positive_infinity_count: 0,
            cells: values.len(),
            percentiles: None,
        };

        let mut finite = Vec::with_capacity(values.len());
        for &value in values {
            if value.is_nan() {
                stats.nan_count += 1;
            } else if value == f32::NEG_INFINITY {
                stats.negative_infinity_count += 1;
            } else if value == f32::INFINITY {
                stats.positive_infinity_count += 1;
            } else {
                if value == 0.0 {
                    stats.zero_count += 1;
                } else if value < 0.0 {
                    stats.negative_count += 1;
                    stats.sum_negative += f64::from(value);
                } else {
                    stats.positive_count += 1;
                    stats.sum_positive += f64::from(value);
                }
                finite.push(value);
            }
        }

        finite.sort_unstable_by(f32::total_cmp);
        if let (Some(&first), Some(&last)) = (finite.first(), finite.last()) {
            stats.min = first;
            stats.max = last;
        }
        stats.sum = stats.sum_negative + stats.sum_positive;
        stats.percentiles = Percentiles::from_sorted(&finite);
        stats
    }

    /// Number of finite cells
    pub fn finite_count(&self) -> usize {
        self.zero_count + self.negative_count + self.positive_count
    }

    /// Mean over finite cells
    pub fn mean(&self) -> f64 {
        match self.finite_count() {
            0 => 0.0,
            n => self.sum / n as f64,
        }
    }

    /// Share of cells that are non-zero
    pub fn density(&self) -> f64 {
        if self.cells == 0 {
            0.0
        } else {
            (self.cells - self.zero_count) as f64 / self.cells as f64
        }
    }
}
