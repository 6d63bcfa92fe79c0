//! Cell encodings for collapsed matrices

use crate::format::constants::compact::SCALE;
use crate::{CellEncoding, MatrixError, Result};

/// Full-precision `f32` cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FloatCells;

impl CellEncoding for FloatCells {
    type Stored = f32;

    const NAME: &'static str = "float";

    fn encode(value: f32) -> Result<f32> {
        Ok(value)
    }

    fn decode(stored: f32) -> f32 {
        stored
    }
}

/// Two-decimal fixed-point cells stored in an `i16`
///
/// A value is stored as `round(value * 100)`, rounding half away from zero,
/// and decoded as `stored / 100`. The representable range is
/// `[-327.68, 327.67]`; anything outside it, and NaN, fails to encode.
/// This trades range and precision for half the memory of [`FloatCells`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompactCells;

impl CellEncoding for CompactCells {
    type Stored = i16;

    const NAME: &'static str = "compact";

    fn encode(value: f32) -> Result<i16> {
        // exact in f64, so the half-hundredth offset rounds only once
        let scaled = f64::from(value) * f64::from(SCALE);
        let rounded = if scaled >= 0.0 {
            scaled + 0.5
        } else {
            scaled - 0.5
        };

        // `as` truncates toward zero, completing the half-away rounding
        if !(rounded > f64::from(i16::MIN) - 1.0 && rounded < f64::from(i16::MAX) + 1.0) {
            return Err(MatrixError::ValueOutOfRange { value });
        }
        Ok(rounded as i16)
    }

    fn decode(stored: i16) -> f32 {
        stored as f32 / SCALE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::constants::compact::{MAX_VALUE, MIN_VALUE};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_float_is_lossless() {
        for value in [0.0f32, -1.25, 1e9, f32::MIN_POSITIVE] {
            assert_eq!(FloatCells::decode(FloatCells::encode(value).unwrap()), value);
        }
    }

    #[test]
    fn test_compact_rounding() {
        assert_eq!(CompactCells::encode(12.345), Ok(1235));
        assert_eq!(CompactCells::encode(-12.345), Ok(-1235));
        assert_eq!(CompactCells::encode(0.004), Ok(0));
        assert_eq!(CompactCells::decode(1235), 12.35);
    }

    #[test]
    fn test_compact_rounds_once_below_half() {
        // 0.005f32 is 0.0049999998..., just under half a hundredth; scaling
        // in f32 rounds it to 0.5 before the offset is added
        let below_half = 0.005f32;
        assert!(f64::from(below_half) < 0.005);
        assert_eq!(CompactCells::encode(below_half), Ok(0));
        assert_eq!(CompactCells::encode(-below_half), Ok(0));
        assert_eq!(CompactCells::encode(0.0051), Ok(1));
        assert_eq!(CompactCells::encode(1.125), Ok(113));
    }

    #[test]
    fn test_compact_range_edges() {
        assert_eq!(CompactCells::encode(MAX_VALUE), Ok(i16::MAX));
        assert_eq!(CompactCells::encode(MIN_VALUE), Ok(i16::MIN));
        assert_eq!(
            CompactCells::encode(327.68),
            Err(MatrixError::ValueOutOfRange { value: 327.68 })
        );
        assert!(CompactCells::encode(-400.0).is_err());
        assert!(CompactCells::encode(f32::NAN).is_err());
        assert!(CompactCells::encode(f32::INFINITY).is_err());
    }

    #[test]
    fn test_compact_round_trip_within_half_hundredth() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let value: f32 = rng.gen_range(-327.0..327.0);
            let decoded = CompactCells::decode(CompactCells::encode(value).unwrap());
            let tolerance = 0.005 + f32::EPSILON * 400.0;
            let error = decoded - value;
            assert!(
                error <= tolerance && error >= -tolerance,
                "{value} decoded as {decoded}"
            );
        }
    }

    #[test]
    fn test_stored_size() {
        assert_eq!(FloatCells::stored_size(), 4);
        assert_eq!(CompactCells::stored_size(), 2);
    }
}
