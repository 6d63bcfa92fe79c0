//! Format constants for the binary matrix layout

/// Lookup table marker for a cell with no stored value
pub const ABSENT: i32 = -9999;

/// Size of every integer and float field in the binary layout
pub const FIELD_SIZE: usize = 4;

/// Largest byte length of a length-prefixed string
pub const MAX_UTF_LEN: usize = u16::MAX as usize;

/// Key matrix values at or above this bound mark a cell as absent
pub const KEY_UPPER_BOUND: f32 = 99999.9;

/// Compact cell encoding constants
pub mod compact {
    /// Fixed-point scale (two decimals)
    pub const SCALE: f32 = 100.0;

    /// Smallest representable decoded value
    pub const MIN_VALUE: f32 = i16::MIN as f32 / SCALE;

    /// Largest representable decoded value
    pub const MAX_VALUE: f32 = i16::MAX as f32 / SCALE;
}
