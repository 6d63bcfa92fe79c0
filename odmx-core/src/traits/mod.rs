//! Abstract interfaces for the matrix model
//!
//! Traits are pure interfaces - implementations live with the types they
//! describe.

pub mod encoding;
pub mod rows;

pub use encoding::CellEncoding;
pub use rows::RowSource;
