//! Binary layout definitions for persisted hopping matrices
//!
//! Pure data structure definitions; reading and writing files lives in
//! the `hopblocks` crate.

pub mod constants;
pub mod header;

pub use header::{DataType, HoppingFileHeader, MatrixFormat};
