//! Pure validation helpers
//!
//! Bounds checks guarding the hopping store and layout checks for
//! persisted matrices. No I/O.

pub mod bounds;
pub mod format;

pub use bounds::{
    validate_array_bounds, validate_family, validate_parallel_lengths, validate_site,
    validate_storage_count, MAX_STORAGE_INDEX,
};
pub use format::{align_to_boundary, validate_offset_alignment, validate_region};
