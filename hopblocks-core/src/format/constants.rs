//! Format constants for persisted hopping matrices

/// Magic bytes opening every hopping file
pub const MAGIC: [u8; 4] = *b"HOPB";

/// Current file format version
pub const VERSION: u8 = 1;

/// Fixed size of the file header in bytes
pub const HEADER_SIZE: usize = 128;

/// Alignment boundary of every array region
pub const ALIGNMENT_BOUNDARY: usize = 8;

/// Structure flag: values are hopping family ids
pub const FAMILY_ID_VALUES: u8 = 1;
