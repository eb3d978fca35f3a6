//! Index and array bounds validation
//!
//! Pure checks used before any write into a hopping store, so that a
//! rejected call never leaves partial state behind.

use crate::{HoppingError, StorageIdx};

/// Largest count or index representable in the compressed output arrays
pub const MAX_STORAGE_INDEX: usize = StorageIdx::MAX as usize;

/// Validate that a family id addresses one of `num_families` blocks
pub const fn validate_family(family_id: usize, num_families: usize) -> Result<(), HoppingError> {
    if family_id >= num_families {
        return Err(HoppingError::FamilyOutOfRange);
    }
    Ok(())
}

/// Validate that a site index lies inside a `num_sites` square matrix
///
/// The index must also fit a [`StorageIdx`].
pub const fn validate_site(index: usize, num_sites: usize) -> Result<(), HoppingError> {
    if index >= num_sites {
        return Err(HoppingError::SiteOutOfRange);
    }
    if index > MAX_STORAGE_INDEX {
        return Err(HoppingError::ArraySizeOverflow);
    }
    Ok(())
}

/// Validate that a count fits the storage index type
pub const fn validate_storage_count(count: usize) -> Result<StorageIdx, HoppingError> {
    if count > MAX_STORAGE_INDEX {
        return Err(HoppingError::ArraySizeOverflow);
    }
    Ok(count as StorageIdx)
}

/// Validate that two parallel sequences have the same length
pub const fn validate_parallel_lengths(a: usize, b: usize) -> Result<(), HoppingError> {
    if a != b {
        return Err(HoppingError::LengthMismatch);
    }
    Ok(())
}

/// Validate array bounds for a given element type
///
/// Returns the element count held by `byte_len` bytes, with overflow
/// protection for downstream offset arithmetic.
pub const fn validate_array_bounds<T>(byte_len: usize) -> Result<usize, HoppingError> {
    let element_size = core::mem::size_of::<T>();

    if byte_len % element_size != 0 {
        return Err(HoppingError::ArrayAlignment);
    }

    let count = byte_len / element_size;

    // Conservative: leaves headroom for byte-offset multiplication
    if count > usize::MAX / 8 {
        return Err(HoppingError::ArraySizeOverflow);
    }

    Ok(count)
}
