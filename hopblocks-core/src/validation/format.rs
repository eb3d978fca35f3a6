//! Layout validation for persisted hopping matrices
//!
//! Pure offset arithmetic on file regions, with no I/O.

use crate::HoppingError;

/// Align an offset to a power-of-two boundary
pub const fn align_to_boundary(offset: usize, boundary: usize) -> usize {
    (offset + boundary - 1) & !(boundary - 1)
}

/// Validate that a boundary is a power of 2
pub const fn validate_alignment_boundary(boundary: usize) -> Result<(), HoppingError> {
    if boundary == 0 || (boundary & (boundary - 1)) != 0 {
        return Err(HoppingError::ArrayAlignment);
    }
    Ok(())
}

/// Bytes needed to move `offset` up to the next `boundary`
pub const fn calculate_padding(offset: usize, boundary: usize) -> usize {
    align_to_boundary(offset, boundary) - offset
}

/// Validate that an offset meets an alignment requirement
pub const fn validate_offset_alignment(offset: usize, boundary: usize) -> Result<(), HoppingError> {
    if offset % boundary != 0 {
        return Err(HoppingError::ArrayAlignment);
    }
    Ok(())
}

/// Validate that `offset..offset + size` lies inside a `total_size` buffer
///
/// Returns the exclusive end of the region.
pub const fn validate_region(
    offset: usize,
    size: usize,
    total_size: usize,
) -> Result<usize, HoppingError> {
    let end = match offset.checked_add(size) {
        Some(end) => end,
        None => return Err(HoppingError::ArraySizeOverflow),
    };
    if end > total_size {
        return Err(HoppingError::CorruptedData);
    }
    Ok(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_to_boundary() {
        assert_eq!(align_to_boundary(0, 8), 0);
        assert_eq!(align_to_boundary(1, 8), 8);
        assert_eq!(align_to_boundary(8, 8), 8);
        assert_eq!(align_to_boundary(9, 8), 16);
        assert_eq!(align_to_boundary(3, 4), 4);
    }

    #[test]
    fn test_validate_alignment_boundary() {
        assert_eq!(validate_alignment_boundary(1), Ok(()));
        assert_eq!(validate_alignment_boundary(8), Ok(()));
        assert_eq!(
            validate_alignment_boundary(0),
            Err(HoppingError::ArrayAlignment)
        );
        assert_eq!(
            validate_alignment_boundary(6),
            Err(HoppingError::ArrayAlignment)
        );
    }

    #[test]
    fn test_calculate_padding() {
        assert_eq!(calculate_padding(0, 8), 0);
        assert_eq!(calculate_padding(1, 8), 7);
        assert_eq!(calculate_padding(128, 8), 0);
    }

    #[test]
    fn test_validate_region() {
        assert_eq!(validate_region(0, 10, 20), Ok(10));
        assert_eq!(validate_region(10, 10, 20), Ok(20));
        assert_eq!(validate_region(20, 0, 20), Ok(20));
        assert_eq!(validate_region(15, 10, 20), Err(HoppingError::CorruptedData));
        assert_eq!(
            validate_region(usize::MAX, 1, 20),
            Err(HoppingError::ArraySizeOverflow)
        );
    }
}
