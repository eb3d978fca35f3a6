//! Error types for hopping block operations

/// Errors that can occur while building or converting hopping blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoppingError {
    /// Family id is not below the number of families
    FamilyOutOfRange,
    /// Row or column index is not below the number of sites
    SiteOutOfRange,
    /// Parallel sequences (rows/cols, reserve counts) have the wrong length
    LengthMismatch,
    /// Two stores or matrices have different shapes
    ShapeMismatch,
    /// Memory allocation failed
    AllocationFailed,
    /// A count does not fit the 32-bit storage index
    ArraySizeOverflow,
    /// Array region is not aligned to its element size
    ArrayAlignment,
    /// Compressed matrix arrays are inconsistent
    InvalidStructure,
    /// Invalid file header
    InvalidHeader,
    /// Unsupported format version or layout
    UnsupportedFormat,
    /// File regions are truncated or overlap
    CorruptedData,
    /// Malformed text triplet line
    InvalidTriplet,
}

/// Coarse grouping of [`HoppingError`] values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller broke a documented precondition
    Precondition,
    /// Memory or index space ran out
    Resource,
    /// Persisted or textual input is malformed
    Format,
}

impl HoppingError {
    /// Category of this error
    pub const fn category(&self) -> ErrorCategory {
        match self {
            HoppingError::FamilyOutOfRange
            | HoppingError::SiteOutOfRange
            | HoppingError::LengthMismatch
            | HoppingError::ShapeMismatch => ErrorCategory::Precondition,
            HoppingError::AllocationFailed | HoppingError::ArraySizeOverflow => {
                ErrorCategory::Resource
            }
            HoppingError::ArrayAlignment
            | HoppingError::InvalidStructure
            | HoppingError::InvalidHeader
            | HoppingError::UnsupportedFormat
            | HoppingError::CorruptedData
            | HoppingError::InvalidTriplet => ErrorCategory::Format,
        }
    }
}

impl core::fmt::Display for HoppingError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            HoppingError::FamilyOutOfRange => "Hopping family id out of range",
            HoppingError::SiteOutOfRange => "Site index out of range",
            HoppingError::LengthMismatch => "Sequence length mismatch",
            HoppingError::ShapeMismatch => "Shape mismatch",
            HoppingError::AllocationFailed => "Memory allocation failed",
            HoppingError::ArraySizeOverflow => "Array size exceeds storage index range",
            HoppingError::ArrayAlignment => "Array not properly aligned",
            HoppingError::InvalidStructure => "Inconsistent compressed matrix structure",
            HoppingError::InvalidHeader => "Invalid hopping file header",
            HoppingError::UnsupportedFormat => "Unsupported format version",
            HoppingError::CorruptedData => "Data corruption detected",
            HoppingError::InvalidTriplet => "Malformed hopping triplet",
        };
        write!(f, "{msg}")
    }
}

/// Result type for hopping block operations
pub type Result<T> = core::result::Result<T, HoppingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            HoppingError::FamilyOutOfRange.category(),
            ErrorCategory::Precondition
        );
        assert_eq!(
            HoppingError::AllocationFailed.category(),
            ErrorCategory::Resource
        );
        assert_eq!(HoppingError::InvalidHeader.category(), ErrorCategory::Format);
    }
}
