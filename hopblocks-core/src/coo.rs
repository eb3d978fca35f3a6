//! Coordinate pair stored in a hopping block

use bytemuck::{Pod, Zeroable};

/// Index type used for stored coordinates and compressed matrix arrays
pub type StorageIdx = u32;

/// One directed hopping from site `row` to site `col`
///
/// Pairs order lexicographically by `(row, col)`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coo {
    pub row: StorageIdx,
    pub col: StorageIdx,
}

impl Coo {
    /// Narrow a pair of already validated site indices
    pub const fn new(row: usize, col: usize) -> Self {
        Self {
            row: row as StorageIdx,
            col: col as StorageIdx,
        }
    }

    pub const fn row(&self) -> usize {
        self.row as usize
    }

    pub const fn col(&self) -> usize {
        self.col as usize
    }
}

impl From<(StorageIdx, StorageIdx)> for Coo {
    fn from((row, col): (StorageIdx, StorageIdx)) -> Self {
        Self { row, col }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_row_major() {
        assert!(Coo::new(0, 5) < Coo::new(1, 0));
        assert!(Coo::new(2, 1) < Coo::new(2, 3));
        assert_eq!(Coo::new(4, 4), Coo::from((4, 4)));
    }

    #[test]
    fn test_pod_layout() {
        assert_eq!(core::mem::size_of::<Coo>(), 8);
        let pairs = [Coo::new(1, 2), Coo::new(3, 4)];
        let raw: &[u32] = bytemuck::cast_slice(&pairs);
        assert_eq!(raw, &[1, 2, 3, 4]);
    }
}
