//! Owned compressed sparse row matrix
//!
//! Produced by [`HoppingBlocks::to_csr`](crate::HoppingBlocks::to_csr).
//! Entries within a row keep their stored order, which is not sorted by
//! column, and repeated `(row, col)` pairs are kept as separate entries.

use alloc::vec::Vec;

use crate::traits::{MatrixElement, MatrixOperations, SparseMatrix};
use crate::{HoppingError, Result, StorageIdx};

/// Compressed sparse row matrix with 32-bit indices
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "RawCsrMatrix<T>",
        bound(deserialize = "T: MatrixElement + serde::Deserialize<'de>")
    )
)]
pub struct CsrMatrix<T> {
    nrows: usize,
    ncols: usize,
    indptr: Vec<StorageIdx>,
    indices: Vec<StorageIdx>,
    data: Vec<T>,
}

/// Unchecked serde form, validated through [`CsrMatrix::from_parts`]
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawCsrMatrix<T> {
    nrows: usize,
    ncols: usize,
    indptr: Vec<StorageIdx>,
    indices: Vec<StorageIdx>,
    data: Vec<T>,
}

#[cfg(feature = "serde")]
impl<T: MatrixElement> TryFrom<RawCsrMatrix<T>> for CsrMatrix<T> {
    type Error = HoppingError;

    fn try_from(raw: RawCsrMatrix<T>) -> Result<Self> {
        Self::from_parts(raw.nrows, raw.ncols, raw.indptr, raw.indices, raw.data)
    }
}

impl<T: MatrixElement> CsrMatrix<T> {
    /// Assemble a matrix from raw arrays, validating their structure
    ///
    /// `indptr` must start at 0, never decrease and end at `nnz`; every
    /// column must be below `ncols`.
    pub fn from_parts(
        nrows: usize,
        ncols: usize,
        indptr: Vec<StorageIdx>,
        indices: Vec<StorageIdx>,
        data: Vec<T>,
    ) -> Result<Self> {
        validate_csr_structure(nrows, ncols, &indptr, &indices, data.len())?;
        Ok(Self {
            nrows,
            ncols,
            indptr,
            indices,
            data,
        })
    }

    /// Assemble without validation; used by the converter whose output is
    /// correct by construction
    pub(crate) fn from_parts_unchecked(
        nrows: usize,
        ncols: usize,
        indptr: Vec<StorageIdx>,
        indices: Vec<StorageIdx>,
        data: Vec<T>,
    ) -> Self {
        debug_assert!(validate_csr_structure(nrows, ncols, &indptr, &indices, data.len()).is_ok());
        Self {
            nrows,
            ncols,
            indptr,
            indices,
            data,
        }
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Row pointer array, `nrows + 1` entries
    pub fn indptr(&self) -> &[StorageIdx] {
        &self.indptr
    }

    /// Column index of every stored entry
    pub fn indices(&self) -> &[StorageIdx] {
        &self.indices
    }

    /// Value of every stored entry
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Index range of the entries of `row` inside `indices` and `data`
    ///
    /// Empty for rows outside the matrix.
    pub fn row_range(&self, row: usize) -> core::ops::Range<usize> {
        if row >= self.nrows {
            return 0..0;
        }
        self.indptr[row] as usize..self.indptr[row + 1] as usize
    }

    /// `(col, value)` entries of one row in stored order
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let range = self.row_range(row);
        self.indices[range.clone()]
            .iter()
            .zip(&self.data[range])
            .map(|(&col, &value)| (col as usize, value))
    }

    /// Every `(row, col, value)` entry, row by row in stored order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        (0..self.nrows).flat_map(move |row| self.row(row).map(move |(col, value)| (row, col, value)))
    }

    /// Replace every value, keeping the sparsity structure
    ///
    /// Typical use resolves family ids into hopping energies.
    pub fn map_values<U: MatrixElement, F: FnMut(T) -> U>(self, f: F) -> CsrMatrix<U> {
        CsrMatrix {
            nrows: self.nrows,
            ncols: self.ncols,
            indptr: self.indptr,
            indices: self.indices,
            data: self.data.into_iter().map(f).collect(),
        }
    }

    /// Decompose into `(nrows, ncols, indptr, indices, data)`
    pub fn into_parts(self) -> (usize, usize, Vec<StorageIdx>, Vec<StorageIdx>, Vec<T>) {
        (self.nrows, self.ncols, self.indptr, self.indices, self.data)
    }
}

/// Structural checks shared by owned and memory-mapped matrices
pub fn validate_csr_structure(
    nrows: usize,
    ncols: usize,
    indptr: &[StorageIdx],
    indices: &[StorageIdx],
    data_len: usize,
) -> Result<()> {
    if indptr.len() != nrows + 1 || indices.len() != data_len {
        return Err(HoppingError::InvalidStructure);
    }
    if indptr[0] != 0 || indptr[nrows] as usize != indices.len() {
        return Err(HoppingError::InvalidStructure);
    }
    if indptr.windows(2).any(|pair| pair[0] > pair[1]) {
        return Err(HoppingError::InvalidStructure);
    }
    if indices.iter().any(|&col| col as usize >= ncols) {
        return Err(HoppingError::InvalidStructure);
    }
    Ok(())
}

impl<T: MatrixElement> SparseMatrix for CsrMatrix<T> {
    type Element = T;

    fn get_element(&self, row: usize, col: usize) -> Option<T> {
        self.row(row)
            .find(|&(stored_col, _)| stored_col == col)
            .map(|(_, value)| value)
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    fn nnz(&self) -> usize {
        self.indices.len()
    }
}

impl<T: MatrixElement> MatrixOperations for CsrMatrix<T> {
    fn get_row(&self, row_index: usize) -> Vec<(usize, T)> {
        self.row(row_index).collect()
    }

    fn get_col(&self, col_index: usize) -> Vec<(usize, T)> {
        self.iter()
            .filter(|&(_, col, _)| col == col_index)
            .map(|(row, _, value)| (row, value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn sample() -> CsrMatrix<u32> {
        // row 0: (2, 7), (0, 5); row 1: empty; row 2: (1, 9)
        CsrMatrix::from_parts(3, 3, vec![0, 2, 2, 3], vec![2, 0, 1], vec![7, 5, 9]).unwrap()
    }

    #[test]
    fn test_row_keeps_stored_order() {
        let m = sample();
        assert_eq!(m.get_row(0), vec![(2, 7), (0, 5)]);
        assert!(m.get_row(1).is_empty());
        assert!(m.get_row(10).is_empty());
        assert_eq!(m.get_col(1), vec![(2, 9)]);
    }

    #[test]
    fn test_get_element() {
        let m = sample();
        assert_eq!(m.get_element(0, 0), Some(5));
        assert_eq!(m.get_element(2, 1), Some(9));
        assert_eq!(m.get_element(1, 1), None);
        assert_eq!(m.get_element(5, 0), None);
        assert_eq!(m.dimensions(), (3, 3));
        assert_eq!(SparseMatrix::nnz(&m), 3);
    }

    #[test]
    fn test_map_values() {
        let energies = [-1.0f64, -0.5, 0.0, 0.0, 0.0, 0.25, 0.0, 0.75, 0.0, 2.0];
        let m = sample().map_values(|id| energies[id as usize]);
        assert_eq!(m.data(), &[0.75, 0.25, 2.0]);
        assert_eq!(m.indptr(), &[0, 2, 2, 3]);
    }

    #[test]
    fn test_from_parts_rejects_bad_structure() {
        let bad = [
            (vec![1, 2, 2, 3], vec![0, 0, 0]),
            (vec![0, 2, 1, 3], vec![0, 0, 0]),
            (vec![0, 2, 2, 2], vec![0, 0, 0]),
            (vec![0, 2, 2, 3], vec![0, 3, 0]),
            (vec![0, 2, 3], vec![0, 0, 0]),
        ];
        for (indptr, indices) in bad {
            assert_eq!(
                CsrMatrix::from_parts(3, 3, indptr, indices, vec![0u32; 3]),
                Err(HoppingError::InvalidStructure)
            );
        }
    }
}
