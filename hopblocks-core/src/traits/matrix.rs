//! Read access traits for compressed hopping matrices

use alloc::vec::Vec;

use super::element::MatrixElement;

/// Core sparse matrix trait for format-agnostic access
///
/// Implemented by owned matrices and by memory-mapped views.
pub trait SparseMatrix {
    /// The element type stored in this matrix
    type Element: MatrixElement;

    /// Get the value stored at a position
    ///
    /// Returns `None` if nothing is stored there or the position is out
    /// of bounds. With repeated entries the first stored one wins.
    fn get_element(&self, row: usize, col: usize) -> Option<Self::Element>;

    /// Get matrix dimensions as (rows, cols)
    fn dimensions(&self) -> (usize, usize);

    /// Get number of stored entries
    fn nnz(&self) -> usize;
}

/// Row and column extraction
pub trait MatrixOperations: SparseMatrix {
    /// All `(col, value)` entries of a row, in stored order
    fn get_row(&self, row_index: usize) -> Vec<(usize, Self::Element)>;

    /// All `(row, value)` entries of a column, in row order
    fn get_col(&self, col_index: usize) -> Vec<(usize, Self::Element)>;
}
