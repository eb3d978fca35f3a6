//! Trait abstractions over compressed hopping matrices

pub mod element;
pub mod matrix;

pub use element::MatrixElement;
pub use matrix::{MatrixOperations, SparseMatrix};
