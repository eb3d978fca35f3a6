//! hopblocks - hopping block assembly for lattice models
//!
//! Builds the sparse coupling matrix of a lattice model from per-family
//! hopping coordinates, with persistence and parallel construction on top
//! of the core store.
//!
//! ## Architecture
//!
//! - **hopblocks-core**: the coordinate block store, the CSR conversion,
//!   traits, the file header and pure validation (no I/O, `no_std`)
//! - **hopblocks**: memory-mapped files, text triplets and rayon-based
//!   parallel construction
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hopblocks::{HoppingBlocks, HoppingFile, MmapCsr, SparseMatrix};
//!
//! fn example() -> hopblocks::Result<()> {
//!     // A periodic ring of 100 sites with one nearest-neighbour family
//!     let mut blocks = HoppingBlocks::new(100, 1);
//!     let rows: Vec<usize> = (0..100).collect();
//!     let cols: Vec<usize> = (0..100).map(|i| (i + 1) % 100).collect();
//!     blocks.append(0, &rows, &cols)?;
//!
//!     let csr = blocks.to_csr()?;
//!     HoppingFile::write_csr(&csr, "ring.hopb")?;
//!
//!     let mapped = MmapCsr::<u32>::from_file("ring.hopb")?;
//!     assert_eq!(mapped.get_element(99, 0), Some(0));
//!     Ok(())
//! }
//! ```

pub use hopblocks_core::{
    // Store and conversion
    Block, Coo, CsrMatrix, Families, FamilyBlock, HoppingBlocks, StorageIdx,
    // Traits
    MatrixElement, MatrixOperations, SparseMatrix,
    // Format definitions
    DataType, HoppingFileHeader, MatrixFormat,
    // Core errors
    ErrorCategory, HoppingError,
};

pub mod error;
#[cfg(feature = "mmap")]
pub mod mmap_backend;
pub mod parallel;
pub mod triplets;

pub use error::{Error, Result};
#[cfg(feature = "mmap")]
pub use mmap_backend::{HoppingFile, MmapCsr};
pub use parallel::{build_parallel, ParallelConfig};
pub use triplets::{read_triplets, write_triplets};
