#![no_std]

//! hopblocks core - per-family hopping coordinate blocks
//!
//! Couplings between lattice sites are accumulated per hopping family in
//! a [`HoppingBlocks`] store and converted in linear time into a
//! [`CsrMatrix`] whose values are the family ids.
//!
//! ```
//! use hopblocks_core::HoppingBlocks;
//!
//! let mut blocks = HoppingBlocks::new(10, 3);
//! blocks.add(0, 0, 1)?;
//! blocks.add(0, 0, 4)?;
//! blocks.add(1, 2, 3)?;
//! blocks.add(2, 1, 3)?;
//!
//! let csr = blocks.to_csr()?;
//! assert_eq!(csr.indptr(), &[0, 2, 3, 4, 4, 4, 4, 4, 4, 4, 4]);
//! assert_eq!(csr.data(), &[0, 0, 2, 1]);
//! # Ok::<(), hopblocks_core::HoppingError>(())
//! ```

extern crate alloc;

pub mod blocks;
pub mod coo;
pub mod csr;
pub mod error;
pub mod format;
pub mod traits;
pub mod triplet;
pub mod validation;

pub use blocks::{Block, Families, FamilyBlock, HoppingBlocks};
pub use coo::{Coo, StorageIdx};
pub use csr::{validate_csr_structure, CsrMatrix};
pub use error::*;
pub use format::*;
pub use traits::*;
pub use triplet::{parse_triplet, Triplet};
pub use validation::{validate_array_bounds, validate_family, validate_site};
