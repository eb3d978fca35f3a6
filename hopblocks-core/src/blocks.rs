//! Hopping coordinates arranged in per-family blocks
//!
//! Each block is a COO sparse matrix whose data array would hold the same
//! value everywhere: the index of the block, i.e. the hopping family id.
//!
//! ```text
//!         block 0                 block 1                 block 2
//!     row | col | data        row | col | data        row | col | data
//!     ----------------        ----------------        ----------------
//!      0  |  1  |  0           0  |  4  |  1           1  |  3  |  2
//!      0  |  4  |  0           2  |  3  |  1           4  |  4  |  2
//!      1  |  2  |  0           2  |  0  |  1           7  |  9  |  2
//! ```
//!
//! The data array is never stored. It is reconstructed from the block
//! position when the blocks are converted with [`HoppingBlocks::to_csr`]
//! or [`HoppingBlocks::to_coo`].

use alloc::vec::Vec;

use hashbrown::HashSet;

use crate::csr::CsrMatrix;
use crate::validation::{
    validate_family, validate_parallel_lengths, validate_site, validate_storage_count,
};
use crate::{Coo, HoppingError, Result, StorageIdx};

/// Coordinates of a single hopping family
pub type Block = Vec<Coo>;

/// Per-family coordinate store for a `num_sites x num_sites` matrix
///
/// The number of blocks is fixed at construction. Every write is scoped
/// to one family id and checked against the store's bounds; rejected
/// writes leave the store untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawHoppingBlocks"))]
pub struct HoppingBlocks {
    num_sites: usize,
    blocks: Vec<Block>,
}

/// Unchecked serde form, validated through [`HoppingBlocks::from_blocks`]
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawHoppingBlocks {
    num_sites: usize,
    blocks: Vec<Block>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawHoppingBlocks> for HoppingBlocks {
    type Error = HoppingError;

    fn try_from(raw: RawHoppingBlocks) -> Result<Self> {
        Self::from_blocks(raw.num_sites, raw.blocks)
    }
}

impl HoppingBlocks {
    /// Empty store with `num_families` empty blocks
    pub fn new(num_sites: usize, num_families: usize) -> Self {
        let mut blocks = Vec::with_capacity(num_families);
        blocks.resize_with(num_families, Block::new);
        Self { num_sites, blocks }
    }

    /// Wrap existing per-family blocks
    ///
    /// Every stored pair must lie inside a `num_sites` square matrix.
    pub fn from_blocks(num_sites: usize, blocks: Vec<Block>) -> Result<Self> {
        for coo in blocks.iter().flatten() {
            validate_site(coo.row(), num_sites)?;
            validate_site(coo.col(), num_sites)?;
        }
        Ok(Self { num_sites, blocks })
    }

    pub fn num_sites(&self) -> usize {
        self.num_sites
    }

    pub fn num_families(&self) -> usize {
        self.blocks.len()
    }

    /// All blocks, indexed by family id
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Coordinates of one family, `None` for an unknown id
    pub fn block(&self, family_id: usize) -> Option<&[Coo]> {
        self.blocks.get(family_id).map(Vec::as_slice)
    }

    /// Number of non-zeros in the COO matrix, i.e. the total number of hoppings
    pub fn nnz(&self) -> usize {
        self.blocks.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(Vec::is_empty)
    }

    /// Current length of every block
    ///
    /// Suitable as the argument of [`reserve`](Self::reserve) for a store
    /// built from the same lattice.
    pub fn family_counts(&self) -> Vec<usize> {
        self.blocks.iter().map(Vec::len).collect()
    }

    /// Reserve space for the given number of hoppings per family
    ///
    /// Only capacity changes; stored content and [`nnz`](Self::nnz) do not.
    pub fn reserve(&mut self, counts: &[usize]) -> Result<()> {
        validate_parallel_lengths(counts.len(), self.blocks.len())?;
        for (block, &count) in self.blocks.iter_mut().zip(counts) {
            block
                .try_reserve(count)
                .map_err(|_| HoppingError::AllocationFailed)?;
        }
        log::trace!(
            "reserved {} hoppings over {} families",
            counts.iter().sum::<usize>(),
            counts.len()
        );
        Ok(())
    }

    /// Add a single coordinate pair to the given family block
    pub fn add(&mut self, family_id: usize, row: usize, col: usize) -> Result<()> {
        validate_family(family_id, self.blocks.len())?;
        validate_site(row, self.num_sites)?;
        validate_site(col, self.num_sites)?;
        self.blocks[family_id].push(Coo::new(row, col));
        Ok(())
    }

    /// Append a range of coordinates to the given family block
    ///
    /// `rows` and `cols` are parallel sequences; pair `i` is
    /// `(rows[i], cols[i])`. The whole batch is validated before anything
    /// is written and the block grows with a single reservation.
    pub fn append(&mut self, family_id: usize, rows: &[usize], cols: &[usize]) -> Result<()> {
        validate_family(family_id, self.blocks.len())?;
        validate_parallel_lengths(rows.len(), cols.len())?;
        for (&row, &col) in rows.iter().zip(cols) {
            validate_site(row, self.num_sites)?;
            validate_site(col, self.num_sites)?;
        }

        let block = &mut self.blocks[family_id];
        block
            .try_reserve(rows.len())
            .map_err(|_| HoppingError::AllocationFailed)?;
        block.extend(rows.iter().zip(cols).map(|(&row, &col)| Coo::new(row, col)));
        Ok(())
    }

    /// Move every block of `other` onto the end of the same family's block
    ///
    /// Both stores must have the same shape. Merging stores that were
    /// filled with disjoint family ids gives the same blocks as filling
    /// one store sequentially.
    pub fn merge(&mut self, other: HoppingBlocks) -> Result<()> {
        if other.num_sites != self.num_sites || other.blocks.len() != self.blocks.len() {
            return Err(HoppingError::ShapeMismatch);
        }
        for (block, mut incoming) in self.blocks.iter_mut().zip(other.blocks) {
            if block.is_empty() {
                *block = incoming;
            } else {
                block
                    .try_reserve(incoming.len())
                    .map_err(|_| HoppingError::AllocationFailed)?;
                block.append(&mut incoming);
            }
        }
        Ok(())
    }

    /// Read-only view of every family in increasing id order
    ///
    /// Yields exactly [`num_families`](Self::num_families) items, empty
    /// blocks included.
    pub fn iter(&self) -> Families<'_> {
        Families {
            inner: self.blocks.iter().enumerate(),
        }
    }

    /// Number of entries whose `(row, col)` pair already occurred earlier
    /// in family-then-insertion order
    ///
    /// Repeated pairs are kept as distinct entries by every operation;
    /// this only reports how many there are.
    pub fn duplicate_count(&self) -> usize {
        let mut seen = HashSet::with_capacity(self.nnz());
        self.blocks
            .iter()
            .flatten()
            .filter(|&&coo| !seen.insert(coo))
            .count()
    }

    /// Return the full COO triplets `(rows, cols, data)`
    ///
    /// Blocks are concatenated in family order and the implicit data
    /// array is materialised with the family ids.
    pub fn to_coo(&self) -> Result<(Vec<StorageIdx>, Vec<StorageIdx>, Vec<StorageIdx>)> {
        let nnz = self.nnz();
        validate_storage_count(self.blocks.len())?;
        let mut rows = try_with_capacity(nnz)?;
        let mut cols = try_with_capacity(nnz)?;
        let mut data = try_with_capacity(nnz)?;

        for (family_id, block) in self.blocks.iter().enumerate() {
            for coo in block {
                rows.push(coo.row);
                cols.push(coo.col);
                data.push(family_id as StorageIdx);
            }
        }
        Ok((rows, cols, data))
    }

    /// Return the matrix in the CSR sparse matrix format
    ///
    /// Two passes over the blocks: a per-row histogram turned into row
    /// pointers by a prefix sum, then a scatter through per-row cursors.
    /// Within a row, entries are grouped by increasing family id and keep
    /// insertion order inside a family. Columns are not sorted and
    /// repeated pairs are not merged.
    pub fn to_csr(&self) -> Result<CsrMatrix<StorageIdx>> {
        let nnz = self.nnz();
        validate_storage_count(nnz)?;
        validate_storage_count(self.blocks.len())?;
        log::debug!(
            "converting {} hoppings in {} families to CSR ({} sites)",
            nnz,
            self.blocks.len(),
            self.num_sites
        );

        let pointer_count = self
            .num_sites
            .checked_add(1)
            .ok_or(HoppingError::ArraySizeOverflow)?;
        let mut indptr = try_zeroed::<StorageIdx>(pointer_count)?;
        for coo in self.blocks.iter().flatten() {
            indptr[coo.row() + 1] += 1;
        }
        for row in 0..self.num_sites {
            indptr[row + 1] += indptr[row];
        }

        let mut cursor = try_with_capacity(self.num_sites)?;
        cursor.extend_from_slice(&indptr[..self.num_sites]);
        let mut indices = try_zeroed::<StorageIdx>(nnz)?;
        let mut data = try_zeroed::<StorageIdx>(nnz)?;

        for (family_id, block) in self.blocks.iter().enumerate() {
            for coo in block {
                let slot = &mut cursor[coo.row()];
                indices[*slot as usize] = coo.col;
                data[*slot as usize] = family_id as StorageIdx;
                *slot += 1;
            }
        }

        Ok(CsrMatrix::from_parts_unchecked(
            self.num_sites,
            self.num_sites,
            indptr,
            indices,
            data,
        ))
    }
}

fn try_with_capacity<T>(len: usize) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| HoppingError::AllocationFailed)?;
    Ok(buffer)
}

fn try_zeroed<T: Copy + Default>(len: usize) -> Result<Vec<T>> {
    let mut buffer = try_with_capacity(len)?;
    buffer.resize(len, T::default());
    Ok(buffer)
}

/// One family of a [`HoppingBlocks`] store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyBlock<'a> {
    family_id: usize,
    coordinates: &'a [Coo],
}

impl<'a> FamilyBlock<'a> {
    pub fn family_id(&self) -> usize {
        self.family_id
    }

    /// Coordinate pairs in insertion order
    pub fn coordinates(&self) -> &'a [Coo] {
        self.coordinates
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

/// Iterator over the families of a [`HoppingBlocks`] store
#[derive(Debug, Clone)]
pub struct Families<'a> {
    inner: core::iter::Enumerate<core::slice::Iter<'a, Block>>,
}

impl<'a> Iterator for Families<'a> {
    type Item = FamilyBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(family_id, block)| FamilyBlock {
            family_id,
            coordinates: block.as_slice(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Families<'_> {}

impl core::iter::FusedIterator for Families<'_> {}

impl<'a> IntoIterator for &'a HoppingBlocks {
    type Item = FamilyBlock<'a>;
    type IntoIter = Families<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
