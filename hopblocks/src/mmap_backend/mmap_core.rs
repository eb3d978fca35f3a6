//! Memory-mapped compressed hopping matrix
//!
//! Zero-copy view over a CSR file written by
//! [`HoppingFile::write_csr`](super::HoppingFile::write_csr).

use std::{fs::File, marker::PhantomData, ops::Range, path::Path};

use bytemuck::Pod;
use hopblocks_core::{
    validate_csr_structure, CsrMatrix, HoppingFileHeader, MatrixElement, MatrixFormat,
    SparseMatrix, StorageIdx,
};
use memmap2::{Mmap, MmapOptions};

use crate::{Error, Result};

/// Fail on hosts whose native byte order differs from the file layout
pub(crate) fn ensure_little_endian() -> Result<()> {
    if cfg!(target_endian = "big") {
        return Err(Error::InvalidState("Hopping files require a little-endian host"));
    }
    Ok(())
}

/// Byte range of a header region as `usize`
///
/// Empty regions map to `0..0` whatever their recorded offset.
pub(crate) fn region_range(offset: u64, size: u64) -> Result<Range<usize>> {
    if size == 0 {
        return Ok(0..0);
    }
    let start = usize::try_from(offset).map_err(|_| Error::InvalidState("Region offset too large"))?;
    let len = usize::try_from(size).map_err(|_| Error::InvalidState("Region size too large"))?;
    Ok(start..start + len)
}

/// Map a whole file read-only and validate its header regions
pub(crate) fn map_file<P: AsRef<Path>>(path: P) -> Result<(Mmap, HoppingFileHeader)> {
    ensure_little_endian()?;
    let file = File::open(path).map_err(|_| Error::IoError("Failed to open file"))?;

    // SAFETY: read-only mapping; the file is not modified while mapped
    let mmap = unsafe {
        MmapOptions::new()
            .map(&file)
            .map_err(|_| Error::IoError("Failed to memory map file"))?
    };

    let header = HoppingFileHeader::from_bytes(&mmap)?;
    header.validate_regions(mmap.len())?;
    Ok((mmap, header))
}

/// Read-only CSR matrix backed by a memory-mapped file
///
/// Regions are validated once when the file is opened: alignment, bounds
/// and the CSR structure itself. Accessors borrow directly from the map.
pub struct MmapCsr<T> {
    mmap: Mmap,
    header: HoppingFileHeader,
    nrows: usize,
    ncols: usize,
    pointers: Range<usize>,
    indices: Range<usize>,
    values: Range<usize>,
    _phantom: PhantomData<T>,
}

impl<T: MatrixElement + Pod> MmapCsr<T> {
    /// Load a matrix from a CSR hopping file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let (mmap, header) = map_file(path)?;

        if header.format() != Some(MatrixFormat::Csr) {
            return Err(Error::InvalidState("File does not hold a CSR matrix"));
        }
        if header.data_type != T::data_type().to_u8() {
            return Err(Error::InvalidState("Element type does not match file data type"));
        }

        let matrix = Self {
            nrows: usize::try_from(header.nrows)
                .map_err(|_| Error::InvalidState("Row count too large"))?,
            ncols: usize::try_from(header.ncols)
                .map_err(|_| Error::InvalidState("Column count too large"))?,
            pointers: region_range(header.pointers_offset, header.pointers_size)?,
            indices: region_range(header.indices_offset, header.indices_size)?,
            values: region_range(header.values_offset, header.values_size)?,
            mmap,
            header,
            _phantom: PhantomData,
        };

        let indptr: &[StorageIdx] = bytemuck::try_cast_slice(&matrix.mmap[matrix.pointers.clone()])
            .map_err(|_| Error::InvalidState("Row pointers not properly aligned"))?;
        let indices: &[StorageIdx] = bytemuck::try_cast_slice(&matrix.mmap[matrix.indices.clone()])
            .map_err(|_| Error::InvalidState("Column indices not properly aligned"))?;
        let data: &[T] = bytemuck::try_cast_slice(&matrix.mmap[matrix.values.clone()])
            .map_err(|_| Error::InvalidState("Values not properly aligned"))?;
        validate_csr_structure(matrix.nrows, matrix.ncols, indptr, indices, data.len())?;

        log::debug!(
            "mapped {}x{} CSR hopping matrix with {} entries",
            matrix.nrows,
            matrix.ncols,
            indices.len()
        );
        Ok(matrix)
    }

    pub fn header(&self) -> &HoppingFileHeader {
        &self.header
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of hopping families recorded by the writer
    pub fn num_families(&self) -> u64 {
        self.header.num_families
    }

    // Casts below were checked by `from_file` and cannot fail afterwards

    pub fn indptr(&self) -> &[StorageIdx] {
        bytemuck::cast_slice(&self.mmap[self.pointers.clone()])
    }

    pub fn indices(&self) -> &[StorageIdx] {
        bytemuck::cast_slice(&self.mmap[self.indices.clone()])
    }

    pub fn data(&self) -> &[T] {
        bytemuck::cast_slice(&self.mmap[self.values.clone()])
    }

    /// `(col, value)` entries of one row in stored order
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let range = if row < self.nrows {
            let indptr = self.indptr();
            indptr[row] as usize..indptr[row + 1] as usize
        } else {
            0..0
        };
        self.indices()[range.clone()]
            .iter()
            .zip(&self.data()[range])
            .map(|(&col, &value)| (col as usize, value))
    }

    /// Copy the mapped arrays into an owned matrix
    pub fn to_owned_csr(&self) -> Result<CsrMatrix<T>> {
        Ok(CsrMatrix::from_parts(
            self.nrows,
            self.ncols,
            self.indptr().to_vec(),
            self.indices().to_vec(),
            self.data().to_vec(),
        )?)
    }
}

impl<T: MatrixElement + Pod> SparseMatrix for MmapCsr<T> {
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
        self.indices().len()
    }
}
