//! Reading and writing hopping files
//!
//! Layout: header, then each non-empty region padded to an 8-byte
//! boundary. Arrays are written in native order, which the readers
//! require to be little-endian.

use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use bytemuck::Pod;
use hopblocks_core::{
    format::constants::{ALIGNMENT_BOUNDARY, FAMILY_ID_VALUES},
    validation::align_to_boundary,
    Block, Coo, CsrMatrix, DataType, HoppingBlocks, HoppingError, HoppingFileHeader,
    MatrixElement, MatrixFormat,
};

use super::mmap_core::{ensure_little_endian, map_file, region_range};
use crate::{Error, Result};

/// Offsets of the three array regions following the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileLayout {
    pointers_offset: u64,
    pointers_size: u64,
    indices_offset: u64,
    indices_size: u64,
    values_offset: u64,
    values_size: u64,
}

impl FileLayout {
    fn calculate(pointers_size: usize, indices_size: usize, values_size: usize) -> Result<Self> {
        let place = |start: usize, size: usize| -> Result<(usize, usize)> {
            let offset = align_to_boundary(start, ALIGNMENT_BOUNDARY);
            let end = offset
                .checked_add(size)
                .ok_or(Error::Hopping(HoppingError::ArraySizeOverflow))?;
            Ok((offset, end))
        };

        let (pointers_offset, end) = place(HoppingFileHeader::SIZE, pointers_size)?;
        let (indices_offset, end) = place(end, indices_size)?;
        let (values_offset, _) = place(end, values_size)?;

        Ok(Self {
            pointers_offset: pointers_offset as u64,
            pointers_size: pointers_size as u64,
            indices_offset: indices_offset as u64,
            indices_size: indices_size as u64,
            values_offset: values_offset as u64,
            values_size: values_size as u64,
        })
    }

    fn apply(&self, header: &mut HoppingFileHeader) {
        header.pointers_offset = self.pointers_offset;
        header.pointers_size = self.pointers_size;
        header.indices_offset = self.indices_offset;
        header.indices_size = self.indices_size;
        header.values_offset = self.values_offset;
        header.values_size = self.values_size;
    }
}

/// Header plus region payloads, written in order with alignment padding
fn write_regions(path: &Path, header: &HoppingFileHeader, regions: [&[u8]; 3]) -> Result<()> {
    let file = File::create(path).map_err(|_| Error::IoError("Failed to create file"))?;
    let mut writer = BufWriter::new(file);

    let header_bytes = header.to_bytes();
    writer
        .write_all(&header_bytes)
        .map_err(|_| Error::IoError("Failed to write header"))?;
    let mut position = header_bytes.len() as u64;

    for ((offset, _), payload) in header.regions().into_iter().zip(regions) {
        if payload.is_empty() {
            continue;
        }
        if offset > position {
            let padding = vec![0u8; (offset - position) as usize];
            writer
                .write_all(&padding)
                .map_err(|_| Error::IoError("Failed to write padding"))?;
        }
        writer
            .write_all(payload)
            .map_err(|_| Error::IoError("Failed to write array region"))?;
        position = offset + payload.len() as u64;
    }

    writer
        .flush()
        .map_err(|_| Error::IoError("Failed to flush file"))?;
    log::debug!("wrote {} bytes to {}", position, path.display());
    Ok(())
}

/// File handle for hopping files
#[derive(Debug, Clone)]
pub struct HoppingFile {
    pub header: HoppingFileHeader,
    pub path: PathBuf,
}

impl HoppingFile {
    /// Open an existing file and read its header
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut file = File::open(&path).map_err(|_| Error::IoError("Failed to open file"))?;
        let mut header_bytes = [0u8; HoppingFileHeader::SIZE];
        file.read_exact(&mut header_bytes)
            .map_err(|_| Error::IoError("Failed to read header"))?;

        let header = HoppingFileHeader::from_bytes(&header_bytes)?;
        Ok(Self { header, path })
    }

    pub fn format(&self) -> Option<MatrixFormat> {
        self.header.format()
    }

    pub fn data_type(&self) -> Option<DataType> {
        DataType::from_u8(self.header.data_type)
    }

    /// Write a compressed matrix of any element type
    pub fn write_csr<T: MatrixElement + Pod, P: AsRef<Path>>(
        matrix: &CsrMatrix<T>,
        path: P,
    ) -> Result<()> {
        Self::write_csr_with(matrix, HoppingFileHeader::new(MatrixFormat::Csr), path.as_ref())
    }

    /// Convert a store and write the resulting family-id matrix
    ///
    /// The header records the family count and flags the values as
    /// family ids.
    pub fn write_hopping_matrix<P: AsRef<Path>>(blocks: &HoppingBlocks, path: P) -> Result<()> {
        let matrix = blocks.to_csr()?;
        let mut header = HoppingFileHeader::new(MatrixFormat::Csr);
        header.structure_flags |= FAMILY_ID_VALUES;
        header.num_families = blocks.num_families() as u64;
        Self::write_csr_with(&matrix, header, path.as_ref())
    }

    fn write_csr_with<T: MatrixElement + Pod>(
        matrix: &CsrMatrix<T>,
        mut header: HoppingFileHeader,
        path: &Path,
    ) -> Result<()> {
        ensure_little_endian()?;
        let indptr: &[u8] = bytemuck::cast_slice(matrix.indptr());
        let indices: &[u8] = bytemuck::cast_slice(matrix.indices());
        let data: &[u8] = bytemuck::cast_slice(matrix.data());
        let layout = FileLayout::calculate(indptr.len(), indices.len(), data.len())?;

        header.data_type = T::data_type().to_u8();
        header.nrows = matrix.nrows() as u64;
        header.ncols = matrix.ncols() as u64;
        header.nnz = matrix.nnz() as u64;
        layout.apply(&mut header);

        write_regions(path, &header, [indptr, indices, data])
    }

    /// Write the per-family blocks themselves
    ///
    /// The pointer region holds `num_families + 1` family offsets into the
    /// coordinate region.
    pub fn write_blocks<P: AsRef<Path>>(blocks: &HoppingBlocks, path: P) -> Result<()> {
        ensure_little_endian()?;
        let mut offsets = Vec::with_capacity(blocks.num_families() + 1);
        offsets.push(0u64);
        let mut coordinates: Vec<Coo> = Vec::new();
        coordinates
            .try_reserve_exact(blocks.nnz())
            .map_err(|_| Error::Hopping(HoppingError::AllocationFailed))?;
        for family in blocks {
            coordinates.extend_from_slice(family.coordinates());
            offsets.push(coordinates.len() as u64);
        }

        let pointers: &[u8] = bytemuck::cast_slice(&offsets);
        let indices: &[u8] = bytemuck::cast_slice(&coordinates);
        let layout = FileLayout::calculate(pointers.len(), indices.len(), 0)?;

        let mut header = HoppingFileHeader::new(MatrixFormat::Blocks);
        header.nrows = blocks.num_sites() as u64;
        header.ncols = blocks.num_sites() as u64;
        header.nnz = coordinates.len() as u64;
        header.num_families = blocks.num_families() as u64;
        layout.apply(&mut header);

        write_regions(path.as_ref(), &header, [pointers, indices, &[]])
    }

    /// Read a store written by [`write_blocks`](Self::write_blocks)
    pub fn read_blocks<P: AsRef<Path>>(path: P) -> Result<HoppingBlocks> {
        let (mmap, header) = map_file(path)?;
        if header.format() != Some(MatrixFormat::Blocks) {
            return Err(Error::InvalidState("File does not hold hopping blocks"));
        }

        let offsets: &[u64] = bytemuck::try_cast_slice(
            &mmap[region_range(header.pointers_offset, header.pointers_size)?],
        )
        .map_err(|_| Error::InvalidState("Family offsets not properly aligned"))?;
        let coordinates: &[Coo] = bytemuck::try_cast_slice(
            &mmap[region_range(header.indices_offset, header.indices_size)?],
        )
        .map_err(|_| Error::InvalidState("Coordinates not properly aligned"))?;

        if offsets.first() != Some(&0)
            || offsets.last().copied() != Some(coordinates.len() as u64)
            || offsets.windows(2).any(|pair| pair[0] > pair[1])
        {
            return Err(Error::Hopping(HoppingError::CorruptedData));
        }

        let blocks: Vec<Block> = offsets
            .windows(2)
            .map(|pair| coordinates[pair[0] as usize..pair[1] as usize].to_vec())
            .collect();
        let num_sites =
            usize::try_from(header.nrows).map_err(|_| Error::InvalidState("Site count too large"))?;

        log::debug!(
            "read {} hoppings in {} families",
            coordinates.len(),
            blocks.len()
        );
        Ok(HoppingBlocks::from_blocks(num_sites, blocks)?)
    }
}
