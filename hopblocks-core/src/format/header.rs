//! Hopping file header
//!
//! A file starts with a fixed 128-byte little-endian header followed by
//! up to three 8-byte aligned array regions:
//!
//! | format   | pointers                         | indices          | values        |
//! |----------|----------------------------------|------------------|---------------|
//! | `Csr`    | row pointers (`u32`, nrows + 1)  | columns (`u32`)  | family ids    |
//! | `Blocks` | family offsets (`u64`, nfam + 1) | `Coo` pairs      | unused        |

use alloc::vec::Vec;

use super::constants::{ALIGNMENT_BOUNDARY, HEADER_SIZE, MAGIC, VERSION};
use crate::validation::{validate_offset_alignment, validate_region};
use crate::{Coo, HoppingError, Result, StorageIdx};

/// Header describing the array regions of a hopping file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoppingFileHeader {
    /// Magic bytes: "HOPB"
    pub magic: [u8; 4],
    pub version: u8,
    /// [`MatrixFormat`] tag
    pub format_type: u8,
    /// [`DataType`] tag of the values region
    pub data_type: u8,
    /// Structure flags, see `constants`
    pub structure_flags: u8,
    pub nrows: u64,
    pub ncols: u64,
    pub nnz: u64,
    pub num_families: u64,
    pub pointers_offset: u64,
    pub pointers_size: u64,
    pub indices_offset: u64,
    pub indices_size: u64,
    pub values_offset: u64,
    pub values_size: u64,
    pub reserved: [u8; 40],
}

impl HoppingFileHeader {
    pub const MAGIC: [u8; 4] = MAGIC;
    pub const VERSION: u8 = VERSION;
    pub const SIZE: usize = HEADER_SIZE;

    /// Create a header with all regions empty
    pub const fn new(format: MatrixFormat) -> Self {
        Self {
            magic: Self::MAGIC,
            version: Self::VERSION,
            format_type: format as u8,
            data_type: DataType::U32 as u8,
            structure_flags: 0,
            nrows: 0,
            ncols: 0,
            nnz: 0,
            num_families: 0,
            pointers_offset: 0,
            pointers_size: 0,
            indices_offset: 0,
            indices_size: 0,
            values_offset: 0,
            values_size: 0,
            reserved: [0; 40],
        }
    }

    pub fn format(&self) -> Option<MatrixFormat> {
        MatrixFormat::from_u8(self.format_type)
    }

    pub fn is_valid(&self) -> bool {
        self.magic == Self::MAGIC && self.version <= Self::VERSION
    }

    /// Parse a header from the start of `bytes`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(HoppingError::InvalidHeader);
        }
        if bytes[0..4] != Self::MAGIC {
            return Err(HoppingError::InvalidHeader);
        }
        if bytes[4] > Self::VERSION {
            return Err(HoppingError::UnsupportedFormat);
        }

        let word = |offset: usize| {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(&bytes[offset..offset + 8]);
            u64::from_le_bytes(raw)
        };

        let mut reserved = [0u8; 40];
        reserved.copy_from_slice(&bytes[88..128]);

        Ok(Self {
            magic: Self::MAGIC,
            version: bytes[4],
            format_type: bytes[5],
            data_type: bytes[6],
            structure_flags: bytes[7],
            nrows: word(8),
            ncols: word(16),
            nnz: word(24),
            num_families: word(32),
            pointers_offset: word(40),
            pointers_size: word(48),
            indices_offset: word(56),
            indices_size: word(64),
            values_offset: word(72),
            values_size: word(80),
            reserved,
        })
    }

    /// Serialize to the fixed little-endian layout
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::SIZE);

        bytes.extend_from_slice(&self.magic);
        bytes.push(self.version);
        bytes.push(self.format_type);
        bytes.push(self.data_type);
        bytes.push(self.structure_flags);

        for word in [
            self.nrows,
            self.ncols,
            self.nnz,
            self.num_families,
            self.pointers_offset,
            self.pointers_size,
            self.indices_offset,
            self.indices_size,
            self.values_offset,
            self.values_size,
        ] {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        bytes.extend_from_slice(&self.reserved);

        bytes
    }

    /// Check every region against a file of `file_len` bytes
    ///
    /// Region sizes must match the counts in the header for its format,
    /// and every region must be aligned and inside the file.
    pub fn validate_regions(&self, file_len: usize) -> Result<()> {
        if !self.is_valid() {
            return Err(HoppingError::InvalidHeader);
        }
        let format = self.format().ok_or(HoppingError::UnsupportedFormat)?;

        let (pointer_size, index_size, value_size) = match format {
            MatrixFormat::Csr => {
                let data_type =
                    DataType::from_u8(self.data_type).ok_or(HoppingError::UnsupportedFormat)?;
                (
                    core::mem::size_of::<StorageIdx>() as u64,
                    core::mem::size_of::<StorageIdx>() as u64,
                    data_type.size_bytes() as u64,
                )
            }
            MatrixFormat::Blocks => (
                core::mem::size_of::<u64>() as u64,
                core::mem::size_of::<Coo>() as u64,
                0,
            ),
        };
        let pointer_count = match format {
            MatrixFormat::Csr => self.nrows,
            MatrixFormat::Blocks => self.num_families,
        }
        .checked_add(1)
        .ok_or(HoppingError::ArraySizeOverflow)?;

        let expect = |count: u64, width: u64, actual: u64| -> Result<()> {
            let size = count
                .checked_mul(width)
                .ok_or(HoppingError::ArraySizeOverflow)?;
            if size != actual {
                return Err(HoppingError::CorruptedData);
            }
            Ok(())
        };
        expect(pointer_count, pointer_size, self.pointers_size)?;
        expect(self.nnz, index_size, self.indices_size)?;
        expect(self.nnz, value_size, self.values_size)?;

        for (offset, size) in self.regions() {
            let offset = usize::try_from(offset).map_err(|_| HoppingError::ArraySizeOverflow)?;
            let size = usize::try_from(size).map_err(|_| HoppingError::ArraySizeOverflow)?;
            if size == 0 {
                continue;
            }
            if offset < Self::SIZE {
                return Err(HoppingError::CorruptedData);
            }
            validate_offset_alignment(offset, ALIGNMENT_BOUNDARY)?;
            validate_region(offset, size, file_len)?;
        }
        Ok(())
    }

    /// `(offset, size)` of the pointers, indices and values regions
    pub const fn regions(&self) -> [(u64, u64); 3] {
        [
            (self.pointers_offset, self.pointers_size),
            (self.indices_offset, self.indices_size),
            (self.values_offset, self.values_size),
        ]
    }
}

impl Default for HoppingFileHeader {
    fn default() -> Self {
        Self::new(MatrixFormat::Csr)
    }
}

/// Layout of the arrays following the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MatrixFormat {
    /// Per-family coordinate blocks
    Blocks = 0,
    /// Compressed sparse row matrix
    Csr = 1,
}

impl MatrixFormat {
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(MatrixFormat::Blocks),
            1 => Some(MatrixFormat::Csr),
            _ => None,
        }
    }

    pub const fn to_u8(self) -> u8 {
        self as u8
    }
}

impl core::fmt::Display for MatrixFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MatrixFormat::Blocks => write!(f, "BLOCKS"),
            MatrixFormat::Csr => write!(f, "CSR"),
        }
    }
}

/// Value types a persisted matrix can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DataType {
    F32 = 0,
    F64 = 1,
    I32 = 2,
    I64 = 3,
    U32 = 4,
    U64 = 5,
}

impl DataType {
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(DataType::F32),
            1 => Some(DataType::F64),
            2 => Some(DataType::I32),
            3 => Some(DataType::I64),
            4 => Some(DataType::U32),
            5 => Some(DataType::U64),
            _ => None,
        }
    }

    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Size in bytes of one element
    pub const fn size_bytes(self) -> usize {
        match self {
            DataType::F32 | DataType::I32 | DataType::U32 => 4,
            DataType::F64 | DataType::I64 | DataType::U64 => 8,
        }
    }
}

impl core::fmt::Display for DataType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DataType::F32 => write!(f, "f32"),
            DataType::F64 => write!(f, "f64"),
            DataType::I32 => write!(f, "i32"),
            DataType::I64 => write!(f, "i64"),
            DataType::U32 => write!(f, "u32"),
            DataType::U64 => write!(f, "u64"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csr_header() -> HoppingFileHeader {
        // 3x3 matrix with 2 entries
        let mut header = HoppingFileHeader::new(MatrixFormat::Csr);
        header.nrows = 3;
        header.ncols = 3;
        header.nnz = 2;
        header.num_families = 1;
        header.pointers_offset = 128;
        header.pointers_size = 16;
        header.indices_offset = 144;
        header.indices_size = 8;
        header.values_offset = 152;
        header.values_size = 8;
        header
    }

    #[test]
    fn test_header_size() {
        assert_eq!(csr_header().to_bytes().len(), HoppingFileHeader::SIZE);
    }

    #[test]
    fn test_from_bytes_preserves_fields() {
        let header = csr_header();
        let parsed = HoppingFileHeader::from_bytes(&header.to_bytes()).unwrap();
        assert_eq!(parsed, header);
        assert_eq!(parsed.format(), Some(MatrixFormat::Csr));
    }

    #[test]
    fn test_rejects_bad_magic_and_version() {
        let mut bytes = csr_header().to_bytes();
        bytes[0] = b'X';
        assert_eq!(
            HoppingFileHeader::from_bytes(&bytes),
            Err(HoppingError::InvalidHeader)
        );

        let mut bytes = csr_header().to_bytes();
        bytes[4] = VERSION + 1;
        assert_eq!(
            HoppingFileHeader::from_bytes(&bytes),
            Err(HoppingError::UnsupportedFormat)
        );

        assert_eq!(
            HoppingFileHeader::from_bytes(&bytes[..64]),
            Err(HoppingError::InvalidHeader)
        );
    }

    #[test]
    fn test_validate_regions() {
        let header = csr_header();
        assert_eq!(header.validate_regions(160), Ok(()));
        assert_eq!(
            header.validate_regions(159),
            Err(HoppingError::CorruptedData)
        );

        let mut misaligned = header;
        misaligned.values_offset = 150;
        assert_eq!(
            misaligned.validate_regions(200),
            Err(HoppingError::ArrayAlignment)
        );

        let mut wrong_size = header;
        wrong_size.indices_size = 12;
        assert_eq!(
            wrong_size.validate_regions(200),
            Err(HoppingError::CorruptedData)
        );
    }
}
