//! Memory-mapped file backend for hopping matrices
//!
//! Writes compressed matrices and raw per-family blocks to disk and maps
//! them back without copying.

mod file_io;
mod mmap_core;

pub use file_io::HoppingFile;
pub use mmap_core::MmapCsr;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use hopblocks_core::{
        format::constants::FAMILY_ID_VALUES, HoppingBlocks, HoppingError, MatrixFormat,
        SparseMatrix,
    };
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("hopblocks-{}-{}.hopb", std::process::id(), name))
    }

    fn scenario() -> HoppingBlocks {
        let mut blocks = HoppingBlocks::new(10, 3);
        blocks.add(0, 0, 1).unwrap();
        blocks.add(0, 0, 4).unwrap();
        blocks.add(1, 2, 3).unwrap();
        blocks.add(2, 1, 3).unwrap();
        blocks
    }

    #[test]
    fn test_hopping_matrix_file() {
        let path = temp_path("matrix");
        let blocks = scenario();
        HoppingFile::write_hopping_matrix(&blocks, &path).unwrap();

        let file = HoppingFile::open(&path).unwrap();
        assert_eq!(file.format(), Some(MatrixFormat::Csr));
        assert_eq!(file.header.num_families, 3);
        assert_eq!(file.header.structure_flags & FAMILY_ID_VALUES, FAMILY_ID_VALUES);

        let mapped = MmapCsr::<u32>::from_file(&path).unwrap();
        assert_eq!(mapped.indptr(), &[0, 2, 3, 4, 4, 4, 4, 4, 4, 4, 4]);
        assert_eq!(mapped.get_element(2, 3), Some(1));
        assert_eq!(mapped.get_element(1, 3), Some(2));
        assert_eq!(mapped.get_element(3, 3), None);
        assert_eq!(mapped.row(0).collect::<Vec<_>>(), vec![(1, 0), (4, 0)]);
        assert_eq!(mapped.to_owned_csr().unwrap(), blocks.to_csr().unwrap());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_energy_matrix_file() {
        let path = temp_path("energies");
        let energies = [-1.0f64, -0.5, 0.25];
        let matrix = scenario()
            .to_csr()
            .unwrap()
            .map_values(|id| energies[id as usize]);
        HoppingFile::write_csr(&matrix, &path).unwrap();

        let mapped = MmapCsr::<f64>::from_file(&path).unwrap();
        assert_eq!(mapped.data(), &[-1.0, -1.0, 0.25, -0.5]);
        assert_eq!(mapped.header().num_families, 0);

        match MmapCsr::<u32>::from_file(&path) {
            Err(Error::InvalidState(_)) => {}
            other => panic!("expected element type mismatch, got {:?}", other.err()),
        }

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_blocks_file() {
        let path = temp_path("blocks");
        let mut blocks = scenario();
        blocks.add(0, 0, 1).unwrap();
        HoppingFile::write_blocks(&blocks, &path).unwrap();

        let read = HoppingFile::read_blocks(&path).unwrap();
        assert_eq!(read, blocks);
        assert_eq!(read.duplicate_count(), 1);

        match MmapCsr::<u32>::from_file(&path) {
            Err(Error::InvalidState(_)) => {}
            other => panic!("expected format mismatch, got {:?}", other.err()),
        }

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_empty_store_files() {
        let path = temp_path("empty");
        let blocks = HoppingBlocks::new(4, 2);
        HoppingFile::write_blocks(&blocks, &path).unwrap();
        assert_eq!(HoppingFile::read_blocks(&path).unwrap(), blocks);

        HoppingFile::write_hopping_matrix(&blocks, &path).unwrap();
        let mapped = MmapCsr::<u32>::from_file(&path).unwrap();
        assert_eq!(mapped.nnz(), 0);
        assert_eq!(mapped.indptr(), &[0, 0, 0, 0, 0]);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_rejects_truncated_file() {
        let path = temp_path("truncated");
        HoppingFile::write_hopping_matrix(&scenario(), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 4]).unwrap();

        match MmapCsr::<u32>::from_file(&path) {
            Err(Error::Hopping(HoppingError::CorruptedData)) => {}
            other => panic!("expected corrupted data, got {:?}", other.err()),
        }

        std::fs::remove_file(&path).unwrap();
    }
}
