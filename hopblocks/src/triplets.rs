//! Text triplet import and export
//!
//! One `family row col` hopping per line; see
//! [`parse_triplet`](hopblocks_core::parse_triplet) for the grammar.

use std::io::{BufRead, Write};

use hopblocks_core::{parse_triplet, HoppingBlocks};

use crate::{Error, Result};

/// Add every triplet read from `reader` to `blocks`
///
/// Returns the number of hoppings added. Lines before a failing line stay
/// in the store; the error carries the 1-based line number.
pub fn read_triplets<R: BufRead>(reader: R, blocks: &mut HoppingBlocks) -> Result<usize> {
    let mut added = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|_| Error::Read { line: index + 1 })?;
        let parsed = parse_triplet(&line).map_err(|source| Error::Parse {
            line: index + 1,
            source,
        })?;
        if let Some((family_id, row, col)) = parsed {
            blocks.add(family_id, row, col).map_err(|source| Error::Parse {
                line: index + 1,
                source,
            })?;
            added += 1;
        }
    }
    log::debug!("read {added} hopping triplets");
    Ok(added)
}

/// Write every hopping as a triplet line, family by family in insertion order
pub fn write_triplets<W: Write>(blocks: &HoppingBlocks, mut writer: W) -> Result<()> {
    writeln!(
        writer,
        "# family row col ({} sites, {} families)",
        blocks.num_sites(),
        blocks.num_families()
    )
    .map_err(|_| Error::IoError("Failed to write triplet header"))?;

    for family in blocks {
        for coo in family.coordinates() {
            writeln!(writer, "{} {} {}", family.family_id(), coo.row, coo.col)
                .map_err(|_| Error::IoError("Failed to write triplet"))?;
        }
    }
    writer
        .flush()
        .map_err(|_| Error::IoError("Failed to flush triplets"))
}
