//! Parallel construction over disjoint family ranges
//!
//! A store has no internal synchronisation. Parallel builds give every
//! worker its own store and a contiguous range of family ids, then merge
//! the stores in range order.

use std::ops::Range;

use hopblocks_core::{HoppingBlocks, HoppingError};
use rayon::prelude::*;

use crate::{Error, Result};

/// Configuration for parallel construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Number of family ranges to build concurrently
    pub workers: usize,
    /// Lower bound on families per range, to avoid tiny tasks
    pub min_families_per_worker: usize,
}

impl ParallelConfig {
    /// Set the number of workers
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the minimum number of families handled by one worker
    pub fn with_min_families_per_worker(mut self, min_families: usize) -> Self {
        self.min_families_per_worker = min_families.max(1);
        self
    }

    /// Split `0..num_families` into contiguous, disjoint, ordered ranges
    pub fn partition(&self, num_families: usize) -> Vec<Range<usize>> {
        let chunk = num_families
            .div_ceil(self.workers.max(1))
            .max(self.min_families_per_worker.max(1));
        (0..num_families)
            .step_by(chunk)
            .map(|start| start..(start + chunk).min(num_families))
            .collect()
    }
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            workers: rayon::current_num_threads(),
            min_families_per_worker: 1,
        }
    }
}

/// Build a store by running `generate` once per family range in parallel
///
/// Each call receives its range and a fresh store of the full shape, and
/// may only write families inside its range. The merged result equals
/// running `generate` over every range in order on a single store.
pub fn build_parallel<F>(
    num_sites: usize,
    num_families: usize,
    config: &ParallelConfig,
    generate: F,
) -> Result<HoppingBlocks>
where
    F: Fn(Range<usize>, &mut HoppingBlocks) -> hopblocks_core::Result<()> + Sync,
{
    let ranges = config.partition(num_families);
    log::debug!(
        "building {} families over {} sites in {} ranges",
        num_families,
        num_sites,
        ranges.len()
    );

    let parts = ranges
        .into_par_iter()
        .map(|range| -> Result<HoppingBlocks> {
            let mut blocks = HoppingBlocks::new(num_sites, num_families);
            generate(range.clone(), &mut blocks)?;

            let strays = blocks
                .iter()
                .any(|family| !range.contains(&family.family_id()) && !family.is_empty());
            if strays {
                return Err(Error::Hopping(HoppingError::FamilyOutOfRange));
            }
            Ok(blocks)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut merged = HoppingBlocks::new(num_sites, num_families);
    for part in parts {
        merged.merge(part)?;
    }
    log::debug!("parallel build produced {} hoppings", merged.nnz());
    Ok(merged)
}
