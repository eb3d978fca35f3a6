//! Build the hopping matrix of a rectangular lattice and write it to disk
//!
//! ```text
//! cargo run --example chain_lattice -- build --width 200 --height 100 --periodic lattice.hopb
//! cargo run --example chain_lattice -- info lattice.hopb
//! ```

use std::{ops::Range, path::PathBuf, time::Instant};

use clap::{Parser, Subcommand};
use hopblocks::{
    build_parallel, HoppingBlocks, HoppingError, HoppingFile, MatrixFormat, MmapCsr, ParallelConfig,
    SparseMatrix,
};

#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(about = "Assemble lattice hopping matrices from per-family coordinate blocks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a rectangular lattice and write its family-id matrix
    Build {
        /// Output file
        output: PathBuf,

        /// Sites along x
        #[arg(long, default_value_t = 100)]
        width: usize,

        /// Sites along y
        #[arg(long, default_value_t = 100)]
        height: usize,

        /// Wrap hoppings across the lattice edges
        #[arg(long)]
        periodic: bool,

        /// Include the two diagonal next-nearest-neighbour families
        #[arg(long)]
        diagonal: bool,

        /// Worker threads for construction (defaults to the rayon pool size)
        #[arg(long)]
        workers: Option<usize>,

        /// Also write the raw per-family blocks to this file
        #[arg(long)]
        blocks: Option<PathBuf>,
    },
    /// Show a summary of a hopping file
    Info {
        /// Hopping file
        path: PathBuf,
    },
}

/// Relative offsets `(dx, dy)` of the hopping families
fn family_offsets(diagonal: bool) -> Vec<(isize, isize)> {
    let mut offsets = vec![(1, 0), (0, 1)];
    if diagonal {
        offsets.extend([(1, 1), (1, -1)]);
    }
    offsets
}

/// Resolve one family range against every site of the lattice
fn generate(
    range: Range<usize>,
    blocks: &mut HoppingBlocks,
    offsets: &[(isize, isize)],
    width: usize,
    height: usize,
    periodic: bool,
) -> Result<(), HoppingError> {
    for family_id in range {
        let (dx, dy) = offsets[family_id];
        let mut rows = Vec::with_capacity(width * height);
        let mut cols = Vec::with_capacity(width * height);

        for y in 0..height {
            for x in 0..width {
                let tx = x as isize + dx;
                let ty = y as isize + dy;
                let inside = (0..width as isize).contains(&tx) && (0..height as isize).contains(&ty);
                if !inside && !periodic {
                    continue;
                }
                let tx = tx.rem_euclid(width as isize) as usize;
                let ty = ty.rem_euclid(height as isize) as usize;
                rows.push(y * width + x);
                cols.push(ty * width + tx);
            }
        }
        blocks.append(family_id, &rows, &cols)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            output,
            width,
            height,
            periodic,
            diagonal,
            workers,
            blocks: blocks_path,
        } => {
            let offsets = family_offsets(diagonal);
            let mut config = ParallelConfig::default();
            if let Some(workers) = workers {
                config = config.with_workers(workers);
            }

            let start = Instant::now();
            let blocks = build_parallel(width * height, offsets.len(), &config, |range, blocks| {
                generate(range, blocks, &offsets, width, height, periodic)
            })?;
            println!(
                "Built {} hoppings in {} families over {} sites in {:?}",
                blocks.nnz(),
                blocks.num_families(),
                blocks.num_sites(),
                start.elapsed()
            );
            if blocks.duplicate_count() > 0 {
                println!(
                    "Note: {} repeated (row, col) pairs kept as separate entries",
                    blocks.duplicate_count()
                );
            }

            let start = Instant::now();
            HoppingFile::write_hopping_matrix(&blocks, &output)?;
            println!("Wrote {} in {:?}", output.display(), start.elapsed());

            if let Some(path) = blocks_path {
                HoppingFile::write_blocks(&blocks, &path)?;
                println!("Wrote blocks to {}", path.display());
            }
        }
        Commands::Info { path } => {
            let file = HoppingFile::open(&path)?;
            println!("Format: {:?}", file.format());
            println!("Data type: {:?}", file.data_type());
            println!(
                "Shape: {} x {}, {} entries, {} families",
                file.header.nrows, file.header.ncols, file.header.nnz, file.header.num_families
            );

            match file.format() {
                Some(MatrixFormat::Csr) => {
                    let matrix = MmapCsr::<u32>::from_file(&path)?;
                    let busiest = (0..matrix.nrows())
                        .map(|row| (row, matrix.row(row).count()))
                        .max_by_key(|&(_, count)| count);
                    if let Some((row, count)) = busiest {
                        println!("Row {row} has the most hoppings: {count}");
                    }
                    println!("Stored entries: {}", matrix.nnz());
                }
                Some(MatrixFormat::Blocks) => {
                    let blocks = HoppingFile::read_blocks(&path)?;
                    for family in &blocks {
                        println!("Family {}: {} hoppings", family.family_id(), family.len());
                    }
                }
                None => println!("Unknown format tag {}", file.header.format_type),
            }
        }
    }
    Ok(())
}
