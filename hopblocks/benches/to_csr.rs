use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hopblocks::HoppingBlocks;
use rand::{rngs::StdRng, Rng, SeedableRng};

const NUM_FAMILIES: usize = 4;

/// Random hoppings spread over every family
fn random_pairs(num_sites: usize, count: usize) -> Vec<(usize, usize, usize)> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|_| {
            (
                rng.gen_range(0..NUM_FAMILIES),
                rng.gen_range(0..num_sites),
                rng.gen_range(0..num_sites),
            )
        })
        .collect()
}

fn bench_add(c: &mut Criterion) {
    let num_sites = 100_000;
    let pairs = random_pairs(num_sites, 400_000);
    c.bench_function("add 400k hoppings", |b| {
        b.iter(|| {
            let mut blocks = HoppingBlocks::new(num_sites, NUM_FAMILIES);
            for &(family_id, row, col) in &pairs {
                blocks.add(family_id, row, col).unwrap();
            }
            black_box(blocks)
        })
    });
}

fn bench_append(c: &mut Criterion) {
    let num_sites = 100_000;
    let rows: Vec<usize> = (0..num_sites).collect();
    let cols: Vec<usize> = (0..num_sites).map(|i| (i + 1) % num_sites).collect();
    c.bench_function("append 4 families of 100k", |b| {
        b.iter(|| {
            let mut blocks = HoppingBlocks::new(num_sites, NUM_FAMILIES);
            for family_id in 0..NUM_FAMILIES {
                blocks.append(family_id, &rows, &cols).unwrap();
            }
            black_box(blocks)
        })
    });
}

fn bench_to_csr(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_csr");
    for &nnz in &[10_000usize, 100_000, 1_000_000] {
        let num_sites = nnz / 4;
        let mut blocks = HoppingBlocks::new(num_sites, NUM_FAMILIES);
        for (family_id, row, col) in random_pairs(num_sites, nnz) {
            blocks.add(family_id, row, col).unwrap();
        }
        group.bench_with_input(BenchmarkId::from_parameter(nnz), &blocks, |b, blocks| {
            b.iter(|| black_box(blocks.to_csr().unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_add, bench_append, bench_to_csr);
criterion_main!(benches);
