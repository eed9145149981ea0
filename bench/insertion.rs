use criterion::{criterion_group, criterion_main, Criterion};
use sha3::Keccak256;
use smt_store::{MemoryDb, SparseMerkleTree, TreeConfig};

pub fn generate_random_leaf() -> [u8; 32] {
    rand::random()
}

fn bench_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("SMT Update");

    group.bench_function("Full height tree", |b| {
        b.iter(|| {
            let mut tree = SparseMerkleTree::<32, Keccak256, _>::new(MemoryDb::<32>::new());
            for _ in 0..100 {
                tree.update_leaf(generate_random_leaf(), rand::random())
                    .unwrap();
            }
        })
    });

    group.bench_function("Height 20 tree", |b| {
        b.iter(|| {
            let mut tree = SparseMerkleTree::<32, Keccak256, _>::with_config(
                MemoryDb::<32>::new(),
                TreeConfig::with_height(20),
            )
            .unwrap();
            for _ in 0..100 {
                let path = rand::random::<u64>() & ((1 << 20) - 1);
                tree.update_leaf(generate_random_leaf(), path).unwrap();
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_insertion);
criterion_main!(benches);
