use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sha3::Keccak256;
use smt_store::{verify_merkle_proof, MemoryDb, Path, SparseMerkleTree, TreeError};

type Tree = SparseMerkleTree<32, Keccak256, MemoryDb<32>>;

fn setup_tree(num_leaves: usize) -> (Tree, Vec<Path>) {
    let mut tree = Tree::new(MemoryDb::new());
    let mut paths = Vec::with_capacity(num_leaves);
    for _ in 0..num_leaves {
        let path: Path = rand::random();
        tree.update_leaf(rand::random(), path).unwrap();
        paths.push(path);
    }
    (tree, paths)
}

fn bench_proof_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("SMT Proof Generation");
    let (tree, paths) = setup_tree(100);

    group.bench_function("Siblings", |b| {
        b.iter(|| {
            for path in &paths {
                black_box(tree.get_siblings(*path)).unwrap();
            }
        })
    });

    group.bench_function("Compressed", |b| {
        b.iter(|| {
            for path in &paths {
                black_box(tree.compressed_proof(*path).unwrap().encode());
            }
        })
    });

    group.finish();
}

fn bench_proof_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("SMT Proof Verification");
    let (mut tree, paths) = setup_tree(100);
    let proofs: Vec<_> = paths
        .iter()
        .map(|path| {
            (
                *path,
                tree.get_leaf(*path).unwrap(),
                tree.get_siblings(*path).unwrap(),
            )
        })
        .collect();
    let root = tree.root();

    group.bench_function("Stateless", |b| {
        b.iter(|| {
            for (path, leaf, siblings) in &proofs {
                let result: Result<(), TreeError<()>> =
                    verify_merkle_proof::<32, Keccak256, ()>(*path, *leaf, siblings, root);
                black_box(result).unwrap();
            }
        })
    });

    group.bench_function("Verify and store", |b| {
        b.iter(|| {
            for (path, leaf, siblings) in &proofs {
                black_box(tree.verify_and_store_leaf(*leaf, *path, siblings)).unwrap();
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_proof_generation, bench_proof_verification);
criterion_main!(benches);
