//! Example of exchanging compressed proofs between two parties
//!
//! This example demonstrates:
//! - Building a proof from one tree
//! - Compressing and encoding it
//! - Decoding it and checking it against a tree that only knows the root

use sha3::Keccak256;
use smt_store::{CompressedProof, MemoryDb, SparseMerkleTree, TreeError, TreeSnapshot};

fn main() {
    let mut prover = SparseMerkleTree::<32, Keccak256, _>::new(MemoryDb::<32>::new());
    prover.update(b"block 1", 7).unwrap();
    prover.update(b"block 2", 1 << 40).unwrap();

    let encoded = prover.compressed_proof(7).unwrap().encode();
    println!(
        "Proof for a tree of height {}: {} bytes compressed instead of {}",
        prover.height(),
        encoded.len(),
        prover.height() * 32
    );

    // The verifier only holds the head of the tree, not its nodes
    let mut verifier = SparseMerkleTree::<32, Keccak256, _>::from_snapshot(
        MemoryDb::<32>::new(),
        TreeSnapshot::new(prover.root(), prover.height()),
    )
    .unwrap();
    let decoded = CompressedProof::<32>::decode::<()>(&encoded)
        .and_then(|compressed| verifier.decompress_proof(&compressed))
        .unwrap();

    verifier
        .verify_and_store(b"block 1", 7, decoded.siblings())
        .unwrap();
    println!("Valid proof accepted, verifier learned {} slots", verifier.db().len());

    let rejected: Result<(), TreeError<()>> =
        verifier.verify_and_store(b"forged block", 7, decoded.siblings());
    println!("Forged proof rejected: {}", rejected.is_err());
}
