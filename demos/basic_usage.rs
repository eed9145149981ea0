//! Basic example of using the sparse Merkle tree store
//!
//! This example demonstrates:
//! - Creating a new tree
//! - Updating leaves
//! - Getting the root hash
//! - Verifying merkle proofs

use sha3::Keccak256;
use smt_store::{verify_merkle_proof, MemoryDb, SparseMerkleTree, TreeConfig, TreeError};

fn main() {
    // Create a tree of height 16 with 32-byte hashes using Keccak-256
    let mut tree = SparseMerkleTree::<32, Keccak256, _>::with_config(
        MemoryDb::<32>::new(),
        TreeConfig::with_height(16),
    )
    .unwrap();
    println!("Empty root: {}", hex::encode(tree.root()));

    // Update some leaves, the data blocks are hashed into leaf digests
    tree.update(b"alice", 1).unwrap();
    tree.update(b"bob", 2).unwrap();
    tree.update(b"carol", 40_000).unwrap();

    // Get the root hash
    println!("Root hash: {}", hex::encode(tree.root()));
    println!("Stored slots: {}", tree.db().len());

    // Get and verify the siblings of the leaf at path 2
    let siblings = tree.get_siblings(2).unwrap();
    let leaf = tree.get_leaf(2).unwrap();
    let result: Result<(), TreeError<()>> =
        verify_merkle_proof::<32, Keccak256, ()>(2, leaf, &siblings, tree.root());
    println!("Proof verification: {}", result.is_ok());

    // Re-verify against the tree itself, the root does not move
    let root = tree.root();
    tree.verify_and_store(b"bob", 2, &siblings).unwrap();
    assert_eq!(root, tree.root());
}
