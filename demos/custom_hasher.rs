//! Example of implementing a custom hasher for the sparse Merkle tree store
//!
//! This example demonstrates:
//! - Creating a custom hasher implementation
//! - Using it with the tree
//! - Basic tree operations with the custom hasher

use sha2::{Digest, Sha256};
use smt_store::{Hasher, MemoryDb, SparseMerkleTree};

// Custom hasher that uses SHA256 but adds a prefix to the input
#[derive(Clone)]
struct PrefixedSha256;

impl Hasher<32> for PrefixedSha256 {
    fn hash(data: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        // Add a custom prefix to the input
        hasher.update(b"custom_prefix:");
        hasher.update(data);
        hasher.finalize().into()
    }
}

fn main() {
    // Create a new tree with our custom hasher
    let mut tree = SparseMerkleTree::<32, PrefixedSha256, _>::new(MemoryDb::<32>::new());
    tree.update(&[1, 2, 3], 1).unwrap();
    println!("Root hash with custom hasher: {}", hex::encode(tree.root()));

    // Compare with standard SHA256
    let mut standard_tree = SparseMerkleTree::<32, Sha256, _>::new(MemoryDb::<32>::new());
    standard_tree.update(&[1, 2, 3], 1).unwrap();
    println!(
        "Root hash with standard SHA256: {}",
        hex::encode(standard_tree.root())
    );

    // Note that the hashes are different due to our custom prefix
    println!("\nThe hashes are different because our custom hasher adds a prefix to the input.");
}
