//! Zero-subtree table for the sparse Merkle tree
use std::{marker::PhantomData, sync::Arc};

use crate::hash::{parent_hash, Hasher, MAX_DEPTH};

/// Helper struct to build the hashes of empty subtrees.
pub struct EmptyTree<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone>(PhantomData<H>);

impl<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone> EmptyTree<HASH_SIZE, H> {
    /// Gets the zero-subtree hashes indexed by depth: `[0]` is an empty leaf (the all-zero
    /// digest) and `[MAX_DEPTH]` is the root of an empty tree of maximum height.
    pub fn zero_hashes() -> Arc<[[u8; HASH_SIZE]]> {
        Arc::from(Self::build_table())
    }

    /// Hash of an empty subtree of the given depth. Performs `depth` hashes.
    pub fn zero_root(depth: usize) -> [u8; HASH_SIZE] {
        let mut current = [0; HASH_SIZE];
        for _ in 0..depth {
            current = parent_hash::<HASH_SIZE, H>(&current, &current);
        }
        current
    }

    /// builds the table
    fn build_table() -> Vec<[u8; HASH_SIZE]> {
        let mut table = Vec::with_capacity(MAX_DEPTH + 1);
        table.push([0; HASH_SIZE]);
        for depth in 1..=MAX_DEPTH {
            let below = table[depth - 1];
            table.push(parent_hash::<HASH_SIZE, H>(&below, &below));
        }
        table
    }
}
