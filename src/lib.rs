//! Content-addressed Sparse Merkle Tree store
//!
//! A fixed-height binary hash tree whose nodes are kept in a key-value store keyed by
//! the hash of their parent rather than by their position. Identical subtrees share
//! storage entries, and every subtree that was never written is implicitly the
//! canonical zero subtree for its depth.
//!
//! The crate provides:
//! - Leaf updates by path index, with siblings derived from the tree or supplied by the caller
//! - Inclusion proofs, optionally compressed against the zero-subtree table
//! - Proof verification that commits nothing when the proof is rejected
//! - Flexible storage backend through the `Db` trait

mod config;
mod db;
mod error;
mod hash;
mod node;
mod proof;
mod tree;

pub use config::{TreeConfig, TreeSnapshot};
pub use db::{Db, MemoryDb, ThreadSafe};
pub use error::TreeError;
pub use hash::{
    bit_at, leaf_hash, left_slot_key, parent_hash, right_slot_key, Hasher, Path, MAX_DEPTH,
};
pub use node::{Branch, Slot};
pub use proof::{CompressedProof, Proof};
pub use tree::{verify_merkle_proof, walk_up, EmptyTree, SparseMerkleTree};

#[cfg(test)]
mod tests;
