use std::fmt::Display;

use crate::hash::{parent_hash, Hasher};

/// A parent node together with its two children.
/// Those are what the node store persists: the children, keyed by the parent hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Branch<const HASH_SIZE: usize> {
    node_hash: [u8; HASH_SIZE],
    left: [u8; HASH_SIZE],
    right: [u8; HASH_SIZE],
}

impl<const HASH_SIZE: usize> Branch<HASH_SIZE> {
    /// Creates a new [`Branch`]. This function performs a hash.
    pub fn new<H: Hasher<HASH_SIZE>>(left: [u8; HASH_SIZE], right: [u8; HASH_SIZE]) -> Self {
        Self {
            node_hash: parent_hash::<HASH_SIZE, H>(&left, &right),
            left,
            right,
        }
    }

    /// Returns the hash of the node. NO HASHING IS DONE HERE.
    pub fn hash(&self) -> [u8; HASH_SIZE] {
        self.node_hash
    }

    /// Returns the left and right children of this branch.
    pub fn children(&self) -> ([u8; HASH_SIZE], [u8; HASH_SIZE]) {
        (self.left, self.right)
    }

    pub fn left(&self) -> [u8; HASH_SIZE] {
        self.left
    }

    pub fn right(&self) -> [u8; HASH_SIZE] {
        self.right
    }
}

impl<const HASH_SIZE: usize> Display for Branch<HASH_SIZE> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Branch {{ hash: {}, left: {}, right: {} }}",
            hex::encode(self.node_hash),
            hex::encode(self.left),
            hex::encode(self.right)
        )
    }
}
