//! Hash utilities shared by the tree, the node store and proofs.
//!
//! Everything in here is a pure function of its inputs. Roots produced by this crate
//! are only compatible with another system if these functions match it bit for bit.

use sha2::{Digest, Sha256};
use sha3::Keccak256;

/// Leaf index. Bit `i` (from the least significant side) picks the branch taken at
/// level `i` when walking from the leaf up to the root: `0` is left, `1` is right.
pub type Path = u64;

/// Maximum height of a tree, bounded by the width of [`Path`].
pub const MAX_DEPTH: usize = Path::BITS as usize;

const LEFT_SLOT_TAG: u8 = 0x00;
const RIGHT_SLOT_TAG: u8 = 0x01;

/// Simple hash trait required to hash the nodes in the tree
///
/// # Type Parameters
/// * `HASH_SIZE` - The size of the hash digest in bytes
pub trait Hasher<const HASH_SIZE: usize> {
    fn hash(data: &[u8]) -> [u8; HASH_SIZE];
}

impl Hasher<32> for Keccak256 {
    fn hash(data: &[u8]) -> [u8; 32] {
        let mut hasher = Keccak256::new();
        hasher.update(data);
        hasher.finalize().into()
    }
}

impl Hasher<32> for Sha256 {
    fn hash(data: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hasher.finalize().into()
    }
}

/// Get the bit at the given index of the path, counting from the least significant bit.
pub fn bit_at(path: Path, index: usize) -> u8 {
    if index >= MAX_DEPTH {
        return 0;
    }
    ((path >> index) & 1) as u8
}

/// Hash of a parent node: `H(left || right)`.
pub fn parent_hash<const HASH_SIZE: usize, H: Hasher<HASH_SIZE>>(
    left: &[u8; HASH_SIZE],
    right: &[u8; HASH_SIZE],
) -> [u8; HASH_SIZE] {
    H::hash([left.as_slice(), right.as_slice()].concat().as_slice())
}

/// Hash of a raw data block, used as the leaf digest by the `update`/`store` entry points.
pub fn leaf_hash<const HASH_SIZE: usize, H: Hasher<HASH_SIZE>>(data: &[u8]) -> [u8; HASH_SIZE] {
    H::hash(data)
}

/// Storage key under which the left child of `parent` lives.
pub fn left_slot_key<const HASH_SIZE: usize, H: Hasher<HASH_SIZE>>(
    parent: &[u8; HASH_SIZE],
) -> [u8; HASH_SIZE] {
    slot_key::<HASH_SIZE, H>(parent, LEFT_SLOT_TAG)
}

/// Storage key under which the right child of `parent` lives.
pub fn right_slot_key<const HASH_SIZE: usize, H: Hasher<HASH_SIZE>>(
    parent: &[u8; HASH_SIZE],
) -> [u8; HASH_SIZE] {
    slot_key::<HASH_SIZE, H>(parent, RIGHT_SLOT_TAG)
}

// One extra byte keeps slot keys out of the `H(a || b)` domain used for parents.
fn slot_key<const HASH_SIZE: usize, H: Hasher<HASH_SIZE>>(
    parent: &[u8; HASH_SIZE],
    tag: u8,
) -> [u8; HASH_SIZE] {
    H::hash([parent.as_slice(), &[tag]].concat().as_slice())
}
