//! Proofs are used to verify the inclusion of a leaf in a tree.
//!
//! A proof is the list of sibling digests from the leaf level up to the root level.
//!
//! Most siblings of a sparse tree are zero subtrees, so a proof can be compressed into a
//! bitvector marking those levels plus the remaining digests.
//!
//! A compressed proof can be decompressed into a proof.
use bitvec::order::Lsb0;
use bitvec::vec::BitVec;

use crate::{parent_hash, verify_merkle_proof, walk_up, Hasher, Path, TreeError, MAX_DEPTH};

/// A merkle proof for a given path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof<const HASH_SIZE: usize> {
    siblings: Vec<[u8; HASH_SIZE]>,
}

impl<const HASH_SIZE: usize> Proof<HASH_SIZE> {
    /// Creates a new proof from siblings ordered from the leaf level to the root level.
    pub fn new(siblings: Vec<[u8; HASH_SIZE]>) -> Self {
        Self { siblings }
    }

    /// Returns the siblings in the proof.
    pub fn siblings(&self) -> &[[u8; HASH_SIZE]] {
        &self.siblings
    }

    /// Height of the tree the proof was taken from.
    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }

    /// Root implied by this proof for `leaf` at `path`.
    pub fn root<H: Hasher<HASH_SIZE> + Clone, DbError>(
        &self,
        path: Path,
        leaf: [u8; HASH_SIZE],
    ) -> Result<[u8; HASH_SIZE], TreeError<DbError>> {
        walk_up::<HASH_SIZE, H, DbError>(path, leaf, &self.siblings, |_, _| {})
    }

    /// Verifies the proof against a leaf, a path and the expected root.
    pub fn verify<H: Hasher<HASH_SIZE> + Clone, DbError>(
        &self,
        path: Path,
        leaf: [u8; HASH_SIZE],
        root: [u8; HASH_SIZE],
    ) -> Result<(), TreeError<DbError>> {
        verify_merkle_proof::<HASH_SIZE, H, DbError>(path, leaf, &self.siblings, root)
    }

    /// Compresses the proof into a compressed proof.
    ///
    /// Builds the zero-subtree hashes up to the proof's height on every call, use
    /// [`Self::compress_with`] with a cached table when compressing many proofs.
    pub fn compress<H: Hasher<HASH_SIZE> + Clone>(&self) -> CompressedProof<HASH_SIZE> {
        self.compress_with(&zero_hashes_up_to::<HASH_SIZE, H>(self.siblings.len()))
    }

    /// Compresses the proof against a zero-subtree table indexed by depth, such as
    /// [`crate::EmptyTree::zero_hashes`]. Levels missing from the table are kept explicit.
    pub fn compress_with(&self, zero_hashes: &[[u8; HASH_SIZE]]) -> CompressedProof<HASH_SIZE> {
        let mut bits = BitVec::with_capacity(self.siblings.len());
        let mut siblings = Vec::new();
        for (level, sibling) in self.siblings.iter().enumerate() {
            if zero_hashes.get(level) == Some(sibling) {
                bits.push(true);
            } else {
                bits.push(false);
                siblings.push(*sibling);
            }
        }
        CompressedProof::new(siblings, bits)
    }
}

/// A compressed merkle proof for a given path.
/// We don't store the siblings that are empty subtrees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedProof<const HASH_SIZE: usize> {
    siblings: Vec<[u8; HASH_SIZE]>,
    bits: BitVec<u8, Lsb0>,
}

impl<const HASH_SIZE: usize> CompressedProof<HASH_SIZE> {
    /// Creates a new compressed proof from the explicit siblings and a bitvector with
    /// one bit per level, set where the sibling is the zero subtree.
    /// Bits of the backing storage past `bits.len()` are cleared.
    pub fn new(siblings: Vec<[u8; HASH_SIZE]>, mut bits: BitVec<u8, Lsb0>) -> Self {
        bits.set_uninitialized(false);
        Self { siblings, bits }
    }

    /// Siblings that are not zero subtrees.
    pub fn siblings(&self) -> &[[u8; HASH_SIZE]] {
        &self.siblings
    }

    pub fn bits(&self) -> &BitVec<u8, Lsb0> {
        &self.bits
    }

    /// Decompresses the proof into a proof.
    pub fn decompress<H: Hasher<HASH_SIZE> + Clone, DbError>(
        &self,
    ) -> Result<Proof<HASH_SIZE>, TreeError<DbError>> {
        self.decompress_with(&zero_hashes_up_to::<HASH_SIZE, H>(self.bits.len()))
    }

    /// Decompresses the proof against a zero-subtree table indexed by depth.
    pub fn decompress_with<DbError>(
        &self,
        zero_hashes: &[[u8; HASH_SIZE]],
    ) -> Result<Proof<HASH_SIZE>, TreeError<DbError>> {
        if self.bits.len() > MAX_DEPTH || self.siblings.len() != self.bits.count_zeros() {
            return Err(TreeError::InvalidCompressedProof);
        }
        let mut explicit = self.siblings.iter();
        let mut siblings = Vec::with_capacity(self.bits.len());
        for (level, bit) in self.bits.iter().enumerate() {
            let sibling = if *bit {
                zero_hashes.get(level)
            } else {
                explicit.next()
            };
            siblings.push(*sibling.ok_or(TreeError::<DbError>::InvalidCompressedProof)?);
        }
        Ok(Proof::new(siblings))
    }

    /// Encodes the proof into a byte vector.
    ///
    /// Layout: `height (u16 BE) || explicit sibling count (u16 BE) || siblings || bitmap`.
    pub fn encode(&self) -> Vec<u8> {
        let mut encoded = Vec::with_capacity(4 + self.siblings.len() * HASH_SIZE);
        encoded.extend_from_slice(&(self.bits.len() as u16).to_be_bytes());
        encoded.extend_from_slice(&(self.siblings.len() as u16).to_be_bytes());
        for sibling in self.siblings.iter() {
            encoded.extend_from_slice(sibling);
        }
        encoded.extend_from_slice(self.bits.as_raw_slice());
        encoded
    }

    /// Decodes a proof from a byte vector.
    pub fn decode<DbError>(data: &[u8]) -> Result<Self, TreeError<DbError>> {
        let height = read_u16::<DbError>(data, 0)? as usize;
        let nb_siblings = read_u16::<DbError>(data, 2)? as usize;
        if height > MAX_DEPTH || nb_siblings > height {
            return Err(TreeError::InvalidCompressedProof);
        }
        let mut siblings = Vec::with_capacity(nb_siblings);
        let mut data_index = 4;
        for _ in 0..nb_siblings {
            let sibling: [u8; HASH_SIZE] = data
                .get(data_index..data_index + HASH_SIZE)
                .and_then(|bytes| bytes.try_into().ok())
                .ok_or(TreeError::<DbError>::InvalidCompressedProof)?;
            siblings.push(sibling);
            data_index += HASH_SIZE;
        }
        let raw_bits = &data[data_index..];
        if raw_bits.len() != height.div_ceil(8) {
            return Err(TreeError::InvalidCompressedProof);
        }
        let mut bits = BitVec::<u8, Lsb0>::from_slice(raw_bits);
        // padding past the height must be zero so every proof has a single encoding
        if bits[height..].any() {
            return Err(TreeError::InvalidCompressedProof);
        }
        bits.truncate(height);
        Ok(Self::new(siblings, bits))
    }
}

/// Zero-subtree hashes for depths `0..height`.
fn zero_hashes_up_to<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone>(
    height: usize,
) -> Vec<[u8; HASH_SIZE]> {
    let mut table = Vec::with_capacity(height);
    let mut current = [0; HASH_SIZE];
    for _ in 0..height.min(MAX_DEPTH) {
        table.push(current);
        current = parent_hash::<HASH_SIZE, H>(&current, &current);
    }
    table
}

fn read_u16<DbError>(data: &[u8], offset: usize) -> Result<u16, TreeError<DbError>> {
    data.get(offset..offset + 2)
        .and_then(|bytes| bytes.try_into().ok())
        .map(u16::from_be_bytes)
        .ok_or(TreeError::InvalidCompressedProof)
}
