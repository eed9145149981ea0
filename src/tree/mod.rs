mod empty;
mod sparse;

pub use empty::EmptyTree;
pub use sparse::SparseMerkleTree;

use crate::config::validate_height;
use crate::hash::{bit_at, Hasher, Path, MAX_DEPTH};
use crate::Branch;
use crate::TreeError;

/// Walk up the tree from the leaf to the root node and return the root hash.
/// * `path` - path of the leaf we start from.
/// * `leaf` - starting leaf digest.
/// * `siblings` - All the sibling digests on the path, from the leaf to the root.
///   Their count is the height of the tree.
/// * `for_each` - Closure that is executed at each step of the traversal of the tree.
///     * `level: usize` - level of the child that was just consumed (0 is the leaf level)
///     * `parent: &Branch<HASH_SIZE>` - the recomputed parent with its two children
///
/// Nothing is written anywhere: callers decide what to do with the branches.
pub fn walk_up<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone, DbError>(
    path: Path,
    leaf: [u8; HASH_SIZE],
    siblings: &[[u8; HASH_SIZE]],
    mut for_each: impl FnMut(usize, &Branch<HASH_SIZE>),
) -> Result<[u8; HASH_SIZE], TreeError<DbError>> {
    validate_height::<DbError>(siblings.len())?;
    check_path::<DbError>(path, siblings.len())?;
    let mut current = leaf;
    for (level, sibling) in siblings.iter().enumerate() {
        // order the children based on the path
        let parent = if bit_at(path, level) == 0 {
            Branch::new::<H>(current, *sibling)
        } else {
            Branch::new::<H>(*sibling, current)
        };
        for_each(level, &parent);
        current = parent.hash();
    }
    Ok(current)
}

/// Verify a merkle proof against a root, without any store.
///
/// # Returns
///
/// Returns `Ok(())` if the root recomputed from `leaf` and `siblings` is `root`,
/// otherwise returns an error.
pub fn verify_merkle_proof<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone, DbError>(
    path: Path,
    leaf: [u8; HASH_SIZE],
    siblings: &[[u8; HASH_SIZE]],
    root: [u8; HASH_SIZE],
) -> Result<(), TreeError<DbError>> {
    let computed = walk_up::<HASH_SIZE, H, DbError>(path, leaf, siblings, |_, _| {})?;
    if computed == root {
        Ok(())
    } else {
        Err(TreeError::InvalidMerkleProof {
            expected: root.to_vec(),
            computed: computed.to_vec(),
        })
    }
}

/// Rejects paths that do not fit in `height` bits.
pub(crate) fn check_path<DbError>(path: Path, height: usize) -> Result<(), TreeError<DbError>> {
    if height < MAX_DEPTH && path >> height != 0 {
        return Err(TreeError::PathOutOfRange { path, height });
    }
    Ok(())
}
