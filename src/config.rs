//! Tree configuration and snapshots of a tree head.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use serde_with::Bytes;

use crate::{TreeError, MAX_DEPTH};

/// Construction parameters of a tree.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    /// Number of levels between a leaf and the root. Fixed for the lifetime of the tree.
    pub height: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self { height: MAX_DEPTH }
    }
}

impl TreeConfig {
    pub fn with_height(height: usize) -> Self {
        Self { height }
    }

    /// Checks that the height is in `1..=MAX_DEPTH`.
    pub fn validate<DbError>(&self) -> Result<(), TreeError<DbError>> {
        validate_height(self.height)
    }
}

/// Root and height of a tree, enough to rehydrate it on top of a store that already
/// holds its nodes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeSnapshot<const HASH_SIZE: usize> {
    #[cfg_attr(feature = "serde", serde(with = "serde_with::As::<Bytes>"))]
    pub root: [u8; HASH_SIZE],
    pub height: usize,
}

impl<const HASH_SIZE: usize> TreeSnapshot<HASH_SIZE> {
    pub fn new(root: [u8; HASH_SIZE], height: usize) -> Self {
        Self { root, height }
    }
}

pub(crate) fn validate_height<DbError>(height: usize) -> Result<(), TreeError<DbError>> {
    if height == 0 || height > MAX_DEPTH {
        return Err(TreeError::InvalidHeight {
            height,
            max: MAX_DEPTH,
        });
    }
    Ok(())
}
