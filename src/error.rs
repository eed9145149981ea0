//! Error types for the sparse Merkle tree store

use std::error::Error;
use std::fmt::{Debug, Display};

/// Error type for tree operations
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TreeError<DbError> {
    /// The root recomputed from a proof differs from the expected root
    InvalidMerkleProof {
        expected: Vec<u8>,
        computed: Vec<u8>,
    },
    /// Path does not address a leaf of a tree of this height
    PathOutOfRange { path: u64, height: usize },
    /// Sibling sequence length differs from the tree height
    InvalidSiblingCount { expected: usize, got: usize },
    /// Tree height outside of `1..=MAX_DEPTH`
    InvalidHeight { height: usize, max: usize },
    /// Compressed proof bytes or bitmap are malformed
    InvalidCompressedProof,
    /// Database error
    DbError(DbError),
}

impl<DbError: Display> Display for TreeError<DbError> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeError::InvalidMerkleProof { expected, computed } => write!(
                f,
                "Invalid merkle proof: expected root {}, computed {}",
                hex::encode(expected),
                hex::encode(computed)
            ),
            TreeError::PathOutOfRange { path, height } => {
                write!(f, "Path {} out of range for tree of height {}", path, height)
            }
            TreeError::InvalidSiblingCount { expected, got } => {
                write!(f, "Expected {} siblings, got {}", expected, got)
            }
            TreeError::InvalidHeight { height, max } => {
                write!(f, "Invalid tree height {} (must be in 1..={})", height, max)
            }
            TreeError::InvalidCompressedProof => write!(f, "Malformed compressed proof"),
            TreeError::DbError(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl<DbError: Debug + Display> Error for TreeError<DbError> {}

#[cfg(test)]
mod test {
    use super::TreeError;

    #[test]
    fn test_display_messages() {
        let err = TreeError::<String>::PathOutOfRange { path: 8, height: 3 };
        assert_eq!(err.to_string(), "Path 8 out of range for tree of height 3");

        let err = TreeError::<String>::InvalidMerkleProof {
            expected: vec![0xab, 0xcd],
            computed: vec![0x01, 0x02],
        };
        assert_eq!(
            err.to_string(),
            "Invalid merkle proof: expected root abcd, computed 0102"
        );

        let err = TreeError::DbError("disk full".to_string());
        assert_eq!(err.to_string(), "Database error: disk full");
    }
}
