use std::fmt::Display;

/// Result of reading one child slot from the node store.
///
/// The store never fails on a missing entry: a slot that was never written is an
/// [`Slot::ImplicitZero`], meaning the child is the canonical zero subtree for its depth.
/// It only becomes a digest through [`Slot::resolve`], right before hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<const HASH_SIZE: usize> {
    /// A child digest that was written to the store
    Materialized([u8; HASH_SIZE]),
    /// Nothing stored for this slot
    ImplicitZero,
}

impl<const HASH_SIZE: usize> Slot<HASH_SIZE> {
    /// Returns the stored digest, or `zero` (the zero-subtree hash of the slot's depth).
    pub fn resolve(&self, zero: &[u8; HASH_SIZE]) -> [u8; HASH_SIZE] {
        match self {
            Self::Materialized(digest) => *digest,
            Self::ImplicitZero => *zero,
        }
    }

    pub fn is_materialized(&self) -> bool {
        matches!(self, Self::Materialized(_))
    }

    /// Returns the stored digest, if any.
    pub fn digest(&self) -> Option<[u8; HASH_SIZE]> {
        match self {
            Self::Materialized(digest) => Some(*digest),
            Self::ImplicitZero => None,
        }
    }
}

impl<const HASH_SIZE: usize> From<Option<[u8; HASH_SIZE]>> for Slot<HASH_SIZE> {
    fn from(value: Option<[u8; HASH_SIZE]>) -> Self {
        match value {
            Some(digest) => Self::Materialized(digest),
            None => Self::ImplicitZero,
        }
    }
}

impl<const HASH_SIZE: usize> Display for Slot<HASH_SIZE> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Materialized(digest) => write!(f, "Materialized({})", hex::encode(digest)),
            Self::ImplicitZero => write!(f, "ImplicitZero"),
        }
    }
}
