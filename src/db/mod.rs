//! Database trait and implementations for the node store

mod memory;

pub use memory::MemoryDb;

use crate::TreeError;

/// Thread safety marker trait
#[cfg(feature = "multi-thread")]
pub trait ThreadSafe: Send + Sync {}
#[cfg(feature = "multi-thread")]
impl<T: Send + Sync> ThreadSafe for T {}

#[cfg(not(feature = "multi-thread"))]
pub trait ThreadSafe {}
#[cfg(not(feature = "multi-thread"))]
impl<T> ThreadSafe for T {}

/// Key-value store underneath the tree.
///
/// Keys are derived from parent hashes (see [`crate::left_slot_key`] and
/// [`crate::right_slot_key`]) and values are child digests. Entries are only ever
/// inserted or overwritten, never deleted.
pub trait Db<const HASH_SIZE: usize>: ThreadSafe {
    /// The error type for database operations
    type DbError;

    /// Get the value stored under `key`, `None` if it was never written
    fn get(&self, key: &[u8; HASH_SIZE])
        -> Result<Option<[u8; HASH_SIZE]>, TreeError<Self::DbError>>;

    /// Insert or overwrite the value stored under `key`
    fn insert(
        &mut self,
        key: [u8; HASH_SIZE],
        value: [u8; HASH_SIZE],
    ) -> Result<(), TreeError<Self::DbError>>;
}
