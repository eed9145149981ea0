use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use serde_with::Bytes;

use crate::{db::Db, TreeError};

/// A simple in-memory database implementation
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryDb<const HASH_SIZE: usize> {
    #[cfg_attr(feature = "serde", serde(with = "serde_with::As::<Vec<(Bytes, Bytes)>>"))]
    slots: HashMap<[u8; HASH_SIZE], [u8; HASH_SIZE]>,
}

impl<const HASH_SIZE: usize> MemoryDb<HASH_SIZE> {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
    pub fn slots(&self) -> &HashMap<[u8; HASH_SIZE], [u8; HASH_SIZE]> {
        &self.slots
    }
    /// Number of stored slots. Each materialized parent accounts for two.
    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<const HASH_SIZE: usize> Default for MemoryDb<HASH_SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const HASH_SIZE: usize> Db<HASH_SIZE> for MemoryDb<HASH_SIZE> {
    type DbError = ();

    fn get(
        &self,
        key: &[u8; HASH_SIZE],
    ) -> Result<Option<[u8; HASH_SIZE]>, TreeError<Self::DbError>> {
        Ok(self.slots.get(key).copied())
    }

    fn insert(
        &mut self,
        key: [u8; HASH_SIZE],
        value: [u8; HASH_SIZE],
    ) -> Result<(), TreeError<Self::DbError>> {
        self.slots.insert(key, value);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::Db;
    use crate::MemoryDb;

    #[test]
    fn test_memory_db_new() {
        let db = MemoryDb::<32>::new();
        assert!(db.is_empty());
        assert_eq!(db.get(&[0; 32]).unwrap(), None);
    }

    #[test]
    fn test_memory_db_insert() {
        let mut db = MemoryDb::<32>::default();
        db.insert([1; 32], [2; 32]).unwrap();
        assert_eq!(db.get(&[1; 32]).unwrap(), Some([2; 32]));
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn test_memory_db_overwrite() {
        let mut db = MemoryDb::<32>::default();
        db.insert([1; 32], [2; 32]).unwrap();
        db.insert([1; 32], [3; 32]).unwrap();
        assert_eq!(db.get(&[1; 32]).unwrap(), Some([3; 32]));
        assert_eq!(db.slots().len(), 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_memory_db_serde() {
        let mut db = MemoryDb::<32>::default();
        db.insert([1; 32], [2; 32]).unwrap();
        db.insert([3; 32], [4; 32]).unwrap();
        let json = serde_json::to_string(&db).unwrap();
        let decoded: MemoryDb<32> = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, db);
    }
}
