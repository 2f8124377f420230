//! In-memory store
//!
//! BTreeMap-backed store. Keys iterate in sorted order.

use std::collections::btree_map;
use std::collections::BTreeMap;

use super::KvStore;
use crate::error::Result;

/// Ordered in-memory key-value store
#[derive(Debug, Default, Clone)]
pub struct MemStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.data.contains_key(key)
    }

    /// Iterate over all entries in sorted key order
    pub fn iter(&self) -> btree_map::Iter<'_, Vec<u8>, Vec<u8>> {
        self.data.iter()
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.data.clear();
    }
}

impl KvStore for MemStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.data.remove(key);
        Ok(())
    }
}
