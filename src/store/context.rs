//! Store regions
//!
//! A `Context` wraps one backing store for the duration of a logical
//! transaction and hands out `PrefixStore` views, one per `StoreKey`.

use super::KvStore;
use crate::error::Result;

/// Name of a store region
///
/// The region prefix is derived once: 4-byte big-endian name length
/// followed by the name bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreKey {
    name: String,
    prefix: Vec<u8>,
}

impl StoreKey {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut prefix = Vec::with_capacity(4 + name.len());
        prefix.extend_from_slice(&(name.len() as u32).to_be_bytes());
        prefix.extend_from_slice(name.as_bytes());
        Self { name, prefix }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Byte prefix shared by every key in this region
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }
}

/// Access to a backing store for one logical transaction
pub struct Context<'a> {
    store: &'a mut dyn KvStore,
}

impl<'a> Context<'a> {
    pub fn new(store: &'a mut dyn KvStore) -> Self {
        Self { store }
    }

    /// View of the region named by `key`
    pub fn kv_store<'s>(&'s mut self, key: &'s StoreKey) -> PrefixStore<'s, dyn KvStore + 'a> {
        PrefixStore::new(&mut *self.store, key.prefix())
    }
}

/// A store view that prepends a fixed prefix to every key
pub struct PrefixStore<'s, S: KvStore + ?Sized> {
    parent: &'s mut S,
    prefix: &'s [u8],
}

impl<'s, S: KvStore + ?Sized> PrefixStore<'s, S> {
    pub fn new(parent: &'s mut S, prefix: &'s [u8]) -> Self {
        Self { parent, prefix }
    }

    fn full_key(&self, key: &[u8]) -> Vec<u8> {
        let mut full = Vec::with_capacity(self.prefix.len() + key.len());
        full.extend_from_slice(self.prefix);
        full.extend_from_slice(key);
        full
    }
}

impl<S: KvStore + ?Sized> KvStore for PrefixStore<'_, S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.parent.get(&self.full_key(key))
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let full = self.full_key(key);
        self.parent.set(&full, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        let full = self.full_key(key);
        self.parent.delete(&full)
    }
}
