//! Store Module
//!
//! The byte-oriented key-value capability the mappers are built on.
//!
//! ## Responsibilities
//! - `KvStore`: get/set/delete over raw byte keys and values
//! - `StoreKey` + `Context`: carve one backing store into named regions
//! - `MemStore`: ordered in-memory backend
//! - `DurableStore`: `MemStore` made durable by a write-ahead log
//!
//! ## Region Layout
//! ```text
//! ┌──────────────┬──────────────┬─────────────────────────────┐
//! │ NameLen (4)  │  Name bytes  │        Mapper key           │
//! └──────────────┴──────────────┴─────────────────────────────┘
//! ```
//! Length-prefixed names are prefix-free, so two regions never share a key.

mod context;
mod durable;
mod memory;

pub use context::{Context, PrefixStore, StoreKey};
pub use durable::DurableStore;
pub use memory::MemStore;

use crate::error::Result;

/// Byte-keyed, byte-valued storage
pub trait KvStore {
    /// Read the value stored under `key`, `None` if absent
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Remove `key`; removing an absent key is not an error
    fn delete(&mut self, key: &[u8]) -> Result<()>;
}
