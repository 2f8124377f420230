//! Mapper Module
//!
//! Typed sequences laid out over one store region.
//!
//! ## Key Layout (per region)
//! ```text
//! key(-1)   → length (list) or cursor (queue)
//! key(0)    → entry 0
//! key(1)    → entry 1
//! ...
//! ```
//! Keys come from `KeyEncoder`, so the sentinel never collides with an
//! entry key.
//!
//! ## Statelessness
//! A mapper holds only its region name and key encoder. Every call reloads
//! the length or cursor from the store, which makes mappers safe to rebuild
//! at any time, including after a restart.
//!
//! Loading the length or cursor writes the zero record when it is absent,
//! so `len`, `cursor`, `peek` and friends may write to the store.

mod list;
mod queue;

pub use list::ListMapper;
pub use queue::{Cursor, QueueMapper};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::encoding::{Codec, KeyEncoder};
use crate::error::{Result, SeqError};
use crate::store::KvStore;

// =============================================================================
// Shared Helpers
// =============================================================================

/// Reject negative positions
fn check_index(index: i64) -> Result<()> {
    if index < 0 {
        return Err(SeqError::InvalidIndex(index));
    }
    Ok(())
}

/// Load the sentinel record, writing `init` first if it is absent
fn load_sentinel<V, C, S>(store: &mut S, keys: &KeyEncoder<C>, init: V) -> Result<(V, bool)>
where
    V: Serialize + DeserializeOwned,
    C: Codec,
    S: KvStore + ?Sized,
{
    match store.get(keys.sentinel())? {
        Some(bytes) => Ok((keys.codec().decode(&bytes)?, false)),
        None => {
            let bytes = keys.codec().encode(&init)?;
            store.set(keys.sentinel(), &bytes)?;
            Ok((init, true))
        }
    }
}

fn store_sentinel<V, C, S>(store: &mut S, keys: &KeyEncoder<C>, value: &V) -> Result<()>
where
    V: Serialize,
    C: Codec,
    S: KvStore + ?Sized,
{
    let bytes = keys.codec().encode(value)?;
    store.set(keys.sentinel(), &bytes)
}

/// Read and decode the entry at `index`; an absent entry is a decode error
fn read_entry<T, C, S>(store: &S, keys: &KeyEncoder<C>, index: i64) -> Result<T>
where
    T: DeserializeOwned,
    C: Codec,
    S: KvStore + ?Sized,
{
    let bytes = store
        .get(&keys.index(index)?)?
        .ok_or_else(|| SeqError::Decode(format!("no entry at index {}", index)))?;
    keys.codec().decode(&bytes)
}

fn write_entry<T, C, S>(store: &mut S, keys: &KeyEncoder<C>, index: i64, value: &T) -> Result<()>
where
    T: Serialize,
    C: Codec,
    S: KvStore + ?Sized,
{
    let bytes = keys.codec().encode(value)?;
    store.set(&keys.index(index)?, &bytes)
}

/// `n + 1`, reporting overflow as corrupt state
fn next_position(n: i64, what: &str) -> Result<i64> {
    n.checked_add(1)
        .ok_or_else(|| SeqError::CorruptState(format!("{} overflow at {}", what, n)))
}
