//! List mapper
//!
//! Random-access, append-grown list of `T` records.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{check_index, load_sentinel, next_position, read_entry, store_sentinel, write_entry};
use crate::encoding::{BincodeCodec, Codec, KeyEncoder};
use crate::error::{Result, SeqError};
use crate::store::{Context, KvStore, StoreKey};

/// A list of `T` stored in one region
///
/// The length lives under the sentinel key and entry `i` under the key of
/// `i`. `T` is bound to `DeserializeOwned`, so borrowed record types are
/// rejected at compile time; records are always stored by value.
pub struct ListMapper<T, C = BincodeCodec> {
    key: StoreKey,
    keys: KeyEncoder<C>,
    _record: PhantomData<fn() -> T>,
}

impl<T> ListMapper<T, BincodeCodec>
where
    T: Serialize + DeserializeOwned,
{
    /// List over `key` using the default bincode codec
    pub fn with_bincode(key: StoreKey) -> Result<Self> {
        Self::new(BincodeCodec, key)
    }
}

impl<T, C> ListMapper<T, C>
where
    T: Serialize + DeserializeOwned,
    C: Codec,
{
    pub fn new(codec: C, key: StoreKey) -> Result<Self> {
        Ok(Self {
            key,
            keys: KeyEncoder::new(codec)?,
            _record: PhantomData,
        })
    }

    /// The region this list lives in
    pub fn store_key(&self) -> &StoreKey {
        &self.key
    }

    /// Number of logical elements
    ///
    /// Writes a zero length on first use. Callers must treat this read as
    /// potentially mutating.
    pub fn len(&self, ctx: &mut Context<'_>) -> Result<i64> {
        let mut store = ctx.kv_store(&self.key);
        self.load_len(&mut store)
    }

    pub fn is_empty(&self, ctx: &mut Context<'_>) -> Result<bool> {
        Ok(self.len(ctx)? == 0)
    }

    /// Write the zero length if the list has never been touched
    pub fn ensure_initialized(&self, ctx: &mut Context<'_>) -> Result<()> {
        self.len(ctx).map(|_| ())
    }

    /// Decode the entry at `index`
    ///
    /// Only the sign of `index` is checked; reading a slot that was never
    /// written fails with `SeqError::Decode`.
    pub fn get(&self, ctx: &mut Context<'_>, index: i64) -> Result<T> {
        check_index(index)?;
        let store = ctx.kv_store(&self.key);
        tracing::trace!(region = self.key.name(), index, "list get");
        read_entry(&store, &self.keys, index)
    }

    /// Overwrite the entry at `index`
    ///
    /// The length is neither checked nor updated: writing at or beyond
    /// `len()` succeeds but the entry stays outside the logical list until
    /// pushes catch up. Use `set_checked` to refuse such writes.
    pub fn set(&self, ctx: &mut Context<'_>, index: i64, value: &T) -> Result<()> {
        check_index(index)?;
        let mut store = ctx.kv_store(&self.key);
        tracing::trace!(region = self.key.name(), index, "list set");
        write_entry(&mut store, &self.keys, index, value)
    }

    /// Like `set`, but fails with `SeqError::InvalidIndex` unless
    /// `0 <= index < len()`
    pub fn set_checked(&self, ctx: &mut Context<'_>, index: i64, value: &T) -> Result<()> {
        check_index(index)?;
        let mut store = ctx.kv_store(&self.key);
        if index >= self.load_len(&mut store)? {
            return Err(SeqError::InvalidIndex(index));
        }
        write_entry(&mut store, &self.keys, index, value)
    }

    /// Append `value` as the new last element
    pub fn push(&self, ctx: &mut Context<'_>, value: &T) -> Result<()> {
        let mut store = ctx.kv_store(&self.key);
        let len = self.load_len(&mut store)?;
        let new_len = next_position(len, "list length")?;

        write_entry(&mut store, &self.keys, len, value)?;
        store_sentinel(&mut store, &self.keys, &new_len)?;

        tracing::trace!(region = self.key.name(), index = len, "list push");
        Ok(())
    }

    /// Visit `(index, record)` for every index in `[0, len())`, ascending
    ///
    /// The length is read once up front, so growth after the call starts
    /// is not observed.
    pub fn iterate<F>(&self, ctx: &mut Context<'_>, mut f: F) -> Result<()>
    where
        F: FnMut(i64, T),
    {
        let mut store = ctx.kv_store(&self.key);
        let len = self.load_len(&mut store)?;
        for index in 0..len {
            let value = read_entry(&store, &self.keys, index)?;
            f(index, value);
        }
        Ok(())
    }

    fn load_len<S: KvStore + ?Sized>(&self, store: &mut S) -> Result<i64> {
        let (len, initialized) = load_sentinel(store, &self.keys, 0i64)?;
        if initialized {
            tracing::debug!(region = self.key.name(), "initialized list length");
        }
        if len < 0 {
            tracing::warn!(region = self.key.name(), len, "negative list length");
            return Err(SeqError::CorruptState(format!(
                "list '{}' has negative length {}",
                self.key.name(),
                len
            )));
        }
        Ok(len)
    }
}

impl<T, C: Codec + fmt::Debug> fmt::Debug for ListMapper<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListMapper")
            .field("key", &self.key)
            .field("codec", self.keys.codec())
            .finish()
    }
}
