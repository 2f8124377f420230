//! Queue mapper
//!
//! FIFO queue of `T` records addressed by absolute position.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{load_sentinel, next_position, read_entry, store_sentinel, write_entry};
use crate::encoding::{BincodeCodec, Codec, KeyEncoder};
use crate::error::{Result, SeqError};
use crate::store::{Context, KvStore, StoreKey};

/// Live range `[begin, end)` of a queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cursor {
    pub begin: i64,
    pub end: i64,
}

impl Cursor {
    pub fn new(begin: i64, end: i64) -> Self {
        Self { begin, end }
    }

    /// Check `0 <= begin <= end`
    pub fn validate(&self) -> Result<()> {
        if self.begin < 0 || self.end < 0 || self.end < self.begin {
            return Err(SeqError::CorruptState(format!(
                "invalid queue cursor [{}, {})",
                self.begin, self.end
            )));
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    pub fn len(&self) -> i64 {
        self.end - self.begin
    }
}

/// A FIFO queue of `T` stored in one region
///
/// State machine over the cursor, starting at `(0, 0)`:
/// - `push`: `end += 1`
/// - `pop`: `begin += 1` (non-empty queues only)
/// - `drain`: `begin = end`
pub struct QueueMapper<T, C = BincodeCodec> {
    key: StoreKey,
    keys: KeyEncoder<C>,
    _record: PhantomData<fn() -> T>,
}

impl<T> QueueMapper<T, BincodeCodec>
where
    T: Serialize + DeserializeOwned,
{
    /// Queue over `key` using the default bincode codec
    pub fn with_bincode(key: StoreKey) -> Result<Self> {
        Self::new(BincodeCodec, key)
    }
}

impl<T, C> QueueMapper<T, C>
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

    pub fn store_key(&self) -> &StoreKey {
        &self.key
    }

    /// Load and validate the cursor, writing `(0, 0)` on first use
    pub fn cursor(&self, ctx: &mut Context<'_>) -> Result<Cursor> {
        let mut store = ctx.kv_store(&self.key);
        self.load_cursor(&mut store)
    }

    /// Write the empty cursor if the queue has never been touched
    pub fn ensure_initialized(&self, ctx: &mut Context<'_>) -> Result<()> {
        self.cursor(ctx).map(|_| ())
    }

    /// Number of queued elements
    pub fn len(&self, ctx: &mut Context<'_>) -> Result<i64> {
        Ok(self.cursor(ctx)?.len())
    }

    pub fn is_empty(&self, ctx: &mut Context<'_>) -> Result<bool> {
        Ok(self.cursor(ctx)?.is_empty())
    }

    /// Enqueue `value` at the back
    pub fn push(&self, ctx: &mut Context<'_>, value: &T) -> Result<()> {
        let mut store = ctx.kv_store(&self.key);
        let mut cursor = self.load_cursor(&mut store)?;
        let end = next_position(cursor.end, "queue end")?;

        write_entry(&mut store, &self.keys, cursor.end, value)?;
        cursor.end = end;
        store_sentinel(&mut store, &self.keys, &cursor)?;

        tracing::trace!(
            region = self.key.name(),
            begin = cursor.begin,
            end = cursor.end,
            "queue push"
        );
        Ok(())
    }

    /// Decode the front element without removing it
    ///
    /// Fails with `SeqError::EmptyQueue` when nothing is queued.
    pub fn peek(&self, ctx: &mut Context<'_>) -> Result<T> {
        let mut store = ctx.kv_store(&self.key);
        let cursor = self.load_cursor(&mut store)?;
        if cursor.is_empty() {
            return Err(SeqError::EmptyQueue);
        }
        read_entry(&store, &self.keys, cursor.begin)
    }

    /// Remove the front element without decoding it
    ///
    /// Fails with `SeqError::EmptyQueue` when nothing is queued, leaving the
    /// cursor untouched.
    ///
    /// The advanced cursor is stored before the old entry is deleted, so an
    /// interrupted pop can leave an unreachable entry but never a cursor
    /// pointing at a missing one.
    pub fn pop(&self, ctx: &mut Context<'_>) -> Result<()> {
        let mut store = ctx.kv_store(&self.key);
        let mut cursor = self.load_cursor(&mut store)?;
        if cursor.is_empty() {
            return Err(SeqError::EmptyQueue);
        }

        let front = self.keys.index(cursor.begin)?;
        cursor.begin += 1;
        store_sentinel(&mut store, &self.keys, &cursor)?;
        store.delete(&front)?;

        tracing::trace!(
            region = self.key.name(),
            begin = cursor.begin,
            end = cursor.end,
            "queue pop"
        );
        Ok(())
    }

    /// Visit every queued element in FIFO order, then empty the queue
    ///
    /// The cursor is advanced to `begin = end` only after all elements have
    /// been decoded and visited; if any entry fails to decode the queue is
    /// left as it was.
    pub fn drain<F>(&self, ctx: &mut Context<'_>, mut f: F) -> Result<()>
    where
        F: FnMut(T),
    {
        let mut store = ctx.kv_store(&self.key);
        let mut cursor = self.load_cursor(&mut store)?;

        for position in cursor.begin..cursor.end {
            let value = read_entry(&store, &self.keys, position)?;
            f(value);
        }

        let drained = cursor.len();
        cursor.begin = cursor.end;
        store_sentinel(&mut store, &self.keys, &cursor)?;

        tracing::debug!(
            region = self.key.name(),
            drained,
            end = cursor.end,
            "queue drained"
        );
        Ok(())
    }

    /// Visit `(position, record)` for every queued element without removing
    /// anything
    pub fn for_each_pending<F>(&self, ctx: &mut Context<'_>, mut f: F) -> Result<()>
    where
        F: FnMut(i64, T),
    {
        let mut store = ctx.kv_store(&self.key);
        let cursor = self.load_cursor(&mut store)?;
        for position in cursor.begin..cursor.end {
            let value = read_entry(&store, &self.keys, position)?;
            f(position, value);
        }
        Ok(())
    }

    fn load_cursor<S: KvStore + ?Sized>(&self, store: &mut S) -> Result<Cursor> {
        let (cursor, initialized) = load_sentinel(store, &self.keys, Cursor::default())?;
        if initialized {
            tracing::debug!(region = self.key.name(), "initialized queue cursor");
        }
        if let Err(e) = cursor.validate() {
            tracing::warn!(region = self.key.name(), "{}", e);
            return Err(e);
        }
        Ok(cursor)
    }
}

impl<T, C: Codec + fmt::Debug> fmt::Debug for QueueMapper<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueMapper")
            .field("key", &self.key)
            .field("codec", self.keys.codec())
            .finish()
    }
}
