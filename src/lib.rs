//! # kvseq
//!
//! Typed ordered collections on top of a byte-oriented key-value store:
//! - `ListMapper`: random-access list with an append-grown length
//! - `QueueMapper`: FIFO queue with a `(begin, end)` cursor
//! - Pluggable codec (`BincodeCodec` by default) for keys and records
//! - In-memory and WAL-backed durable store backends
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              ListMapper<T>   /   QueueMapper<T>              │
//! │        (stateless: every call reloads length/cursor)         │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │                              │
//!                ▼                              ▼
//!        ┌──────────────┐              ┌─────────────────┐
//!        │  KeyEncoder  │              │ Context         │
//!        │  + Codec     │              │  └ PrefixStore  │
//!        └──────────────┘              └────────┬────────┘
//!                                               │
//!                                ┌──────────────┴─────────────┐
//!                                ▼                            ▼
//!                        ┌─────────────┐             ┌──────────────┐
//!                        │  MemStore   │             │ DurableStore │
//!                        │ (BTreeMap)  │             │ (WAL + map)  │
//!                        └─────────────┘             └──────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use kvseq::{Context, ListMapper, MemStore, StoreKey};
//!
//! let mut store = MemStore::new();
//! let mut ctx = Context::new(&mut store);
//! let list = ListMapper::<u32>::with_bincode(StoreKey::new("numbers")).unwrap();
//!
//! list.push(&mut ctx, &7).unwrap();
//! assert_eq!(list.len(&mut ctx).unwrap(), 1);
//! assert_eq!(list.get(&mut ctx, 0).unwrap(), 7);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod encoding;
pub mod mapper;
pub mod store;
pub mod wal;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::Config;
pub use encoding::{BincodeCodec, Codec, KeyEncoder};
pub use error::{Result, SeqError};
pub use mapper::{Cursor, ListMapper, QueueMapper};
pub use store::{Context, DurableStore, KvStore, MemStore, StoreKey};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kvseq
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
