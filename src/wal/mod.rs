//! Write-Ahead Log (WAL) Module
//!
//! Provides durability for `DurableStore` through append-only logging.
//!
//! ## Responsibilities
//! - Append log entries before any mutation of the in-memory state
//! - CRC32 checksums for corruption detection
//! - Log Sequence Numbers (LSN) for ordering
//! - Crash recovery and replay
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Entry 1                                 │
//! │ ┌─────────┬─────────┬────────┬────────┐ │
//! │ │ LSN (8) │ CRC (4) │Len (4) │ Data   │ │
//! │ └─────────┴─────────┴────────┴────────┘ │
//! ├─────────────────────────────────────────┤
//! │ Entry 2                                 │
//! │ ┌─────────┬─────────┬────────┬────────┐ │
//! │ │ LSN (8) │ CRC (4) │Len (4) │ Data   │ │
//! │ └─────────┴─────────┴────────┴────────┘ │
//! └─────────────────────────────────────────┘
//! ```
//! All header fields are big-endian. The CRC covers the LSN bytes and the
//! data; the data is the bincode encoding of an `Operation`.

mod entry;
mod recovery;
mod writer;

pub use entry::{Operation, WalEntry, HEADER_SIZE};
pub use recovery::{RecoveryResult, WalRecovery};
pub use writer::{WalSink, WalWriter};
