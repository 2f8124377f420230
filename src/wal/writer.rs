//! WAL Writer
//!
//! Handles appending entries to the WAL file.
//!
//! Each entry is encoded in full and handed to the sink in one `write_all`,
//! so no bytes are held back in userspace. A failed append rolls the sink
//! back to the end of the last good entry; if that rollback fails too, the
//! writer refuses all further work.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use super::{Operation, WalEntry};
use crate::config::WalSyncStrategy;
use crate::error::{Result, SeqError};

/// Destination of WAL bytes
pub trait WalSink: Write {
    /// Make written bytes durable
    fn sync_data(&mut self) -> io::Result<()>;

    /// Cut the sink back to `len` bytes
    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

impl WalSink for File {
    fn sync_data(&mut self) -> io::Result<()> {
        File::sync_data(self)
    }

    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

/// Writes entries to the WAL file
pub struct WalWriter<F: WalSink = File> {
    sink: F,

    /// LSN assigned to the next appended entry
    next_lsn: u64,

    sync_strategy: WalSyncStrategy,

    /// Entries written since the last fsync
    unsynced: usize,

    /// Sink length after the last successful append
    len: u64,

    /// Set once the sink is in an unknown state
    poisoned: bool,
}

impl WalWriter<File> {
    /// Open or create a WAL file for appending
    ///
    /// `next_lsn` continues the sequence found by recovery (1 for a new log).
    pub fn open(path: &Path, sync_strategy: WalSyncStrategy, next_lsn: u64) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let len = file.metadata()?.len();
        Ok(Self::from_sink(file, sync_strategy, next_lsn, len))
    }
}

impl<F: WalSink> WalWriter<F> {
    /// Wrap a sink that currently holds `len` bytes of valid log
    pub fn from_sink(sink: F, sync_strategy: WalSyncStrategy, next_lsn: u64, len: u64) -> Self {
        Self {
            sink,
            next_lsn: next_lsn.max(1),
            sync_strategy,
            unsynced: 0,
            len,
            poisoned: false,
        }
    }

    /// Append an operation, returning its LSN
    ///
    /// On failure nothing of the entry remains in the sink and the LSN is
    /// not consumed. A failed fsync poisons the writer, since the kernel may
    /// already have dropped the dirty pages.
    pub fn append(&mut self, operation: Operation) -> Result<u64> {
        self.check_poisoned()?;

        let lsn = self.next_lsn;
        let bytes = WalEntry::new(lsn, operation).encode()?;

        if let Err(e) = self.sink.write_all(&bytes).and_then(|_| self.sink.flush()) {
            self.rollback(lsn);
            return Err(e.into());
        }

        let due = match self.sync_strategy {
            WalSyncStrategy::EveryWrite => true,
            WalSyncStrategy::EveryNEntries { count } => self.unsynced + 1 >= count,
        };
        if due {
            if let Err(e) = self.sink.sync_data() {
                self.rollback(lsn);
                self.poisoned = true;
                return Err(e.into());
            }
            self.unsynced = 0;
        } else {
            self.unsynced += 1;
        }

        self.len += bytes.len() as u64;
        self.next_lsn += 1;
        Ok(lsn)
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<()> {
        self.check_poisoned()?;
        self.sink.flush()?;
        if let Err(e) = self.sink.sync_data() {
            self.poisoned = true;
            return Err(e.into());
        }
        self.unsynced = 0;
        Ok(())
    }

    /// LSN of the last appended entry (0 if none)
    pub fn current_lsn(&self) -> u64 {
        self.next_lsn - 1
    }

    /// Bytes of valid log in the sink
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    pub fn set_sync_strategy(&mut self, sync_strategy: WalSyncStrategy) {
        self.sync_strategy = sync_strategy;
    }

    pub fn sink(&self) -> &F {
        &self.sink
    }

    fn check_poisoned(&self) -> Result<()> {
        if self.poisoned {
            return Err(SeqError::Storage(
                "WAL writer is unusable after an earlier I/O failure".to_string(),
            ));
        }
        Ok(())
    }

    /// Drop any partial bytes of the entry at `lsn`
    fn rollback(&mut self, lsn: u64) {
        if let Err(e) = self.sink.truncate(self.len) {
            tracing::error!("WAL rollback of LSN {} to {} bytes failed: {}", lsn, self.len, e);
            self.poisoned = true;
        } else {
            tracing::warn!("WAL append of LSN {} failed, rolled back to {} bytes", lsn, self.len);
        }
    }
}
