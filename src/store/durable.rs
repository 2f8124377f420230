//! Durable store
//!
//! `MemStore` state rebuilt from a write-ahead log on every open.

use std::fs;
use std::path::{Path, PathBuf};

use super::{KvStore, MemStore};
use crate::config::{Config, WalSyncStrategy};
use crate::error::Result;
use crate::wal::{Operation, WalRecovery, WalWriter};

/// A key-value store that survives restarts
///
/// Every `set`/`delete` is appended to the WAL before the in-memory map is
/// touched. On open the WAL is recovered and replayed, so the map always
/// reflects the longest valid prefix of the log.
pub struct DurableStore {
    config: Config,
    wal_path: PathBuf,
    wal: WalWriter,
    data: MemStore,
}

impl DurableStore {
    const WAL_FILENAME: &'static str = "store.wal";
    const COMPACT_SUFFIX: &'static str = "compact";

    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Validate config and create the data directory
    /// 2. Recover the WAL, truncating any torn tail
    /// 3. Replay recovered operations into memory
    /// 4. Continue appending after the last valid LSN
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(&config.data_dir)?;

        let wal_path = config.data_dir.join(Self::WAL_FILENAME);
        let (entries, recovery) = WalRecovery::recover(&wal_path)?;

        if recovery.entries_recovered > 0 || recovery.entries_corrupted > 0 {
            tracing::info!(
                "WAL recovery: {} entries recovered, {} corrupted, last_lsn={}",
                recovery.entries_recovered,
                recovery.entries_corrupted,
                recovery.last_lsn
            );
        }

        let mut data = MemStore::new();
        for entry in entries {
            match entry.operation {
                Operation::Put { key, value } => data.set(&key, &value)?,
                Operation::Delete { key } => data.delete(&key)?,
            }
        }

        let wal = WalWriter::open(&wal_path, config.wal_sync_strategy, recovery.last_lsn + 1)?;

        Ok(Self {
            config,
            wal_path,
            wal,
            data,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    /// Force sync of the WAL to disk
    pub fn sync(&mut self) -> Result<()> {
        self.wal.sync()
    }

    /// Rewrite the WAL as one `Put` per live key
    ///
    /// The compacted log is written and synced beside the live one, then
    /// renamed over it. The writer that built it stays open and becomes the
    /// live writer, so nothing has to be reopened after the rename.
    pub fn compact(&mut self) -> Result<()> {
        self.wal.sync()?;

        let tmp_path = self.wal_path.with_extension(Self::COMPACT_SUFFIX);
        if tmp_path.exists() {
            fs::remove_file(&tmp_path)?;
        }

        let batch = WalSyncStrategy::EveryNEntries { count: usize::MAX };
        let mut compacted = WalWriter::open(&tmp_path, batch, 1)?;
        for (key, value) in self.data.iter() {
            compacted.append(Operation::Put {
                key: key.clone(),
                value: value.clone(),
            })?;
        }
        compacted.sync()?;
        compacted.set_sync_strategy(self.config.wal_sync_strategy);

        fs::rename(&tmp_path, &self.wal_path)?;
        self.wal = compacted;
        sync_dir(&self.config.data_dir)?;

        tracing::info!(
            "Compacted WAL {} to {} entries",
            self.wal_path.display(),
            self.wal.current_lsn()
        );
        Ok(())
    }

    /// Close the store gracefully, syncing the WAL
    pub fn close(mut self) -> Result<()> {
        self.wal.sync()
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the WAL file path
    pub fn wal_path(&self) -> &Path {
        &self.wal_path
    }

    /// LSN of the last logged operation
    pub fn current_lsn(&self) -> u64 {
        self.wal.current_lsn()
    }

    /// The materialized key-value state
    pub fn data(&self) -> &MemStore {
        &self.data
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Persist a rename inside `dir`
#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    fs::File::open(dir)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}

impl KvStore for DurableStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.data.get(key)
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.wal.append(Operation::Put {
            key: key.to_vec(),
            value: value.to_vec(),
        })?;
        self.data.set(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        if !self.data.contains_key(key) {
            return Ok(());
        }
        self.wal.append(Operation::Delete { key: key.to_vec() })?;
        self.data.delete(key)
    }
}
