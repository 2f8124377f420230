//! WAL Recovery
//!
//! Handles crash recovery by replaying the WAL.

use std::fs::{self, OpenOptions};
use std::path::Path;

use super::{WalEntry, HEADER_SIZE};
use crate::error::{Result, SeqError};

/// Handles WAL recovery after crash
pub struct WalRecovery;

/// Result of a recovery operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryResult {
    /// Number of entries successfully recovered
    pub entries_recovered: u64,

    /// Number of corrupted entries found (recovery stops at the first one)
    pub entries_corrupted: u64,

    /// Last valid LSN (0 if none)
    pub last_lsn: u64,

    /// Whether bytes past the last valid entry were (or would be) removed
    pub was_truncated: bool,

    /// Length of the valid prefix of the file in bytes
    pub valid_len: u64,
}

impl WalRecovery {
    /// Recover entries from a WAL file
    ///
    /// This will:
    /// 1. Read all valid entries
    /// 2. Stop at the first torn, corrupted or out-of-order entry
    /// 3. Truncate the file after the last valid entry
    /// 4. Return all valid entries in order
    ///
    /// A missing file recovers as an empty log.
    pub fn recover(path: &Path) -> Result<(Vec<WalEntry>, RecoveryResult)> {
        if !path.exists() {
            return Ok((Vec::new(), RecoveryResult::default()));
        }

        let bytes = fs::read(path)?;
        let (entries, result) = Self::scan(&bytes);

        if result.was_truncated {
            tracing::warn!(
                "Truncating WAL {} from {} to {} bytes ({} corrupted entries)",
                path.display(),
                bytes.len(),
                result.valid_len,
                result.entries_corrupted
            );
            let file = OpenOptions::new().write(true).open(path)?;
            file.set_len(result.valid_len)?;
            file.sync_all()?;
        }

        Ok((entries, result))
    }

    /// Verify integrity of a WAL file without modifying it
    pub fn verify(path: &Path) -> Result<RecoveryResult> {
        let bytes = fs::read(path)?;
        let (_, result) = Self::scan(&bytes);
        Ok(result)
    }

    /// Walk the log, collecting every entry up to the first bad one
    fn scan(bytes: &[u8]) -> (Vec<WalEntry>, RecoveryResult) {
        let mut entries = Vec::new();
        let mut result = RecoveryResult::default();
        let mut offset = 0usize;

        while offset < bytes.len() {
            let remaining = &bytes[offset..];
            if remaining.len() < HEADER_SIZE {
                // Torn header from a partial write
                break;
            }

            let lsn = u64::from_be_bytes(read_array(&remaining[0..8]));
            let crc = u32::from_be_bytes(read_array(&remaining[8..12]));
            let len = u32::from_be_bytes(read_array(&remaining[12..16])) as usize;

            if remaining.len() - HEADER_SIZE < len {
                // Torn payload
                break;
            }

            let data = &remaining[HEADER_SIZE..HEADER_SIZE + len];
            let entry = match WalEntry::decode_payload(lsn, crc, data) {
                Ok(entry) if entry.lsn > result.last_lsn => entry,
                Ok(entry) => {
                    tracing::warn!(
                        "{}",
                        SeqError::WalCorruption(format!(
                            "LSN {} does not follow {}",
                            entry.lsn, result.last_lsn
                        ))
                    );
                    result.entries_corrupted += 1;
                    break;
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    result.entries_corrupted += 1;
                    break;
                }
            };

            result.last_lsn = entry.lsn;
            result.entries_recovered += 1;
            entries.push(entry);
            offset += HEADER_SIZE + len;
        }

        result.valid_len = offset as u64;
        result.was_truncated = offset < bytes.len();
        (entries, result)
    }
}

fn read_array<const N: usize>(slice: &[u8]) -> [u8; N] {
    let mut buf = [0u8; N];
    buf.copy_from_slice(slice);
    buf
}
