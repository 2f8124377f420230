//! WAL Entry definitions
//!
//! Defines the structure of individual WAL log entries.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeqError};

/// Header size: LSN (8) + CRC (4) + payload length (4)
pub const HEADER_SIZE: usize = 16;

/// A single entry in the WAL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalEntry {
    /// Log Sequence Number - strictly increasing within a log file
    pub lsn: u64,

    /// The operation to replay
    pub operation: Operation,
}

/// Operations that can be logged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Put a key-value pair
    Put { key: Vec<u8>, value: Vec<u8> },

    /// Delete a key
    Delete { key: Vec<u8> },
}

impl WalEntry {
    pub fn new(lsn: u64, operation: Operation) -> Self {
        Self { lsn, operation }
    }

    /// Encode header + payload
    pub fn encode(&self) -> Result<Vec<u8>> {
        let data = bincode::serialize(&self.operation)
            .map_err(|e| SeqError::Encode(format!("WAL operation: {}", e)))?;
        let crc = Self::compute_crc(self.lsn, &data);

        let mut bytes = Vec::with_capacity(HEADER_SIZE + data.len());
        bytes.extend_from_slice(&self.lsn.to_be_bytes());
        bytes.extend_from_slice(&crc.to_be_bytes());
        bytes.extend_from_slice(&(data.len() as u32).to_be_bytes());
        bytes.extend_from_slice(&data);
        Ok(bytes)
    }

    /// Decode the payload of an entry whose header has already been parsed
    ///
    /// Fails with `WalCorruption` when the checksum does not match or the
    /// payload is not a valid operation.
    pub fn decode_payload(lsn: u64, crc: u32, data: &[u8]) -> Result<Self> {
        let actual = Self::compute_crc(lsn, data);
        if actual != crc {
            return Err(SeqError::WalCorruption(format!(
                "CRC mismatch at LSN {}: stored 0x{:08x}, computed 0x{:08x}",
                lsn, crc, actual
            )));
        }

        let operation = bincode::deserialize(data).map_err(|e| {
            SeqError::WalCorruption(format!("Undecodable operation at LSN {}: {}", lsn, e))
        })?;

        Ok(Self { lsn, operation })
    }

    /// CRC32 over the LSN bytes followed by the payload
    pub fn compute_crc(lsn: u64, data: &[u8]) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&lsn.to_be_bytes());
        hasher.update(data);
        hasher.finalize()
    }
}
