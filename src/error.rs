//! Error types for kvseq
//!
//! Provides a unified error type for mapper and store operations.

use thiserror::Error;

/// Result type alias using SeqError
pub type Result<T> = std::result::Result<T, SeqError>;

/// Unified error type for kvseq operations
#[derive(Debug, Error)]
pub enum SeqError {
    // -------------------------------------------------------------------------
    // Mapper Errors
    // -------------------------------------------------------------------------
    #[error("Invalid index: {0}")]
    InvalidIndex(i64),

    #[error("Queue is empty")]
    EmptyQueue,

    #[error("Corrupt sequence state: {0}")]
    CorruptState(String),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Decode error: {0}")]
    Decode(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("WAL corruption detected: {0}")]
    WalCorruption(String),

    #[error("Storage error: {0}")]
    Storage(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
