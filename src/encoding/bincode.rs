//! Bincode codec
//!
//! Fixed-width little-endian integers, trailing bytes rejected.

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::Codec;
use crate::error::{Result, SeqError};

/// Default codec backed by bincode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BincodeCodec;

impl BincodeCodec {
    pub fn new() -> Self {
        Self
    }

    fn options() -> impl Options {
        bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .reject_trailing_bytes()
    }
}

impl Codec for BincodeCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        Self::options()
            .serialize(value)
            .map_err(|e| SeqError::Encode(format!("Serialization failed: {}", e)))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        Self::options()
            .deserialize(bytes)
            .map_err(|e| SeqError::Decode(format!("Deserialization failed: {}", e)))
    }
}
