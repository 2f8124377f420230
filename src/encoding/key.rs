//! Key encoder
//!
//! Maps integer positions to store keys.

use super::Codec;
use crate::error::Result;

/// Reserved index whose key holds a list length or a queue cursor
pub const SENTINEL_INDEX: i64 = -1;

/// Derives store keys from `i64` positions through a codec
///
/// The sentinel key is encoded once at construction. Index keys are
/// encoded on every call; nothing else is cached.
#[derive(Debug, Clone)]
pub struct KeyEncoder<C> {
    codec: C,
    sentinel: Vec<u8>,
}

impl<C: Codec> KeyEncoder<C> {
    /// Build an encoder, encoding the sentinel key up front
    pub fn new(codec: C) -> Result<Self> {
        let sentinel = codec.encode(&SENTINEL_INDEX)?;
        Ok(Self { codec, sentinel })
    }

    /// Key of the length/cursor record
    pub fn sentinel(&self) -> &[u8] {
        &self.sentinel
    }

    /// Key of the entry at `index`
    pub fn index(&self, index: i64) -> Result<Vec<u8>> {
        self.codec.encode(&index)
    }

    /// The codec shared by keys and payloads
    pub fn codec(&self) -> &C {
        &self.codec
    }
}
