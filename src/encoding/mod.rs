//! Encoding Module
//!
//! Turns records and indices into bytes for the underlying store.
//!
//! ## Responsibilities
//! - `Codec`: marshal/unmarshal a statically typed value to/from bytes
//! - `KeyEncoder`: derive store keys from integer indices with the same codec
//!
//! Keys and the length/cursor payloads share one codec, so the sentinel key
//! and every index key come out of the same deterministic scheme.

mod bincode;
mod key;

pub use self::bincode::BincodeCodec;
pub use key::{KeyEncoder, SENTINEL_INDEX};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Binary marshalling of typed values
///
/// Implementations must be deterministic: encoding the same value twice
/// yields the same bytes, and distinct values of one type never share an
/// encoding. Store keys rely on both properties.
pub trait Codec {
    /// Encode a value, failing with `SeqError::Encode`
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>>;

    /// Decode a value, failing with `SeqError::Decode`
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;
}
