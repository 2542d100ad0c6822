//! Binary Canonical Serialization (BCS).
//!
//! BCS is the byte format the Aptos validators hash and sign. Every value has
//! exactly one valid encoding, so the decoder is strict: it rejects anything
//! that the encoder would not have produced.
//!
//! | Value | Encoding |
//! |---|---|
//! | `bool` | one byte, `0x00` or `0x01` |
//! | `u8`..`u256` | fixed-width little-endian |
//! | length / enum tag | ULEB128, minimal form, at most 32 bits |
//! | `bytes`, `String` | ULEB128 length followed by the raw bytes |
//! | sequence | ULEB128 count followed by each element |
//! | map | ULEB128 count followed by the entries sorted by encoded key |
//! | option | `0x00`, or `0x01` followed by the value |
//! | struct | fields in declaration order, no framing |
//!
//! # Example
//!
//! ```rust
//! use aptos_txn_core::bcs;
//!
//! let bytes = bcs::to_bytes(&vec![1u16, 2, 3]).unwrap();
//! assert_eq!(bytes, vec![3, 1, 0, 2, 0, 3, 0]);
//!
//! let decoded: Vec<u16> = bcs::from_bytes(&bytes).unwrap();
//! assert_eq!(decoded, vec![1, 2, 3]);
//! ```

mod de;
mod error;
mod impls;
mod ser;

pub use de::Deserializer;
pub use error::{BcsError, BcsResult};
pub use ser::Serializer;

use crate::error::AptosResult;

/// Largest sequence length the codec will encode or decode.
pub const MAX_SEQUENCE_LENGTH: usize = (1 << 31) - 1;

/// Deepest nesting the decoder accepts for recursive values such as type tags.
pub const MAX_CONTAINER_DEPTH: usize = 500;

/// Longest ULEB128 encoding of a 32-bit value.
pub const ULEB128_MAX_BYTES: usize = 5;

/// A value with a canonical BCS encoding.
pub trait Serializable {
    /// Appends the encoding of `self` to the serializer.
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()>;
}

/// A value that can be rebuilt from its BCS encoding.
pub trait Deserializable: Sized {
    /// Reads one value from the deserializer, advancing its cursor.
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self>;
}

/// Encodes a value into a fresh buffer.
pub fn to_bytes<T: Serializable + ?Sized>(value: &T) -> AptosResult<Vec<u8>> {
    let mut serializer = Serializer::new();
    value.serialize(&mut serializer)?;
    Ok(serializer.into_bytes())
}

/// Decodes a value, failing if any input is left over.
pub fn from_bytes<T: Deserializable>(bytes: &[u8]) -> AptosResult<T> {
    let mut deserializer = Deserializer::new(bytes);
    let value = T::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(value)
}
