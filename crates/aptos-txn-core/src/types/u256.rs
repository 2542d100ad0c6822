//! 256-bit unsigned integer as carried in Move values.

use crate::bcs::{Deserializable, Deserializer, Serializable, Serializer};
use crate::error::AptosResult;
use std::fmt;

/// A 256-bit unsigned integer stored as 32 little-endian bytes.
///
/// Only what transaction arguments need is provided: construction from
/// smaller integers or raw bytes, and the BCS encoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct U256([u8; 32]);

impl U256 {
    /// Zero.
    pub const ZERO: Self = Self([0u8; 32]);

    /// The largest value, `2^256 - 1`.
    pub const MAX: Self = Self([0xff; 32]);

    /// Creates a value from 32 little-endian bytes.
    pub const fn from_le_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the 32 little-endian bytes.
    pub const fn to_le_bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl From<u128> for U256 {
    fn from(value: u128) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(&value.to_le_bytes());
        Self(bytes)
    }
}

impl From<u64> for U256 {
    fn from(value: u64) -> Self {
        Self::from(u128::from(value))
    }
}

impl fmt::Debug for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut be = self.0;
        be.reverse();
        write!(f, "U256(0x{})", hex::encode(be))
    }
}

impl Serializable for U256 {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.serialize_u256(&self.0);
        Ok(())
    }
}

impl Deserializable for U256 {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self(deserializer.read_u256()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bcs;

    #[test]
    fn test_little_endian_encoding() {
        let bytes = bcs::to_bytes(&U256::from(0x0102u64)).unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[..3], &[0x02, 0x01, 0x00]);
        assert_eq!(bcs::from_bytes::<U256>(&bytes).unwrap(), U256::from(0x0102u64));
    }

    #[test]
    fn test_debug_is_big_endian_hex() {
        let debug = format!("{:?}", U256::from(1u64));
        assert!(debug.ends_with("01)"));
    }
}
