//! Account address type.
//!
//! Addresses are 32 raw bytes on the wire (no length prefix) and
//! `0x`-prefixed hex in text. Short forms such as `0x1` are left-padded
//! with zeros when parsed.

use crate::bcs::{Deserializable, Deserializer, Serializable, Serializer};
use crate::error::{AptosError, AptosResult};
use std::fmt;
use std::str::FromStr;

/// The length of an account address in bytes.
pub const ADDRESS_LENGTH: usize = 32;

/// A 32-byte Aptos account address.
///
/// # Example
///
/// ```rust
/// use aptos_txn_core::types::AccountAddress;
///
/// let addr: AccountAddress = "0x1".parse().unwrap();
/// assert_eq!(addr, AccountAddress::ONE);
/// assert_eq!(addr.to_short_string(), "0x1");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AccountAddress([u8; ADDRESS_LENGTH]);

impl AccountAddress {
    /// The all-zero address. Also the fee-payer placeholder in sponsored
    /// transactions.
    pub const ZERO: Self = Self([0u8; ADDRESS_LENGTH]);

    /// The core framework address (0x1).
    pub const ONE: Self = Self::special(1);

    /// The token framework address (0x3).
    pub const THREE: Self = Self::special(3);

    /// The fungible asset framework address (0x4).
    pub const FOUR: Self = Self::special(4);

    /// Creates an address from a byte array.
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    const fn special(last: u8) -> Self {
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes[ADDRESS_LENGTH - 1] = last;
        Self(bytes)
    }

    /// Parses an address from hex, with or without a `0x` prefix.
    ///
    /// At least one and at most 64 hex digits are accepted; shorter input is
    /// zero-padded on the left.
    pub fn from_hex(hex_str: &str) -> AptosResult<Self> {
        let digits = hex_str
            .strip_prefix("0x")
            .or_else(|| hex_str.strip_prefix("0X"))
            .unwrap_or(hex_str);

        if digits.is_empty() {
            return Err(AptosError::InvalidAddress(format!(
                "'{hex_str}' contains no hex digits"
            )));
        }
        if digits.len() > ADDRESS_LENGTH * 2 {
            return Err(AptosError::InvalidAddress(format!(
                "'{hex_str}' has {} hex digits, at most {} allowed",
                digits.len(),
                ADDRESS_LENGTH * 2
            )));
        }

        let padded = format!("{digits:0>64}");
        let mut bytes = [0u8; ADDRESS_LENGTH];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|e| AptosError::InvalidAddress(format!("'{hex_str}': {e}")))?;
        Ok(Self(bytes))
    }

    /// Creates an address from a byte slice of exactly 32 bytes.
    pub fn from_bytes<T: AsRef<[u8]>>(bytes: T) -> AptosResult<Self> {
        let bytes = bytes.as_ref();
        let array = <[u8; ADDRESS_LENGTH]>::try_from(bytes).map_err(|_| {
            AptosError::InvalidAddress(format!(
                "expected {ADDRESS_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(array))
    }

    /// Returns the address as a byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the address as a byte array.
    pub fn to_bytes(&self) -> [u8; ADDRESS_LENGTH] {
        self.0
    }

    /// Returns the full 64-digit hex string with `0x` prefix.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Returns the hex string with leading zeros trimmed (`0x1`).
    pub fn to_short_string(&self) -> String {
        let hex = hex::encode(self.0);
        match hex.trim_start_matches('0') {
            "" => "0x0".to_string(),
            trimmed => format!("0x{trimmed}"),
        }
    }

    /// Returns true if this is the zero address.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Returns true for the reserved framework addresses `0x1`..=`0xf`.
    pub fn is_special(&self) -> bool {
        self.0[..ADDRESS_LENGTH - 1].iter().all(|&b| b == 0)
            && (1..16).contains(&self.0[ADDRESS_LENGTH - 1])
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress({})", self.to_short_string())
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for AccountAddress {
    type Err = AptosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; ADDRESS_LENGTH]> for AccountAddress {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for AccountAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serializable for AccountAddress {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.serialize_fixed_bytes(&self.0);
        Ok(())
    }
}

impl Deserializable for AccountAddress {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self(deserializer.read_fixed_array()?))
    }
}

impl serde::Serialize for AccountAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> serde::Deserialize<'de> for AccountAddress {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = <String as serde::Deserialize>::deserialize(deserializer)?;
            Self::from_hex(&s).map_err(serde::de::Error::custom)
        } else {
            let bytes = <Vec<u8> as serde::Deserialize>::deserialize(deserializer)?;
            Self::from_bytes(bytes).map_err(serde::de::Error::custom)
        }
    }
}
