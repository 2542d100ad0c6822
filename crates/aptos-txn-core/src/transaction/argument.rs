//! Script arguments.

use crate::bcs::{BcsError, Deserializable, Deserializer, Serializable, Serializer};
use crate::error::AptosResult;
use crate::types::{AccountAddress, U256};

/// An argument passed to a script payload.
///
/// Wire tags: U8=0, U64=1, U128=2, Address=3, U8Vector=4, Bool=5, U16=6,
/// U32=7, U256=8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionArgument {
    /// A u8 value.
    U8(u8),
    /// A u64 value.
    U64(u64),
    /// A u128 value.
    U128(u128),
    /// An address value.
    Address(AccountAddress),
    /// A byte vector.
    U8Vector(Vec<u8>),
    /// A boolean value.
    Bool(bool),
    /// A u16 value.
    U16(u16),
    /// A u32 value.
    U32(u32),
    /// A u256 value.
    U256(U256),
}

impl TransactionArgument {
    fn variant_index(&self) -> u32 {
        match self {
            TransactionArgument::U8(_) => 0,
            TransactionArgument::U64(_) => 1,
            TransactionArgument::U128(_) => 2,
            TransactionArgument::Address(_) => 3,
            TransactionArgument::U8Vector(_) => 4,
            TransactionArgument::Bool(_) => 5,
            TransactionArgument::U16(_) => 6,
            TransactionArgument::U32(_) => 7,
            TransactionArgument::U256(_) => 8,
        }
    }
}

impl Serializable for TransactionArgument {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.serialize_variant_index(self.variant_index());
        match self {
            TransactionArgument::U8(v) => serializer.serialize_u8(*v),
            TransactionArgument::U64(v) => serializer.serialize_u64(*v),
            TransactionArgument::U128(v) => serializer.serialize_u128(*v),
            TransactionArgument::Address(addr) => addr.serialize(serializer)?,
            TransactionArgument::U8Vector(bytes) => serializer.serialize_bytes(bytes)?,
            TransactionArgument::Bool(v) => serializer.serialize_bool(*v),
            TransactionArgument::U16(v) => serializer.serialize_u16(*v),
            TransactionArgument::U32(v) => serializer.serialize_u32(*v),
            TransactionArgument::U256(v) => v.serialize(serializer)?,
        }
        Ok(())
    }
}

impl Deserializable for TransactionArgument {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        let argument = match deserializer.read_variant_index()? {
            0 => TransactionArgument::U8(deserializer.read_u8()?),
            1 => TransactionArgument::U64(deserializer.read_u64()?),
            2 => TransactionArgument::U128(deserializer.read_u128()?),
            3 => TransactionArgument::Address(AccountAddress::deserialize(deserializer)?),
            4 => TransactionArgument::U8Vector(deserializer.read_bytes()?),
            5 => TransactionArgument::Bool(deserializer.read_bool()?),
            6 => TransactionArgument::U16(deserializer.read_u16()?),
            7 => TransactionArgument::U32(deserializer.read_u32()?),
            8 => TransactionArgument::U256(U256::deserialize(deserializer)?),
            index => {
                return Err(BcsError::InvalidVariant {
                    type_name: "TransactionArgument",
                    index,
                }
                .into())
            }
        };
        Ok(argument)
    }
}

impl From<u8> for TransactionArgument {
    fn from(v: u8) -> Self {
        TransactionArgument::U8(v)
    }
}

impl From<u16> for TransactionArgument {
    fn from(v: u16) -> Self {
        TransactionArgument::U16(v)
    }
}

impl From<u32> for TransactionArgument {
    fn from(v: u32) -> Self {
        TransactionArgument::U32(v)
    }
}

impl From<u64> for TransactionArgument {
    fn from(v: u64) -> Self {
        TransactionArgument::U64(v)
    }
}

impl From<u128> for TransactionArgument {
    fn from(v: u128) -> Self {
        TransactionArgument::U128(v)
    }
}

impl From<U256> for TransactionArgument {
    fn from(v: U256) -> Self {
        TransactionArgument::U256(v)
    }
}

impl From<bool> for TransactionArgument {
    fn from(v: bool) -> Self {
        TransactionArgument::Bool(v)
    }
}

impl From<AccountAddress> for TransactionArgument {
    fn from(v: AccountAddress) -> Self {
        TransactionArgument::Address(v)
    }
}

impl From<Vec<u8>> for TransactionArgument {
    fn from(v: Vec<u8>) -> Self {
        TransactionArgument::U8Vector(v)
    }
}
