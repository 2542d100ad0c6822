//! Chain ID type.
//!
//! Every transaction names the network it is meant for, so a signature made
//! for one network cannot be replayed on another.

use crate::bcs::{Deserializable, Deserializer, Serializable, Serializer};
use crate::error::AptosResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A chain identifier for an Aptos network.
///
/// Known values: mainnet 1, testnet 2, local testnet 4.
///
/// ```rust
/// use aptos_txn_core::types::ChainId;
///
/// assert_eq!(ChainId::mainnet().id(), 1);
/// assert_eq!(ChainId::new(42).id(), 42);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(u8);

impl ChainId {
    /// Creates a new chain ID.
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Returns the chain ID for mainnet (1).
    pub const fn mainnet() -> Self {
        Self(1)
    }

    /// Returns the chain ID for testnet (2).
    pub const fn testnet() -> Self {
        Self(2)
    }

    /// Returns the chain ID of a local test network (4).
    pub const fn localnet() -> Self {
        Self(4)
    }

    /// Returns the numeric chain ID value.
    pub const fn id(&self) -> u8 {
        self.0
    }

    /// Returns true if this is the mainnet chain ID.
    pub const fn is_mainnet(&self) -> bool {
        self.0 == 1
    }
}

impl fmt::Debug for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainId({})", self.0)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for ChainId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u8 {
    fn from(chain_id: ChainId) -> Self {
        chain_id.0
    }
}

impl Serializable for ChainId {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.serialize_u8(self.0);
        Ok(())
    }
}

impl Deserializable for ChainId {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self(deserializer.read_u8()?))
    }
}
