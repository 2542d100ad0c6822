//! Core Aptos types.
//!
//! Addresses, chain IDs, hash values and Move type tags: the leaf values
//! every transaction is assembled from.

mod address;
mod chain_id;
mod hash;
mod move_types;
mod u256;

pub use address::{AccountAddress, ADDRESS_LENGTH};
pub use chain_id::ChainId;
pub use hash::{HashValue, HASH_LENGTH};
pub use move_types::{Identifier, ModuleId, StructTag, TypeTag};
pub use u256::U256;
