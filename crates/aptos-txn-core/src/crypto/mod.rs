//! Cryptographic primitives for Aptos transactions.
//!
//! Signature schemes carried here:
//!
//! - Ed25519 (the default account scheme)
//! - Multi-Ed25519 (K-of-N threshold over Ed25519 keys)
//! - Secp256k1 ECDSA, through the single-key envelope
//! - Keyless, as opaque data only
//!
//! # Example
//!
//! ```rust
//! use aptos_txn_core::crypto::{Ed25519PrivateKey, Signer, Verifier};
//!
//! let private_key = Ed25519PrivateKey::generate();
//! let signature = Signer::sign(&private_key, b"hello world");
//! assert!(private_key.public_key().verify(b"hello world", &signature));
//! ```

mod ed25519;
mod hash;
mod keyless;
mod multi_ed25519;
mod secp256k1;
mod single_key;
mod traits;

use crate::error::{AptosError, AptosResult};
use crate::types::AccountAddress;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use ed25519::{
    Ed25519PrivateKey, Ed25519PublicKey, Ed25519Signature, ED25519_PRIVATE_KEY_LENGTH,
    ED25519_PUBLIC_KEY_LENGTH, ED25519_SIGNATURE_LENGTH,
};
pub use hash::{sha3_256, sha3_256_of, signing_message};
pub use keyless::{KeylessPublicKey, KeylessSignature, IDC_LENGTH};
pub use multi_ed25519::{
    MultiEd25519PublicKey, MultiEd25519Signature, BITMAP_LENGTH, MAX_NUM_OF_KEYS,
    MIN_NUM_OF_KEYS, MIN_THRESHOLD,
};
pub use secp256k1::{
    Secp256k1PrivateKey, Secp256k1PublicKey, Secp256k1Signature, SECP256K1_PRIVATE_KEY_LENGTH,
    SECP256K1_PUBLIC_KEY_LENGTH, SECP256K1_SIGNATURE_LENGTH,
};
pub use single_key::{AnyPublicKey, AnySignature};
pub use traits::{PublicKey, Signature, Signer, Verifier};

/// Authentication key scheme byte for Ed25519.
pub const ED25519_SCHEME: u8 = 0;
/// Authentication key scheme byte for Multi-Ed25519.
pub const MULTI_ED25519_SCHEME: u8 = 1;
/// Authentication key scheme byte for single-key envelopes.
pub const SINGLE_KEY_SCHEME: u8 = 2;

/// Length of an authentication key in bytes.
pub const AUTHENTICATION_KEY_LENGTH: usize = 32;

/// The key an account is authenticated against: `SHA3-256(key_bytes || scheme)`.
///
/// A freshly created account's address equals its authentication key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthenticationKey([u8; AUTHENTICATION_KEY_LENGTH]);

impl AuthenticationKey {
    /// Wraps raw bytes.
    pub const fn new(bytes: [u8; AUTHENTICATION_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Derives the authentication key of a public key under `scheme`.
    pub fn from_public_key(public_key_bytes: &[u8], scheme: u8) -> Self {
        Self(sha3_256_of([public_key_bytes, &[scheme]]))
    }

    /// Creates an authentication key from a 32-byte slice.
    pub fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        let bytes = <[u8; AUTHENTICATION_KEY_LENGTH]>::try_from(bytes).map_err(|_| {
            AptosError::InvalidAddress(format!(
                "authentication key must be {AUTHENTICATION_KEY_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    /// Creates an authentication key from a hex string.
    pub fn from_hex(hex_str: &str) -> AptosResult<Self> {
        let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        Self::from_bytes(&hex::decode(hex_str)?)
    }

    /// Returns the key bytes.
    pub fn as_bytes(&self) -> &[u8; AUTHENTICATION_KEY_LENGTH] {
        &self.0
    }

    /// Returns a copy of the key bytes.
    pub fn to_bytes(&self) -> [u8; AUTHENTICATION_KEY_LENGTH] {
        self.0
    }

    /// Returns the key as a `0x`-prefixed hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// The address an account created with this key receives.
    pub fn to_address(&self) -> AccountAddress {
        AccountAddress::new(self.0)
    }
}

impl fmt::Debug for AuthenticationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthenticationKey({})", self.to_hex())
    }
}

impl fmt::Display for AuthenticationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<[u8; AUTHENTICATION_KEY_LENGTH]> for AuthenticationKey {
    fn from(bytes: [u8; AUTHENTICATION_KEY_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl From<AuthenticationKey> for AccountAddress {
    fn from(key: AuthenticationKey) -> Self {
        key.to_address()
    }
}
