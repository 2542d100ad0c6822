//! Ed25519 account implementation.

use crate::account::account::Account;
use crate::crypto::{AuthenticationKey, Ed25519PrivateKey, Ed25519PublicKey, Ed25519Signature};
use crate::error::AptosResult;
use crate::transaction::AccountAuthenticator;
use crate::types::AccountAddress;
use std::fmt;

/// An Ed25519 account for signing transactions.
///
/// The address defaults to the key's authentication key. Accounts whose key
/// was rotated keep their original address; use [`Ed25519Account::with_address`].
///
/// # Example
///
/// ```rust
/// use aptos_txn_core::account::Ed25519Account;
///
/// let account = Ed25519Account::generate();
/// println!("Address: {}", account.address());
/// ```
#[derive(Clone)]
pub struct Ed25519Account {
    private_key: Ed25519PrivateKey,
    public_key: Ed25519PublicKey,
    address: AccountAddress,
}

impl Ed25519Account {
    /// Generates a new random Ed25519 account.
    pub fn generate() -> Self {
        Self::from_private_key(Ed25519PrivateKey::generate())
    }

    /// Creates an account from a private key, e.g. one produced by a wallet.
    pub fn from_private_key(private_key: Ed25519PrivateKey) -> Self {
        let public_key = private_key.public_key();
        let address = public_key.authentication_key().to_address();
        Self {
            private_key,
            public_key,
            address,
        }
    }

    /// Creates an account from private key bytes.
    pub fn from_private_key_bytes(bytes: &[u8]) -> AptosResult<Self> {
        Ok(Self::from_private_key(Ed25519PrivateKey::from_bytes(bytes)?))
    }

    /// Creates an account from a private key hex string.
    pub fn from_private_key_hex(hex_str: &str) -> AptosResult<Self> {
        Ok(Self::from_private_key(Ed25519PrivateKey::from_hex(hex_str)?))
    }

    /// Overrides the address, for accounts whose key has been rotated.
    pub fn with_address(mut self, address: AccountAddress) -> Self {
        self.address = address;
        self
    }

    /// Returns the account address.
    pub fn address(&self) -> AccountAddress {
        self.address
    }

    /// Returns the public key.
    pub fn public_key(&self) -> &Ed25519PublicKey {
        &self.public_key
    }

    /// Returns a reference to the private key.
    pub fn private_key(&self) -> &Ed25519PrivateKey {
        &self.private_key
    }

    /// Signs a message and returns the bare signature.
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        self.private_key.sign(message)
    }
}

impl Account for Ed25519Account {
    fn address(&self) -> AccountAddress {
        self.address
    }

    fn authentication_key(&self) -> AuthenticationKey {
        self.public_key.authentication_key()
    }

    fn sign_message(&self, message: &[u8]) -> AptosResult<AccountAuthenticator> {
        Ok(AccountAuthenticator::ed25519(
            self.public_key,
            self.private_key.sign(message),
        ))
    }
}

impl fmt::Debug for Ed25519Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519Account")
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}
