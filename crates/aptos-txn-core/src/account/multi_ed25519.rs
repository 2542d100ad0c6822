//! Multi-Ed25519 account implementation.
//!
//! This module provides the [`MultiEd25519Account`] type for K-of-N
//! threshold signature accounts using Ed25519 keys.

use crate::account::account::Account;
use crate::crypto::{
    AuthenticationKey, Ed25519PrivateKey, Ed25519PublicKey, MultiEd25519PublicKey,
    MultiEd25519Signature, MAX_NUM_OF_KEYS,
};
use crate::error::{AptosError, AptosResult};
use crate::transaction::AccountAuthenticator;
use crate::types::AccountAddress;
use std::fmt;

/// A multi-Ed25519 account holding some or all of its member private keys.
///
/// # Example
///
/// ```rust
/// use aptos_txn_core::account::{Account, MultiEd25519Account};
/// use aptos_txn_core::crypto::Ed25519PrivateKey;
///
/// // 2-of-3 where we hold keys 0 and 2
/// let keys: Vec<_> = (0..3).map(|_| Ed25519PrivateKey::generate()).collect();
/// let public_keys = keys.iter().map(Ed25519PrivateKey::public_key).collect();
/// let mut keys = keys.into_iter();
/// let k0 = keys.next().unwrap();
/// let k2 = keys.nth(1).unwrap();
/// let account = MultiEd25519Account::new(public_keys, 2, vec![(0, k0), (2, k2)]).unwrap();
///
/// let authenticator = account.sign_message(b"hello").unwrap();
/// assert!(authenticator.verify(b"hello"));
/// ```
pub struct MultiEd25519Account {
    /// Held private keys with their member index, ascending.
    private_keys: Vec<(u8, Ed25519PrivateKey)>,
    public_key: MultiEd25519PublicKey,
    address: AccountAddress,
}

impl MultiEd25519Account {
    /// Creates an account from all member public keys and the private keys
    /// held locally, each tagged with its member index.
    ///
    /// # Errors
    ///
    /// Fails if the key set or threshold is invalid, an index is out of
    /// range or repeated, or a private key does not match the public key at
    /// its index.
    pub fn new(
        public_keys: Vec<Ed25519PublicKey>,
        threshold: u8,
        mut private_keys: Vec<(u8, Ed25519PrivateKey)>,
    ) -> AptosResult<Self> {
        let public_key = MultiEd25519PublicKey::new(public_keys, threshold)?;

        private_keys.sort_by_key(|(index, _)| *index);
        for pair in private_keys.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(AptosError::InvalidPrivateKey(format!(
                    "duplicate private key index {}",
                    pair[0].0
                )));
            }
        }
        for (index, key) in &private_keys {
            let Some(expected) = public_key.public_keys().get(usize::from(*index)) else {
                return Err(AptosError::InvalidPrivateKey(format!(
                    "private key index {index} out of bounds"
                )));
            };
            if key.public_key() != *expected {
                return Err(AptosError::InvalidPrivateKey(format!(
                    "private key at index {index} doesn't match public key"
                )));
            }
        }

        let address = public_key.authentication_key().to_address();
        Ok(Self {
            private_keys,
            public_key,
            address,
        })
    }

    /// Creates an account that holds every member private key.
    pub fn from_private_keys(
        private_keys: Vec<Ed25519PrivateKey>,
        threshold: u8,
    ) -> AptosResult<Self> {
        if private_keys.len() > MAX_NUM_OF_KEYS {
            return Err(AptosError::InvalidPublicKey(format!(
                "multi-Ed25519 supports at most {MAX_NUM_OF_KEYS} keys, got {}",
                private_keys.len()
            )));
        }
        let public_keys = private_keys.iter().map(Ed25519PrivateKey::public_key).collect();
        let indexed = (0u8..).zip(private_keys).collect();
        Self::new(public_keys, threshold, indexed)
    }

    /// Returns the account address.
    pub fn address(&self) -> AccountAddress {
        self.address
    }

    /// Returns the multi-Ed25519 public key.
    pub fn public_key(&self) -> &MultiEd25519PublicKey {
        &self.public_key
    }

    /// Returns the signature threshold.
    pub fn threshold(&self) -> u8 {
        self.public_key.threshold()
    }

    /// Returns how many member private keys this account holds.
    pub fn num_private_keys(&self) -> usize {
        self.private_keys.len()
    }

    /// Signs with the first `threshold` held keys, in index order.
    ///
    /// # Errors
    ///
    /// Returns [`AptosError::InsufficientSignatures`] when fewer keys are
    /// held than the threshold requires.
    pub fn sign(&self, message: &[u8]) -> AptosResult<MultiEd25519Signature> {
        let required = usize::from(self.threshold());
        if self.private_keys.len() < required {
            return Err(AptosError::InsufficientSignatures {
                required,
                provided: self.private_keys.len(),
            });
        }
        let signatures = self
            .private_keys
            .iter()
            .take(required)
            .map(|(index, key)| (*index, key.sign(message)))
            .collect();
        MultiEd25519Signature::new(signatures)
    }
}

impl Account for MultiEd25519Account {
    fn address(&self) -> AccountAddress {
        self.address
    }

    fn authentication_key(&self) -> AuthenticationKey {
        self.public_key.authentication_key()
    }

    fn sign_message(&self, message: &[u8]) -> AptosResult<AccountAuthenticator> {
        let signature = self.sign(message)?;
        Ok(AccountAuthenticator::multi_ed25519(self.public_key.clone(), signature))
    }
}

impl fmt::Debug for MultiEd25519Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiEd25519Account")
            .field("address", &self.address)
            .field("threshold", &self.threshold())
            .field("num_keys", &self.public_key.num_keys())
            .field(
                "held_indices",
                &self.private_keys.iter().map(|(i, _)| *i).collect::<Vec<_>>(),
            )
            .finish()
    }
}
