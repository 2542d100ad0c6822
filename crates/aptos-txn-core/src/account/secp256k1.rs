//! Secp256k1 account implementation.

use crate::account::account::Account;
use crate::crypto::{AnyPublicKey, AuthenticationKey, Secp256k1PrivateKey, Secp256k1PublicKey};
use crate::error::AptosResult;
use crate::transaction::AccountAuthenticator;
use crate::types::AccountAddress;
use std::fmt;

/// A Secp256k1 ECDSA account.
///
/// Signs through the single-key envelope, so its authentication key is
/// derived from the BCS form of the tagged public key with scheme byte 2.
#[derive(Clone)]
pub struct Secp256k1Account {
    private_key: Secp256k1PrivateKey,
    public_key: Secp256k1PublicKey,
    authentication_key: AuthenticationKey,
    address: AccountAddress,
}

impl Secp256k1Account {
    /// Generates a new random Secp256k1 account.
    pub fn generate() -> AptosResult<Self> {
        Self::from_private_key(Secp256k1PrivateKey::generate())
    }

    /// Creates an account from a private key.
    pub fn from_private_key(private_key: Secp256k1PrivateKey) -> AptosResult<Self> {
        let public_key = private_key.public_key();
        let authentication_key = AnyPublicKey::from(public_key).authentication_key()?;
        Ok(Self {
            private_key,
            public_key,
            authentication_key,
            address: authentication_key.to_address(),
        })
    }

    /// Creates an account from a private key hex string.
    pub fn from_private_key_hex(hex_str: &str) -> AptosResult<Self> {
        Self::from_private_key(Secp256k1PrivateKey::from_hex(hex_str)?)
    }

    /// Returns the account address.
    pub fn address(&self) -> AccountAddress {
        self.address
    }

    /// Returns the public key.
    pub fn public_key(&self) -> &Secp256k1PublicKey {
        &self.public_key
    }
}

impl Account for Secp256k1Account {
    fn address(&self) -> AccountAddress {
        self.address
    }

    fn authentication_key(&self) -> AuthenticationKey {
        self.authentication_key
    }

    fn sign_message(&self, message: &[u8]) -> AptosResult<AccountAuthenticator> {
        Ok(AccountAuthenticator::single_key(
            self.public_key.into(),
            self.private_key.sign(message).into(),
        ))
    }
}

impl fmt::Debug for Secp256k1Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secp256k1Account")
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::SINGLE_KEY_SCHEME;

    #[test]
    fn test_single_key_authenticator() {
        let account = Secp256k1Account::generate().unwrap();
        let auth = account.sign_message(b"msg").unwrap();
        assert!(matches!(auth, AccountAuthenticator::SingleKey { .. }));
        assert!(auth.verify(b"msg"));
        assert_eq!(auth.authentication_key().unwrap(), account.authentication_key());
    }

    #[test]
    fn test_authentication_key_derivation() {
        let account = Secp256k1Account::generate().unwrap();
        // variant 1, length 33, compressed point
        let mut envelope = vec![1u8, 33];
        envelope.extend(account.public_key().to_bytes());
        let expected = AuthenticationKey::from_public_key(&envelope, SINGLE_KEY_SCHEME);
        assert_eq!(account.authentication_key(), expected);
        assert_eq!(account.address(), expected.to_address());
    }
}
