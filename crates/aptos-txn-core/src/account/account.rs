//! The account trait.

use crate::crypto::AuthenticationKey;
use crate::error::AptosResult;
use crate::transaction::AccountAuthenticator;
use crate::types::AccountAddress;

/// An account that can approve messages.
///
/// Implemented by every account type so the signing helpers can mix them,
/// e.g. an Ed25519 sender with a multi-Ed25519 secondary signer.
pub trait Account: Send + Sync {
    /// Returns the account address.
    fn address(&self) -> AccountAddress;

    /// Returns the authentication key of the account's public key.
    fn authentication_key(&self) -> AuthenticationKey;

    /// Signs `message` and wraps the signature with the public key.
    ///
    /// # Errors
    ///
    /// Fails when the account cannot produce a valid signature, such as a
    /// multi-key account holding fewer keys than its threshold.
    fn sign_message(&self, message: &[u8]) -> AptosResult<AccountAuthenticator>;
}
