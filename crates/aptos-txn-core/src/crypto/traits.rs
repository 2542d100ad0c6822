//! Cryptographic traits shared by the signature schemes.
//!
//! Only private keys sign and only public keys verify. Verification answers
//! yes or no; a malformed or mismatched signature is simply `false`.

use crate::error::AptosResult;

/// A private key that can sign messages.
pub trait Signer {
    /// The signature type produced by this signer.
    type Signature: Signature;

    /// Signs the given message.
    fn sign(&self, message: &[u8]) -> Self::Signature;

    /// Returns the public key corresponding to this signer.
    fn public_key(&self) -> <Self::Signature as Signature>::PublicKey;
}

/// A public key that can check signatures.
pub trait Verifier {
    /// The signature type this verifier can check.
    type Signature;

    /// Returns true if `signature` is valid for `message` under this key.
    fn verify(&self, message: &[u8], signature: &Self::Signature) -> bool;
}

/// A public key with a raw byte form.
pub trait PublicKey: Clone + Sized {
    /// Creates a public key from bytes.
    fn from_bytes(bytes: &[u8]) -> AptosResult<Self>;

    /// Returns the public key as bytes.
    fn to_bytes(&self) -> Vec<u8>;

    /// Returns the public key as a hex string with 0x prefix.
    fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }
}

/// A signature with a raw byte form.
pub trait Signature: Clone + Sized {
    /// The public key type for this signature scheme.
    type PublicKey: PublicKey;

    /// Creates a signature from bytes.
    fn from_bytes(bytes: &[u8]) -> AptosResult<Self>;

    /// Returns the signature as bytes.
    fn to_bytes(&self) -> Vec<u8>;

    /// Returns the signature as a hex string with 0x prefix.
    fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }
}
