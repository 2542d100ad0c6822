//! Ed25519 signature scheme.
//!
//! The default scheme for Aptos accounts. Keys are 32 bytes, signatures 64
//! bytes; both travel as length-prefixed byte strings in BCS.

use crate::bcs::{Deserializable, Deserializer, Serializable, Serializer};
use crate::crypto::traits::{PublicKey, Signature, Signer, Verifier};
use crate::crypto::{AuthenticationKey, ED25519_SCHEME};
use crate::error::{AptosError, AptosResult};
use ed25519_dalek::Signer as DalekSigner;
use std::fmt;
use zeroize::Zeroizing;

/// Ed25519 private key length in bytes.
pub const ED25519_PRIVATE_KEY_LENGTH: usize = 32;
/// Ed25519 public key length in bytes.
pub const ED25519_PUBLIC_KEY_LENGTH: usize = 32;
/// Ed25519 signature length in bytes.
pub const ED25519_SIGNATURE_LENGTH: usize = 64;

fn strip_hex_prefix(hex_str: &str) -> &str {
    hex_str.strip_prefix("0x").unwrap_or(hex_str)
}

/// An Ed25519 private key.
///
/// The key material is wiped when the value is dropped and never printed.
///
/// ```rust
/// use aptos_txn_core::crypto::{Ed25519PrivateKey, Verifier};
///
/// let private_key = Ed25519PrivateKey::generate();
/// let signature = private_key.sign(b"hello");
/// assert!(private_key.public_key().verify(b"hello", &signature));
/// ```
#[derive(Clone)]
pub struct Ed25519PrivateKey {
    inner: ed25519_dalek::SigningKey,
}

impl Ed25519PrivateKey {
    /// Generates a new random private key from the OS RNG.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        Self {
            inner: ed25519_dalek::SigningKey::generate(&mut csprng),
        }
    }

    /// Creates a private key from its 32-byte seed.
    pub fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        let seed: &[u8; ED25519_PRIVATE_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            AptosError::InvalidPrivateKey(format!(
                "expected {ED25519_PRIVATE_KEY_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self {
            inner: ed25519_dalek::SigningKey::from_bytes(seed),
        })
    }

    /// Creates a private key from a hex string.
    pub fn from_hex(hex_str: &str) -> AptosResult<Self> {
        let bytes = Zeroizing::new(hex::decode(strip_hex_prefix(hex_str))?);
        Self::from_bytes(&bytes)
    }

    /// Returns the 32-byte seed.
    ///
    /// The caller owns the copy and is responsible for wiping it.
    pub fn to_bytes(&self) -> [u8; ED25519_PRIVATE_KEY_LENGTH] {
        self.inner.to_bytes()
    }

    /// Returns the corresponding public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey {
            inner: self.inner.verifying_key(),
        }
    }

    /// Signs a message.
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature {
            inner: self.inner.sign(message),
        }
    }
}

impl Signer for Ed25519PrivateKey {
    type Signature = Ed25519Signature;

    fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519PrivateKey::sign(self, message)
    }

    fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PrivateKey::public_key(self)
    }
}

impl fmt::Debug for Ed25519PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Ed25519PrivateKey([REDACTED])")
    }
}

/// An Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ed25519PublicKey {
    inner: ed25519_dalek::VerifyingKey,
}

impl Ed25519PublicKey {
    /// Creates a public key from its 32-byte compressed point.
    pub fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        let point: &[u8; ED25519_PUBLIC_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            AptosError::InvalidPublicKey(format!(
                "expected {ED25519_PUBLIC_KEY_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;
        let inner = ed25519_dalek::VerifyingKey::from_bytes(point)
            .map_err(|e| AptosError::InvalidPublicKey(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Creates a public key from a hex string.
    pub fn from_hex(hex_str: &str) -> AptosResult<Self> {
        Self::from_bytes(&hex::decode(strip_hex_prefix(hex_str))?)
    }

    /// Returns the public key as bytes.
    pub fn to_bytes(&self) -> [u8; ED25519_PUBLIC_KEY_LENGTH] {
        self.inner.to_bytes()
    }

    /// Returns the public key as a hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    /// Verifies a signature with strict (non-malleable) checking.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> bool {
        self.inner.verify_strict(message, &signature.inner).is_ok()
    }

    /// Derives the authentication key, scheme byte 0.
    pub fn authentication_key(&self) -> AuthenticationKey {
        AuthenticationKey::from_public_key(&self.to_bytes(), ED25519_SCHEME)
    }
}

impl PublicKey for Ed25519PublicKey {
    fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        Ed25519PublicKey::from_bytes(bytes)
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.inner.to_bytes().to_vec()
    }
}

impl Verifier for Ed25519PublicKey {
    type Signature = Ed25519Signature;

    fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> bool {
        Ed25519PublicKey::verify(self, message, signature)
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serializable for Ed25519PublicKey {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        Ok(serializer.serialize_bytes(&self.to_bytes())?)
    }
}

impl Deserializable for Ed25519PublicKey {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Self::from_bytes(&deserializer.read_bytes_exact(ED25519_PUBLIC_KEY_LENGTH)?)
    }
}

/// An Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ed25519Signature {
    inner: ed25519_dalek::Signature,
}

impl Ed25519Signature {
    /// Creates a signature from 64 raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        if bytes.len() != ED25519_SIGNATURE_LENGTH {
            return Err(AptosError::InvalidSignature(format!(
                "expected {ED25519_SIGNATURE_LENGTH} bytes, got {}",
                bytes.len()
            )));
        }
        let inner = ed25519_dalek::Signature::from_slice(bytes)
            .map_err(|e| AptosError::InvalidSignature(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Creates a signature from a hex string.
    pub fn from_hex(hex_str: &str) -> AptosResult<Self> {
        Self::from_bytes(&hex::decode(strip_hex_prefix(hex_str))?)
    }

    /// Returns the signature as bytes.
    pub fn to_bytes(&self) -> [u8; ED25519_SIGNATURE_LENGTH] {
        self.inner.to_bytes()
    }

    /// Returns the signature as a hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }
}

impl Signature for Ed25519Signature {
    type PublicKey = Ed25519PublicKey;

    fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        Ed25519Signature::from_bytes(bytes)
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.inner.to_bytes().to_vec()
    }
}

impl fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Signature({})", self.to_hex())
    }
}

impl Serializable for Ed25519Signature {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        Ok(serializer.serialize_bytes(&self.to_bytes())?)
    }
}

impl Deserializable for Ed25519Signature {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Self::from_bytes(&deserializer.read_bytes_exact(ED25519_SIGNATURE_LENGTH)?)
    }
}
