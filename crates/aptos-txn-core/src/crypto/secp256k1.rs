//! Secp256k1 ECDSA signature scheme.
//!
//! Used through the single-key account envelope. Public keys are 33-byte
//! compressed SEC1 points; signatures are 64-byte `r || s` with `s` in the
//! lower half of the curve order. The signed digest is SHA2-256 of the
//! message.

use crate::bcs::{Deserializable, Deserializer, Serializable, Serializer};
use crate::crypto::traits::{PublicKey, Signature, Signer, Verifier};
use crate::error::{AptosError, AptosResult};
use k256::ecdsa::signature::{DigestSigner, DigestVerifier};
use k256::ecdsa::{Signature as K256Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::Zeroizing;

/// Secp256k1 private key length in bytes.
pub const SECP256K1_PRIVATE_KEY_LENGTH: usize = 32;
/// Secp256k1 compressed public key length in bytes.
pub const SECP256K1_PUBLIC_KEY_LENGTH: usize = 33;
/// Secp256k1 signature length in bytes.
pub const SECP256K1_SIGNATURE_LENGTH: usize = 64;

/// A Secp256k1 ECDSA private key.
///
/// Wiped on drop; `Debug` never prints the scalar.
#[derive(Clone)]
pub struct Secp256k1PrivateKey {
    inner: SigningKey,
}

impl Secp256k1PrivateKey {
    /// Generates a new random private key from the OS RNG.
    pub fn generate() -> Self {
        Self {
            inner: SigningKey::random(&mut rand::rngs::OsRng),
        }
    }

    /// Creates a private key from a 32-byte big-endian scalar.
    pub fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        if bytes.len() != SECP256K1_PRIVATE_KEY_LENGTH {
            return Err(AptosError::InvalidPrivateKey(format!(
                "expected {SECP256K1_PRIVATE_KEY_LENGTH} bytes, got {}",
                bytes.len()
            )));
        }
        let inner = SigningKey::from_slice(bytes)
            .map_err(|e| AptosError::InvalidPrivateKey(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Creates a private key from a hex string.
    pub fn from_hex(hex_str: &str) -> AptosResult<Self> {
        let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        let bytes = Zeroizing::new(hex::decode(hex_str)?);
        Self::from_bytes(&bytes)
    }

    /// Returns the corresponding public key.
    pub fn public_key(&self) -> Secp256k1PublicKey {
        Secp256k1PublicKey {
            inner: *self.inner.verifying_key(),
        }
    }

    /// Signs SHA2-256 of `message`. The result is always low-S.
    pub fn sign(&self, message: &[u8]) -> Secp256k1Signature {
        let signature: K256Signature = self.inner.sign_digest(Sha256::new_with_prefix(message));
        Secp256k1Signature {
            inner: signature.normalize_s().unwrap_or(signature),
        }
    }
}

impl Signer for Secp256k1PrivateKey {
    type Signature = Secp256k1Signature;

    fn sign(&self, message: &[u8]) -> Secp256k1Signature {
        Secp256k1PrivateKey::sign(self, message)
    }

    fn public_key(&self) -> Secp256k1PublicKey {
        Secp256k1PrivateKey::public_key(self)
    }
}

impl fmt::Debug for Secp256k1PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secp256k1PrivateKey([REDACTED])")
    }
}

/// A Secp256k1 ECDSA public key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Secp256k1PublicKey {
    inner: VerifyingKey,
}

impl Secp256k1PublicKey {
    /// Creates a public key from its 33-byte compressed encoding.
    pub fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        if bytes.len() != SECP256K1_PUBLIC_KEY_LENGTH {
            return Err(AptosError::InvalidPublicKey(format!(
                "expected {SECP256K1_PUBLIC_KEY_LENGTH} compressed bytes, got {}",
                bytes.len()
            )));
        }
        let inner = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|e| AptosError::InvalidPublicKey(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Creates a public key from a hex string.
    pub fn from_hex(hex_str: &str) -> AptosResult<Self> {
        let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        Self::from_bytes(&hex::decode(hex_str)?)
    }

    /// Returns the 33-byte compressed encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        k256::PublicKey::from(&self.inner)
            .to_encoded_point(true)
            .as_bytes()
            .to_vec()
    }

    /// Returns the public key as a hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    /// Verifies a signature over SHA2-256 of `message`. High-S signatures
    /// are rejected.
    pub fn verify(&self, message: &[u8], signature: &Secp256k1Signature) -> bool {
        if signature.inner.normalize_s().is_some() {
            return false;
        }
        self.inner
            .verify_digest(Sha256::new_with_prefix(message), &signature.inner)
            .is_ok()
    }
}

impl PublicKey for Secp256k1PublicKey {
    fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        Secp256k1PublicKey::from_bytes(bytes)
    }

    fn to_bytes(&self) -> Vec<u8> {
        Secp256k1PublicKey::to_bytes(self)
    }
}

impl Verifier for Secp256k1PublicKey {
    type Signature = Secp256k1Signature;

    fn verify(&self, message: &[u8], signature: &Secp256k1Signature) -> bool {
        Secp256k1PublicKey::verify(self, message, signature)
    }
}

impl fmt::Debug for Secp256k1PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256k1PublicKey({})", self.to_hex())
    }
}

impl Serializable for Secp256k1PublicKey {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        Ok(serializer.serialize_bytes(&self.to_bytes())?)
    }
}

impl Deserializable for Secp256k1PublicKey {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Self::from_bytes(&deserializer.read_bytes_exact(SECP256K1_PUBLIC_KEY_LENGTH)?)
    }
}

/// A Secp256k1 ECDSA signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Secp256k1Signature {
    inner: K256Signature,
}

impl Secp256k1Signature {
    /// Creates a signature from 64 bytes (`r || s`), rejecting high-S values.
    pub fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        if bytes.len() != SECP256K1_SIGNATURE_LENGTH {
            return Err(AptosError::InvalidSignature(format!(
                "expected {SECP256K1_SIGNATURE_LENGTH} bytes, got {}",
                bytes.len()
            )));
        }
        let inner = K256Signature::from_slice(bytes)
            .map_err(|e| AptosError::InvalidSignature(e.to_string()))?;
        if inner.normalize_s().is_some() {
            return Err(AptosError::InvalidSignature(
                "signature is not in canonical low-S form".into(),
            ));
        }
        Ok(Self { inner })
    }

    /// Returns the signature as 64 bytes.
    pub fn to_bytes(&self) -> [u8; SECP256K1_SIGNATURE_LENGTH] {
        let mut out = [0u8; SECP256K1_SIGNATURE_LENGTH];
        out.copy_from_slice(&self.inner.to_bytes());
        out
    }

    /// Returns the signature as a hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }
}

impl Signature for Secp256k1Signature {
    type PublicKey = Secp256k1PublicKey;

    fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        Secp256k1Signature::from_bytes(bytes)
    }

    fn to_bytes(&self) -> Vec<u8> {
        Secp256k1Signature::to_bytes(self).to_vec()
    }
}

impl fmt::Debug for Secp256k1Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256k1Signature({})", self.to_hex())
    }
}

impl Serializable for Secp256k1Signature {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        Ok(serializer.serialize_bytes(&self.to_bytes())?)
    }
}

impl Deserializable for Secp256k1Signature {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Self::from_bytes(&deserializer.read_bytes_exact(SECP256K1_SIGNATURE_LENGTH)?)
    }
}
