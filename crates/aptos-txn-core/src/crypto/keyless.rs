//! Keyless (OpenID-based) public keys and signatures.
//!
//! Only the data shapes live here. A keyless signature is produced and
//! checked by the keyless subsystem (ephemeral key, JWT and zero-knowledge
//! proof); this crate carries it as an opaque blob and cannot verify it
//! locally.

use crate::bcs::{Deserializable, Deserializer, Serializable, Serializer};
use crate::error::{AptosError, AptosResult};
use std::fmt;

/// Length of the identity commitment in bytes.
pub const IDC_LENGTH: usize = 32;

/// A keyless public key: the OIDC issuer plus a commitment to the user's
/// identity at that issuer.
#[derive(Clone, PartialEq, Eq)]
pub struct KeylessPublicKey {
    iss_val: String,
    idc: [u8; IDC_LENGTH],
}

impl KeylessPublicKey {
    /// Creates a keyless public key.
    pub fn new(iss_val: impl Into<String>, idc: &[u8]) -> AptosResult<Self> {
        let idc = <[u8; IDC_LENGTH]>::try_from(idc).map_err(|_| {
            AptosError::InvalidPublicKey(format!(
                "identity commitment must be {IDC_LENGTH} bytes, got {}",
                idc.len()
            ))
        })?;
        Ok(Self {
            iss_val: iss_val.into(),
            idc,
        })
    }

    /// The issuer, e.g. `https://accounts.google.com`.
    pub fn iss_val(&self) -> &str {
        &self.iss_val
    }

    /// The identity commitment.
    pub fn idc(&self) -> &[u8; IDC_LENGTH] {
        &self.idc
    }
}

impl fmt::Debug for KeylessPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "KeylessPublicKey(iss={}, idc=0x{})",
            self.iss_val,
            hex::encode(self.idc)
        )
    }
}

impl Serializable for KeylessPublicKey {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.serialize_str(&self.iss_val)?;
        Ok(serializer.serialize_bytes(&self.idc)?)
    }
}

impl Deserializable for KeylessPublicKey {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        let iss_val = deserializer.read_str()?;
        let idc = deserializer.read_bytes_exact(IDC_LENGTH)?;
        Self::new(iss_val, &idc)
    }
}

/// An opaque keyless signature blob.
#[derive(Clone, PartialEq, Eq)]
pub struct KeylessSignature(Vec<u8>);

impl KeylessSignature {
    /// Wraps the serialized signature produced by the keyless subsystem.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Returns the raw blob.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for KeylessSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeylessSignature({} bytes)", self.0.len())
    }
}

impl Serializable for KeylessSignature {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        Ok(serializer.serialize_bytes(&self.0)?)
    }
}

impl Deserializable for KeylessSignature {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self(deserializer.read_bytes()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bcs::{self, BcsError};

    #[test]
    fn test_public_key_layout() {
        let pk = KeylessPublicKey::new("https://accounts.google.com", &[7u8; 32]).unwrap();
        let bytes = bcs::to_bytes(&pk).unwrap();
        assert_eq!(bytes[0], 27);
        assert_eq!(&bytes[1..28], b"https://accounts.google.com");
        assert_eq!(bytes[28], 32);
        assert_eq!(bytes.len(), 28 + 1 + 32);
        assert_eq!(bcs::from_bytes::<KeylessPublicKey>(&bytes).unwrap(), pk);
    }

    #[test]
    fn test_idc_length_enforced() {
        assert!(KeylessPublicKey::new("iss", &[0u8; 31]).is_err());

        let mut bytes = bcs::to_bytes("iss").unwrap();
        bytes.push(31);
        bytes.extend_from_slice(&[0u8; 31]);
        assert!(matches!(
            bcs::from_bytes::<KeylessPublicKey>(&bytes),
            Err(AptosError::Bcs(BcsError::LengthMismatch {
                expected: 32,
                actual: 31
            }))
        ));
    }

    #[test]
    fn test_signature_is_length_prefixed() {
        let sig = KeylessSignature::from_bytes(vec![1, 2, 3]);
        assert_eq!(bcs::to_bytes(&sig).unwrap(), vec![3, 1, 2, 3]);
    }
}
