//! Single-key envelopes.
//!
//! [`AnyPublicKey`] and [`AnySignature`] tag a key or signature with its
//! scheme so one account type can hold Ed25519, Secp256k1 or keyless
//! material. Wire tags: Ed25519=0, Secp256k1Ecdsa=1, Keyless=3. Tag 2
//! belongs to a scheme this crate does not carry and is rejected.

use crate::bcs::{BcsError, Deserializable, Deserializer, Serializable, Serializer};
use crate::crypto::ed25519::{Ed25519PublicKey, Ed25519Signature};
use crate::crypto::keyless::{KeylessPublicKey, KeylessSignature};
use crate::crypto::secp256k1::{Secp256k1PublicKey, Secp256k1Signature};
use crate::crypto::{AuthenticationKey, SINGLE_KEY_SCHEME};
use crate::error::AptosResult;
use tracing::debug;

const ED25519_VARIANT: u32 = 0;
const SECP256K1_ECDSA_VARIANT: u32 = 1;
const KEYLESS_VARIANT: u32 = 3;

/// A public key of any single-key scheme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnyPublicKey {
    /// Ed25519 key
    Ed25519(Ed25519PublicKey),
    /// Secp256k1 ECDSA key
    Secp256k1Ecdsa(Secp256k1PublicKey),
    /// Keyless key
    Keyless(KeylessPublicKey),
}

impl AnyPublicKey {
    /// Returns the wire tag of this key's scheme.
    pub fn variant_index(&self) -> u32 {
        match self {
            AnyPublicKey::Ed25519(_) => ED25519_VARIANT,
            AnyPublicKey::Secp256k1Ecdsa(_) => SECP256K1_ECDSA_VARIANT,
            AnyPublicKey::Keyless(_) => KEYLESS_VARIANT,
        }
    }

    /// Verifies `signature` over `message`.
    ///
    /// A signature of a different scheme than the key is `false`. Keyless
    /// signatures are always `false` here; the keyless subsystem checks
    /// them.
    pub fn verify(&self, message: &[u8], signature: &AnySignature) -> bool {
        match (self, signature) {
            (AnyPublicKey::Ed25519(pk), AnySignature::Ed25519(sig)) => pk.verify(message, sig),
            (AnyPublicKey::Secp256k1Ecdsa(pk), AnySignature::Secp256k1Ecdsa(sig)) => {
                pk.verify(message, sig)
            }
            (AnyPublicKey::Keyless(_), AnySignature::Keyless(_)) => {
                debug!("keyless signatures are not verified locally");
                false
            }
            _ => {
                debug!(
                    key_scheme = self.variant_index(),
                    signature_scheme = signature.variant_index(),
                    "public key and signature schemes differ"
                );
                false
            }
        }
    }

    /// Derives the single-key authentication key:
    /// `SHA3-256(BCS(self) || 0x02)`.
    pub fn authentication_key(&self) -> AptosResult<AuthenticationKey> {
        let bytes = crate::bcs::to_bytes(self)?;
        Ok(AuthenticationKey::from_public_key(&bytes, SINGLE_KEY_SCHEME))
    }
}

impl From<Ed25519PublicKey> for AnyPublicKey {
    fn from(key: Ed25519PublicKey) -> Self {
        AnyPublicKey::Ed25519(key)
    }
}

impl From<Secp256k1PublicKey> for AnyPublicKey {
    fn from(key: Secp256k1PublicKey) -> Self {
        AnyPublicKey::Secp256k1Ecdsa(key)
    }
}

impl From<KeylessPublicKey> for AnyPublicKey {
    fn from(key: KeylessPublicKey) -> Self {
        AnyPublicKey::Keyless(key)
    }
}

impl Serializable for AnyPublicKey {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.serialize_variant_index(self.variant_index());
        match self {
            AnyPublicKey::Ed25519(pk) => pk.serialize(serializer),
            AnyPublicKey::Secp256k1Ecdsa(pk) => pk.serialize(serializer),
            AnyPublicKey::Keyless(pk) => pk.serialize(serializer),
        }
    }
}

impl Deserializable for AnyPublicKey {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        match deserializer.read_variant_index()? {
            ED25519_VARIANT => Ok(AnyPublicKey::Ed25519(Deserializable::deserialize(
                deserializer,
            )?)),
            SECP256K1_ECDSA_VARIANT => Ok(AnyPublicKey::Secp256k1Ecdsa(
                Deserializable::deserialize(deserializer)?,
            )),
            KEYLESS_VARIANT => Ok(AnyPublicKey::Keyless(Deserializable::deserialize(
                deserializer,
            )?)),
            index => Err(BcsError::InvalidVariant {
                type_name: "AnyPublicKey",
                index,
            }
            .into()),
        }
    }
}

/// A signature of any single-key scheme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnySignature {
    /// Ed25519 signature
    Ed25519(Ed25519Signature),
    /// Secp256k1 ECDSA signature
    Secp256k1Ecdsa(Secp256k1Signature),
    /// Opaque keyless signature
    Keyless(KeylessSignature),
}

impl AnySignature {
    /// Returns the wire tag of this signature's scheme.
    pub fn variant_index(&self) -> u32 {
        match self {
            AnySignature::Ed25519(_) => ED25519_VARIANT,
            AnySignature::Secp256k1Ecdsa(_) => SECP256K1_ECDSA_VARIANT,
            AnySignature::Keyless(_) => KEYLESS_VARIANT,
        }
    }
}

impl From<Ed25519Signature> for AnySignature {
    fn from(sig: Ed25519Signature) -> Self {
        AnySignature::Ed25519(sig)
    }
}

impl From<Secp256k1Signature> for AnySignature {
    fn from(sig: Secp256k1Signature) -> Self {
        AnySignature::Secp256k1Ecdsa(sig)
    }
}

impl From<KeylessSignature> for AnySignature {
    fn from(sig: KeylessSignature) -> Self {
        AnySignature::Keyless(sig)
    }
}

impl Serializable for AnySignature {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.serialize_variant_index(self.variant_index());
        match self {
            AnySignature::Ed25519(sig) => sig.serialize(serializer),
            AnySignature::Secp256k1Ecdsa(sig) => sig.serialize(serializer),
            AnySignature::Keyless(sig) => sig.serialize(serializer),
        }
    }
}

impl Deserializable for AnySignature {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        match deserializer.read_variant_index()? {
            ED25519_VARIANT => Ok(AnySignature::Ed25519(Deserializable::deserialize(
                deserializer,
            )?)),
            SECP256K1_ECDSA_VARIANT => Ok(AnySignature::Secp256k1Ecdsa(
                Deserializable::deserialize(deserializer)?,
            )),
            KEYLESS_VARIANT => Ok(AnySignature::Keyless(Deserializable::deserialize(
                deserializer,
            )?)),
            index => Err(BcsError::InvalidVariant {
                type_name: "AnySignature",
                index,
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bcs;
    use crate::crypto::{Ed25519PrivateKey, Secp256k1PrivateKey};
    use crate::error::AptosError;

    #[test]
    fn test_ed25519_envelope_layout() {
        let pk = Ed25519PrivateKey::generate().public_key();
        let bytes = bcs::to_bytes(&AnyPublicKey::from(pk)).unwrap();
        assert_eq!(bytes[0], 0);
        assert_eq!(bytes[1], 32);
        assert_eq!(&bytes[2..], &pk.to_bytes());
    }

    #[test]
    fn test_verify_dispatch() {
        let ed = Ed25519PrivateKey::generate();
        let k1 = Secp256k1PrivateKey::generate();

        let ed_pk = AnyPublicKey::from(ed.public_key());
        let k1_pk = AnyPublicKey::from(k1.public_key());
        let ed_sig = AnySignature::from(ed.sign(b"m"));
        let k1_sig = AnySignature::from(k1.sign(b"m"));

        assert!(ed_pk.verify(b"m", &ed_sig));
        assert!(k1_pk.verify(b"m", &k1_sig));
        assert!(!ed_pk.verify(b"m", &k1_sig));
        assert!(!k1_pk.verify(b"m", &ed_sig));
    }

    #[test]
    fn test_keyless_never_verifies_locally() {
        let pk = AnyPublicKey::from(KeylessPublicKey::new("iss", &[1u8; 32]).unwrap());
        let sig = AnySignature::from(KeylessSignature::from_bytes(vec![0u8; 8]));
        assert!(!pk.verify(b"m", &sig));
        assert_eq!(bcs::to_bytes(&sig).unwrap()[0], 3);
    }

    #[test]
    fn test_unknown_variants_rejected() {
        let mut bytes = vec![2u8, 32];
        bytes.extend_from_slice(&[0u8; 32]);
        assert!(matches!(
            bcs::from_bytes::<AnyPublicKey>(&bytes),
            Err(AptosError::Bcs(BcsError::InvalidVariant { index: 2, .. }))
        ));
        assert!(matches!(
            bcs::from_bytes::<AnySignature>(&[4u8, 0]),
            Err(AptosError::Bcs(BcsError::InvalidVariant { index: 4, .. }))
        ));
    }

    #[test]
    fn test_authentication_key_uses_envelope() {
        let pk = AnyPublicKey::from(Ed25519PrivateKey::generate().public_key());
        let envelope = bcs::to_bytes(&pk).unwrap();
        let expected = crate::crypto::sha3_256_of([envelope.as_slice(), &[2u8]]);
        assert_eq!(pk.authentication_key().unwrap().to_bytes(), expected);
    }
}
