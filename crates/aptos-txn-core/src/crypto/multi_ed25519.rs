//! Multi-Ed25519 threshold signatures.
//!
//! A K-of-N account holds N Ed25519 keys (2 ≤ N ≤ 32) and a threshold K
//! (1 ≤ K ≤ N). A signature carries the contributing member signatures in
//! ascending key order plus a 4-byte bitmap; bit `31 - i` (counting from the
//! least significant bit of the big-endian word) marks that key `i` signed.
//!
//! Wire forms, both length-prefixed in BCS:
//!
//! - public key: `key_0 || ... || key_{n-1} || threshold`
//! - signature: `sig_0 || ... || sig_{m-1} || bitmap[4]`

use crate::bcs::{Deserializable, Deserializer, Serializable, Serializer};
use crate::crypto::ed25519::{
    Ed25519PublicKey, Ed25519Signature, ED25519_PUBLIC_KEY_LENGTH, ED25519_SIGNATURE_LENGTH,
};
use crate::crypto::traits::{PublicKey, Verifier};
use crate::crypto::{AuthenticationKey, MULTI_ED25519_SCHEME};
use crate::error::{AptosError, AptosResult};
use std::fmt;
use tracing::trace;

/// Maximum number of keys in a multi-Ed25519 account.
pub const MAX_NUM_OF_KEYS: usize = 32;

/// Minimum number of keys in a multi-Ed25519 account.
pub const MIN_NUM_OF_KEYS: usize = 2;

/// Minimum threshold (at least 1 signature required).
pub const MIN_THRESHOLD: u8 = 1;

/// Length of the signer bitmap in bytes.
pub const BITMAP_LENGTH: usize = 4;

fn bitmap_set_bit(bitmap: &mut [u8; BITMAP_LENGTH], index: usize) {
    bitmap[index / 8] |= 0x80 >> (index % 8);
}

fn bitmap_get_bit(bitmap: &[u8; BITMAP_LENGTH], index: usize) -> bool {
    bitmap[index / 8] & (0x80 >> (index % 8)) != 0
}

fn bitmap_count_ones(bitmap: &[u8; BITMAP_LENGTH]) -> usize {
    bitmap.iter().map(|b| b.count_ones() as usize).sum()
}

/// A multi-Ed25519 public key.
///
/// ```rust
/// use aptos_txn_core::crypto::{Ed25519PrivateKey, MultiEd25519PublicKey};
///
/// let keys: Vec<_> = (0..3).map(|_| Ed25519PrivateKey::generate().public_key()).collect();
/// let multi = MultiEd25519PublicKey::new(keys, 2).unwrap();
/// assert_eq!(multi.threshold(), 2);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct MultiEd25519PublicKey {
    public_keys: Vec<Ed25519PublicKey>,
    threshold: u8,
}

impl MultiEd25519PublicKey {
    /// Creates a K-of-N public key.
    ///
    /// Fails with [`AptosError::InvalidPublicKey`] if the key count is
    /// outside 2..=32 and with [`AptosError::InvalidThreshold`] if the
    /// threshold is outside 1..=N.
    pub fn new(public_keys: Vec<Ed25519PublicKey>, threshold: u8) -> AptosResult<Self> {
        let n = public_keys.len();
        if !(MIN_NUM_OF_KEYS..=MAX_NUM_OF_KEYS).contains(&n) {
            return Err(AptosError::InvalidPublicKey(format!(
                "multi-Ed25519 needs {MIN_NUM_OF_KEYS} to {MAX_NUM_OF_KEYS} keys, got {n}"
            )));
        }
        if threshold < MIN_THRESHOLD || usize::from(threshold) > n {
            return Err(AptosError::InvalidThreshold(format!(
                "threshold {threshold} is not within 1..={n}"
            )));
        }
        Ok(Self {
            public_keys,
            threshold,
        })
    }

    /// Returns the number of member keys.
    pub fn num_keys(&self) -> usize {
        self.public_keys.len()
    }

    /// Returns the threshold K.
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Returns the member keys in order.
    pub fn public_keys(&self) -> &[Ed25519PublicKey] {
        &self.public_keys
    }

    /// Returns `key_0 || ... || key_{n-1} || threshold`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.public_keys.len() * ED25519_PUBLIC_KEY_LENGTH + 1);
        for pk in &self.public_keys {
            bytes.extend_from_slice(&pk.to_bytes());
        }
        bytes.push(self.threshold);
        bytes
    }

    /// Parses the concatenated form produced by [`Self::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        let Some((&threshold, key_bytes)) = bytes.split_last() else {
            return Err(AptosError::InvalidPublicKey(
                "empty multi-Ed25519 public key".into(),
            ));
        };
        if key_bytes.len() % ED25519_PUBLIC_KEY_LENGTH != 0 {
            return Err(AptosError::InvalidPublicKey(format!(
                "key bytes length {} is not a multiple of {ED25519_PUBLIC_KEY_LENGTH}",
                key_bytes.len()
            )));
        }
        let public_keys = key_bytes
            .chunks_exact(ED25519_PUBLIC_KEY_LENGTH)
            .map(Ed25519PublicKey::from_bytes)
            .collect::<AptosResult<Vec<_>>>()?;
        Self::new(public_keys, threshold)
    }

    /// Derives the authentication key, scheme byte 1.
    pub fn authentication_key(&self) -> AuthenticationKey {
        AuthenticationKey::from_public_key(&self.to_bytes(), MULTI_ED25519_SCHEME)
    }

    /// Verifies a threshold signature.
    ///
    /// Walks the bitmap from index 0 upward, consuming one member signature
    /// per set bit. Any failing member signature, a set bit beyond the key
    /// count, or fewer than `threshold` valid signatures fails the whole
    /// check.
    pub fn verify(&self, message: &[u8], signature: &MultiEd25519Signature) -> bool {
        let mut signatures = signature.signatures.iter();
        let mut verified = 0usize;
        for index in 0..MAX_NUM_OF_KEYS {
            if !bitmap_get_bit(&signature.bitmap, index) {
                continue;
            }
            let Some(member_signature) = signatures.next() else {
                trace!(index, "bitmap marks more signers than signatures present");
                return false;
            };
            let Some(public_key) = self.public_keys.get(index) else {
                trace!(index, num_keys = self.num_keys(), "signer index beyond key count");
                return false;
            };
            if !public_key.verify(message, member_signature) {
                trace!(index, "member signature failed verification");
                return false;
            }
            verified += 1;
        }
        if signatures.next().is_some() {
            return false;
        }
        verified >= usize::from(self.threshold)
    }
}

impl PublicKey for MultiEd25519PublicKey {
    fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        MultiEd25519PublicKey::from_bytes(bytes)
    }

    fn to_bytes(&self) -> Vec<u8> {
        MultiEd25519PublicKey::to_bytes(self)
    }
}

impl Verifier for MultiEd25519PublicKey {
    type Signature = MultiEd25519Signature;

    fn verify(&self, message: &[u8], signature: &MultiEd25519Signature) -> bool {
        MultiEd25519PublicKey::verify(self, message, signature)
    }
}

impl fmt::Debug for MultiEd25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MultiEd25519PublicKey({}-of-{})",
            self.threshold,
            self.public_keys.len()
        )
    }
}

impl Serializable for MultiEd25519PublicKey {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        Ok(serializer.serialize_bytes(&self.to_bytes())?)
    }
}

impl Deserializable for MultiEd25519PublicKey {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Self::from_bytes(&deserializer.read_bytes()?)
    }
}

/// A multi-Ed25519 signature: member signatures plus the signer bitmap.
#[derive(Clone, PartialEq, Eq)]
pub struct MultiEd25519Signature {
    signatures: Vec<Ed25519Signature>,
    bitmap: [u8; BITMAP_LENGTH],
}

impl MultiEd25519Signature {
    /// Builds a signature from `(signer_index, signature)` pairs.
    ///
    /// Pairs may come in any order; they are stored by ascending index.
    /// Indices must be unique and below 32.
    pub fn new(mut signatures: Vec<(u8, Ed25519Signature)>) -> AptosResult<Self> {
        if signatures.is_empty() {
            return Err(AptosError::InvalidSignature(
                "multi-Ed25519 signature requires at least one signature".into(),
            ));
        }
        signatures.sort_by_key(|(index, _)| *index);

        let mut bitmap = [0u8; BITMAP_LENGTH];
        for (index, _) in &signatures {
            let index = usize::from(*index);
            if index >= MAX_NUM_OF_KEYS {
                return Err(AptosError::InvalidSignature(format!(
                    "signer index {index} out of range (max {})",
                    MAX_NUM_OF_KEYS - 1
                )));
            }
            if bitmap_get_bit(&bitmap, index) {
                return Err(AptosError::InvalidSignature(format!(
                    "duplicate signer index {index}"
                )));
            }
            bitmap_set_bit(&mut bitmap, index);
        }

        Ok(Self {
            signatures: signatures.into_iter().map(|(_, sig)| sig).collect(),
            bitmap,
        })
    }

    /// Parses `sig_0 || ... || sig_{m-1} || bitmap[4]`.
    ///
    /// The number of set bitmap bits must equal the number of signatures.
    pub fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        if bytes.len() < BITMAP_LENGTH {
            return Err(AptosError::InvalidSignature(format!(
                "multi-Ed25519 signature too short: {} bytes",
                bytes.len()
            )));
        }
        let (sig_bytes, bitmap_bytes) = bytes.split_at(bytes.len() - BITMAP_LENGTH);
        let mut bitmap = [0u8; BITMAP_LENGTH];
        bitmap.copy_from_slice(bitmap_bytes);

        if sig_bytes.len() % ED25519_SIGNATURE_LENGTH != 0 {
            return Err(AptosError::InvalidSignature(format!(
                "signature bytes length {} is not a multiple of {ED25519_SIGNATURE_LENGTH}",
                sig_bytes.len()
            )));
        }
        let count = sig_bytes.len() / ED25519_SIGNATURE_LENGTH;
        let set_bits = bitmap_count_ones(&bitmap);
        if count != set_bits {
            return Err(AptosError::InvalidSignature(format!(
                "bitmap marks {set_bits} signers but {count} signatures are present"
            )));
        }

        let signatures = sig_bytes
            .chunks_exact(ED25519_SIGNATURE_LENGTH)
            .map(Ed25519Signature::from_bytes)
            .collect::<AptosResult<Vec<_>>>()?;
        Ok(Self { signatures, bitmap })
    }

    /// Returns `sig_0 || ... || sig_{m-1} || bitmap[4]`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes =
            Vec::with_capacity(self.signatures.len() * ED25519_SIGNATURE_LENGTH + BITMAP_LENGTH);
        for sig in &self.signatures {
            bytes.extend_from_slice(&sig.to_bytes());
        }
        bytes.extend_from_slice(&self.bitmap);
        bytes
    }

    /// Returns the number of member signatures.
    pub fn num_signatures(&self) -> usize {
        self.signatures.len()
    }

    /// Returns the member signatures in ascending signer order.
    pub fn signatures(&self) -> &[Ed25519Signature] {
        &self.signatures
    }

    /// Returns the signer bitmap.
    pub fn bitmap(&self) -> &[u8; BITMAP_LENGTH] {
        &self.bitmap
    }

    /// Returns true if key `index` contributed a signature.
    pub fn has_signature(&self, index: u8) -> bool {
        usize::from(index) < MAX_NUM_OF_KEYS && bitmap_get_bit(&self.bitmap, usize::from(index))
    }

    /// Returns the indices of contributing keys, ascending.
    pub fn signer_indices(&self) -> Vec<u8> {
        (0..MAX_NUM_OF_KEYS as u8)
            .filter(|i| self.has_signature(*i))
            .collect()
    }
}

impl fmt::Debug for MultiEd25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MultiEd25519Signature({} signatures, bitmap=0x{})",
            self.signatures.len(),
            hex::encode(self.bitmap)
        )
    }
}

impl Serializable for MultiEd25519Signature {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        Ok(serializer.serialize_bytes(&self.to_bytes())?)
    }
}

impl Deserializable for MultiEd25519Signature {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Self::from_bytes(&deserializer.read_bytes()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Ed25519PrivateKey;

    fn keys(n: usize) -> (Vec<Ed25519PrivateKey>, Vec<Ed25519PublicKey>) {
        let private: Vec<_> = (0..n).map(|_| Ed25519PrivateKey::generate()).collect();
        let public = private.iter().map(|k| k.public_key()).collect();
        (private, public)
    }

    #[test]
    fn test_key_count_and_threshold_bounds() {
        let (_, public) = keys(33);
        assert!(matches!(
            MultiEd25519PublicKey::new(public[..1].to_vec(), 1),
            Err(AptosError::InvalidPublicKey(_))
        ));
        assert!(matches!(
            MultiEd25519PublicKey::new(public.clone(), 1),
            Err(AptosError::InvalidPublicKey(_))
        ));
        assert!(matches!(
            MultiEd25519PublicKey::new(public[..3].to_vec(), 0),
            Err(AptosError::InvalidThreshold(_))
        ));
        assert!(matches!(
            MultiEd25519PublicKey::new(public[..3].to_vec(), 4),
            Err(AptosError::InvalidThreshold(_))
        ));
        assert!(MultiEd25519PublicKey::new(public[..32].to_vec(), 32).is_ok());
    }

    #[test]
    fn test_bitmap_is_msb_first() {
        let (private, _) = keys(1);
        let sig = private[0].sign(b"m");
        let multi = MultiEd25519Signature::new(vec![(0, sig), (9, sig), (31, sig)]).unwrap();
        assert_eq!(multi.bitmap(), &[0b1000_0000, 0b0100_0000, 0, 0b0000_0001]);
        assert_eq!(multi.signer_indices(), vec![0, 9, 31]);
    }

    #[test]
    fn test_signature_new_rejects_bad_indices() {
        let (private, _) = keys(1);
        let sig = private[0].sign(b"m");
        assert!(MultiEd25519Signature::new(vec![]).is_err());
        assert!(MultiEd25519Signature::new(vec![(32, sig)]).is_err());
        assert!(MultiEd25519Signature::new(vec![(1, sig), (1, sig)]).is_err());
    }

    #[test]
    fn test_threshold_verification() {
        let (private, public) = keys(3);
        let multi_pk = MultiEd25519PublicKey::new(public, 2).unwrap();
        let message = b"test message";

        let two = MultiEd25519Signature::new(vec![
            (2, private[2].sign(message)),
            (0, private[0].sign(message)),
        ])
        .unwrap();
        assert!(multi_pk.verify(message, &two));
        assert!(!multi_pk.verify(b"other message", &two));

        let one = MultiEd25519Signature::new(vec![(1, private[1].sign(message))]).unwrap();
        assert!(!multi_pk.verify(message, &one));
    }

    #[test]
    fn test_wrong_index_fails() {
        let (private, public) = keys(3);
        let multi_pk = MultiEd25519PublicKey::new(public, 1).unwrap();
        // Key 0's signature claimed for index 1
        let sig = MultiEd25519Signature::new(vec![(1, private[0].sign(b"m"))]).unwrap();
        assert!(!multi_pk.verify(b"m", &sig));
        // Index beyond the key count
        let sig = MultiEd25519Signature::new(vec![(5, private[0].sign(b"m"))]).unwrap();
        assert!(!multi_pk.verify(b"m", &sig));
    }

    #[test]
    fn test_from_bytes_popcount_mismatch() {
        let (private, _) = keys(2);
        let sig = MultiEd25519Signature::new(vec![
            (0, private[0].sign(b"m")),
            (1, private[1].sign(b"m")),
        ])
        .unwrap();
        let mut bytes = sig.to_bytes();
        assert_eq!(MultiEd25519Signature::from_bytes(&bytes).unwrap(), sig);

        // Clear bit for index 1
        let last = bytes.len() - BITMAP_LENGTH;
        bytes[last] = 0b1000_0000;
        assert!(matches!(
            MultiEd25519Signature::from_bytes(&bytes),
            Err(AptosError::InvalidSignature(_))
        ));
    }

    #[test]
    fn test_public_key_bytes_layout() {
        let (_, public) = keys(3);
        let multi_pk = MultiEd25519PublicKey::new(public.clone(), 2).unwrap();
        let bytes = multi_pk.to_bytes();
        assert_eq!(bytes.len(), 3 * 32 + 1);
        assert_eq!(&bytes[32..64], &public[1].to_bytes());
        assert_eq!(bytes[96], 2);
        assert_eq!(MultiEd25519PublicKey::from_bytes(&bytes).unwrap(), multi_pk);

        let mut bad_threshold = bytes.clone();
        bad_threshold[96] = 0;
        assert!(matches!(
            MultiEd25519PublicKey::from_bytes(&bad_threshold),
            Err(AptosError::InvalidThreshold(_))
        ));
    }
}
