//! Hash functions used by the signing pipeline.

use sha3::{Digest, Sha3_256};

/// Computes the SHA3-256 hash of the input.
///
/// ```rust
/// use aptos_txn_core::crypto::sha3_256;
///
/// assert_eq!(sha3_256(b"hello world").len(), 32);
/// ```
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    Sha3_256::digest(data).into()
}

/// Computes the SHA3-256 hash of several byte slices fed in order.
pub fn sha3_256_of<I, T>(items: I) -> [u8; 32]
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut hasher = Sha3_256::new();
    for item in items {
        hasher.update(item.as_ref());
    }
    hasher.finalize().into()
}

/// Builds a signing message: `SHA3-256(domain) || body`.
///
/// The domain tag (for example `APTOS::RawTransaction`) is hashed, never the
/// body; the body bytes follow the 32-byte prefix unchanged.
pub fn signing_message(domain: &[u8], body: &[u8]) -> Vec<u8> {
    let prefix = sha3_256(domain);
    let mut message = Vec::with_capacity(prefix.len() + body.len());
    message.extend_from_slice(&prefix);
    message.extend_from_slice(body);
    message
}
