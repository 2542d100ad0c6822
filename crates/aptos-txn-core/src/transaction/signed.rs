//! Signed transactions.

use crate::bcs::{self, Deserializable, Deserializer, Serializable, Serializer};
use crate::crypto;
use crate::error::AptosResult;
use crate::transaction::authenticator::TransactionAuthenticator;
use crate::transaction::raw::RawTransaction;
use crate::types::{AccountAddress, HashValue};

/// Content type for submitting a BCS-encoded signed transaction.
pub const SIGNED_TRANSACTION_CONTENT_TYPE: &str = "application/x.aptos.signed_transaction+bcs";

/// Domain separator of the transaction hash.
const TRANSACTION_SALT: &[u8] = b"APTOS::Transaction";

/// Tag of the user transaction variant inside the hashed transaction enum.
const USER_TRANSACTION_VARIANT: u8 = 0;

/// A signed transaction ready for submission.
///
/// `to_bcs` produces exactly the request body a fullnode accepts with
/// [`SIGNED_TRANSACTION_CONTENT_TYPE`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    raw_txn: RawTransaction,
    authenticator: TransactionAuthenticator,
}

impl SignedTransaction {
    /// Creates a new signed transaction.
    pub fn new(raw_txn: RawTransaction, authenticator: TransactionAuthenticator) -> Self {
        Self {
            raw_txn,
            authenticator,
        }
    }

    /// The signed raw transaction.
    pub fn raw_transaction(&self) -> &RawTransaction {
        &self.raw_txn
    }

    /// The authenticator.
    pub fn authenticator(&self) -> &TransactionAuthenticator {
        &self.authenticator
    }

    /// Returns the sender address.
    pub fn sender(&self) -> AccountAddress {
        self.raw_txn.sender
    }

    /// Returns the sequence number.
    pub fn sequence_number(&self) -> u64 {
        self.raw_txn.sequence_number
    }

    /// Serializes this signed transaction to BCS bytes.
    pub fn to_bcs(&self) -> AptosResult<Vec<u8>> {
        bcs::to_bytes(self)
    }

    /// Decodes a signed transaction from BCS bytes.
    pub fn from_bcs(bytes: &[u8]) -> AptosResult<Self> {
        bcs::from_bytes(bytes)
    }

    /// Computes the transaction hash the chain indexes this transaction by.
    pub fn hash(&self) -> AptosResult<HashValue> {
        let bcs_bytes = self.to_bcs()?;
        let prefix = crypto::sha3_256(TRANSACTION_SALT);
        Ok(HashValue::new(crypto::sha3_256_of([
            prefix.as_slice(),
            &[USER_TRANSACTION_VARIANT],
            &bcs_bytes,
        ])))
    }

    /// Checks every signature in the authenticator against the raw transaction.
    pub fn verify(&self) -> bool {
        self.authenticator.verify(&self.raw_txn)
    }
}

impl Serializable for SignedTransaction {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        self.raw_txn.serialize(serializer)?;
        self.authenticator.serialize(serializer)
    }
}

impl Deserializable for SignedTransaction {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            raw_txn: RawTransaction::deserialize(deserializer)?,
            authenticator: TransactionAuthenticator::deserialize(deserializer)?,
        })
    }
}
