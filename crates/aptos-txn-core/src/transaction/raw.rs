//! The raw transaction family and its signing messages.
//!
//! A raw transaction is what a signer commits to. The bytes actually signed
//! are `SHA3-256(domain) || BCS(txn)`, where the domain separator tells the
//! chain which member of the family it is looking at:
//!
//! | Type | Domain | BCS prefix |
//! |---|---|---|
//! | [`RawTransaction`] | `APTOS::RawTransaction` | none |
//! | [`MultiAgentRawTransaction`] | `APTOS::RawTransactionWithData` | `0x00` |
//! | [`FeePayerRawTransaction`] | `APTOS::RawTransactionWithData` | `0x01` |

use crate::bcs::{self, BcsError, Deserializable, Deserializer, Serializable, Serializer};
use crate::crypto::{self, Signer, Verifier};
use crate::error::AptosResult;
use crate::transaction::payload::TransactionPayload;
use crate::types::{AccountAddress, ChainId};
use tracing::trace;

/// Domain separator for plain raw transactions.
pub const RAW_TRANSACTION_SALT: &[u8] = b"APTOS::RawTransaction";

/// Domain separator shared by the multi-agent and fee-payer forms.
pub const RAW_TRANSACTION_WITH_DATA_SALT: &[u8] = b"APTOS::RawTransactionWithData";

const MULTI_AGENT_VARIANT: u32 = 0;
const FEE_PAYER_VARIANT: u32 = 1;

/// A value that is signed as `SHA3-256(DOMAIN_SEPARATOR) || BCS(self)`.
///
/// Every member of the raw transaction family implements this, so signing
/// and verification code never needs to know which member it holds.
pub trait SigningMessage: Serializable {
    /// The domain separator hashed into the message prefix.
    const DOMAIN_SEPARATOR: &'static [u8];

    /// The 32-byte prefix, `SHA3-256(DOMAIN_SEPARATOR)`.
    fn prehash(&self) -> [u8; 32] {
        crypto::sha3_256(Self::DOMAIN_SEPARATOR)
    }

    /// The full message a key signs.
    fn keyed(&self) -> AptosResult<Vec<u8>> {
        let body = bcs::to_bytes(self)?;
        Ok(crypto::signing_message(Self::DOMAIN_SEPARATOR, &body))
    }

    /// Signs the message with `signer`.
    fn sign<S: Signer>(&self, signer: &S) -> AptosResult<S::Signature> {
        Ok(signer.sign(&self.keyed()?))
    }

    /// Checks `signature` over the message under `public_key`.
    fn verify<V: Verifier>(&self, public_key: &V, signature: &V::Signature) -> bool {
        match self.keyed() {
            Ok(message) => public_key.verify(&message, signature),
            Err(err) => {
                trace!(error = %err, "could not build signing message");
                false
            }
        }
    }
}

/// The raw transaction that a client signs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawTransaction {
    /// Sender's address.
    pub sender: AccountAddress,
    /// Sequence number of this transaction.
    pub sequence_number: u64,
    /// The transaction payload.
    pub payload: TransactionPayload,
    /// Maximum gas units the sender is willing to pay.
    pub max_gas_amount: u64,
    /// Price per gas unit in octas.
    pub gas_unit_price: u64,
    /// Expiration time in seconds since Unix epoch.
    pub expiration_timestamp_secs: u64,
    /// Chain ID to prevent cross-chain replay.
    pub chain_id: ChainId,
}

impl RawTransaction {
    /// Creates a new raw transaction.
    pub fn new(
        sender: AccountAddress,
        sequence_number: u64,
        payload: TransactionPayload,
        max_gas_amount: u64,
        gas_unit_price: u64,
        expiration_timestamp_secs: u64,
        chain_id: ChainId,
    ) -> Self {
        Self {
            sender,
            sequence_number,
            payload,
            max_gas_amount,
            gas_unit_price,
            expiration_timestamp_secs,
            chain_id,
        }
    }

    /// Serializes this transaction to BCS bytes.
    pub fn to_bcs(&self) -> AptosResult<Vec<u8>> {
        bcs::to_bytes(self)
    }

    /// Decodes a transaction from BCS bytes.
    pub fn from_bcs(bytes: &[u8]) -> AptosResult<Self> {
        bcs::from_bytes(bytes)
    }
}

impl Serializable for RawTransaction {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        self.sender.serialize(serializer)?;
        serializer.serialize_u64(self.sequence_number);
        self.payload.serialize(serializer)?;
        serializer.serialize_u64(self.max_gas_amount);
        serializer.serialize_u64(self.gas_unit_price);
        serializer.serialize_u64(self.expiration_timestamp_secs);
        self.chain_id.serialize(serializer)
    }
}

impl Deserializable for RawTransaction {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            sender: AccountAddress::deserialize(deserializer)?,
            sequence_number: deserializer.read_u64()?,
            payload: TransactionPayload::deserialize(deserializer)?,
            max_gas_amount: deserializer.read_u64()?,
            gas_unit_price: deserializer.read_u64()?,
            expiration_timestamp_secs: deserializer.read_u64()?,
            chain_id: ChainId::deserialize(deserializer)?,
        })
    }
}

impl SigningMessage for RawTransaction {
    const DOMAIN_SEPARATOR: &'static [u8] = RAW_TRANSACTION_SALT;
}

fn expect_variant(
    deserializer: &mut Deserializer<'_>,
    type_name: &'static str,
    expected: u32,
) -> AptosResult<()> {
    match deserializer.read_variant_index()? {
        index if index == expected => Ok(()),
        index => Err(BcsError::InvalidVariant { type_name, index }.into()),
    }
}

/// A transaction signed by the sender and one or more secondary signers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiAgentRawTransaction {
    /// The raw transaction.
    pub raw_txn: RawTransaction,
    /// Secondary signer addresses, in signing order.
    pub secondary_signer_addresses: Vec<AccountAddress>,
}

impl MultiAgentRawTransaction {
    /// Creates a new multi-agent transaction.
    pub fn new(raw_txn: RawTransaction, secondary_signer_addresses: Vec<AccountAddress>) -> Self {
        Self {
            raw_txn,
            secondary_signer_addresses,
        }
    }
}

impl Serializable for MultiAgentRawTransaction {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.serialize_variant_index(MULTI_AGENT_VARIANT);
        self.raw_txn.serialize(serializer)?;
        serializer.serialize_seq(&self.secondary_signer_addresses)
    }
}

impl Deserializable for MultiAgentRawTransaction {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        expect_variant(deserializer, "MultiAgentRawTransaction", MULTI_AGENT_VARIANT)?;
        Ok(Self {
            raw_txn: RawTransaction::deserialize(deserializer)?,
            secondary_signer_addresses: deserializer.read_seq()?,
        })
    }
}

impl SigningMessage for MultiAgentRawTransaction {
    const DOMAIN_SEPARATOR: &'static [u8] = RAW_TRANSACTION_WITH_DATA_SALT;
}

/// A transaction whose gas is paid by a separate fee payer account.
///
/// Signers who do not know the fee payer in advance sign with the `0x0`
/// placeholder address; the fee payer always signs with its own address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeePayerRawTransaction {
    /// The raw transaction.
    pub raw_txn: RawTransaction,
    /// Secondary signer addresses, in signing order.
    pub secondary_signer_addresses: Vec<AccountAddress>,
    /// The fee payer's address, or `0x0` when not yet known.
    pub fee_payer_address: AccountAddress,
}

impl FeePayerRawTransaction {
    /// Creates a fee payer transaction. A missing fee payer becomes `0x0`.
    pub fn new(
        raw_txn: RawTransaction,
        secondary_signer_addresses: Vec<AccountAddress>,
        fee_payer_address: Option<AccountAddress>,
    ) -> Self {
        Self {
            raw_txn,
            secondary_signer_addresses,
            fee_payer_address: fee_payer_address.unwrap_or(AccountAddress::ZERO),
        }
    }

    /// Returns the same transaction with the fee payer set to `fee_payer_address`.
    pub fn with_fee_payer(&self, fee_payer_address: AccountAddress) -> Self {
        Self {
            fee_payer_address,
            ..self.clone()
        }
    }

    /// True while the fee payer is the `0x0` placeholder.
    pub fn has_placeholder_fee_payer(&self) -> bool {
        self.fee_payer_address.is_zero()
    }
}

impl Serializable for FeePayerRawTransaction {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.serialize_variant_index(FEE_PAYER_VARIANT);
        self.raw_txn.serialize(serializer)?;
        serializer.serialize_seq(&self.secondary_signer_addresses)?;
        self.fee_payer_address.serialize(serializer)
    }
}

impl Deserializable for FeePayerRawTransaction {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        expect_variant(deserializer, "FeePayerRawTransaction", FEE_PAYER_VARIANT)?;
        Ok(Self {
            raw_txn: RawTransaction::deserialize(deserializer)?,
            secondary_signer_addresses: deserializer.read_seq()?,
            fee_payer_address: AccountAddress::deserialize(deserializer)?,
        })
    }
}

impl SigningMessage for FeePayerRawTransaction {
    const DOMAIN_SEPARATOR: &'static [u8] = RAW_TRANSACTION_WITH_DATA_SALT;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Ed25519PrivateKey;
    use crate::transaction::payload::EntryFunction;
    use crate::types::TypeTag;

    fn create_test_raw_transaction() -> RawTransaction {
        RawTransaction::new(
            AccountAddress::ONE,
            0,
            EntryFunction::builder("0x1::coin::transfer")
                .unwrap()
                .type_arg(TypeTag::aptos_coin())
                .build()
                .into(),
            100_000,
            100,
            1_000_000_000,
            ChainId::testnet(),
        )
    }

    #[test]
    fn test_signing_message_layout() {
        let txn = create_test_raw_transaction();
        let message = txn.keyed().unwrap();
        let body = txn.to_bcs().unwrap();
        assert_eq!(message.len(), 32 + body.len());
        assert_eq!(&message[..32], &crypto::sha3_256(b"APTOS::RawTransaction"));
        assert_eq!(&message[32..], body.as_slice());
        assert_eq!(txn.prehash(), crypto::sha3_256(b"APTOS::RawTransaction"));
    }

    #[test]
    fn test_raw_transaction_tail_fields() {
        let txn = create_test_raw_transaction();
        let bytes = txn.to_bcs().unwrap();
        let n = bytes.len();
        // max_gas || gas_price || expiration || chain_id
        assert_eq!(&bytes[n - 25..n - 17], &100_000u64.to_le_bytes());
        assert_eq!(&bytes[n - 17..n - 9], &100u64.to_le_bytes());
        assert_eq!(&bytes[n - 9..n - 1], &1_000_000_000u64.to_le_bytes());
        assert_eq!(bytes[n - 1], 2);
        assert_eq!(RawTransaction::from_bcs(&bytes).unwrap(), txn);
    }

    #[test]
    fn test_multi_agent_discriminant() {
        let txn = create_test_raw_transaction();
        let multi = MultiAgentRawTransaction::new(txn.clone(), vec![AccountAddress::THREE]);
        let bytes = bcs::to_bytes(&multi).unwrap();
        assert_eq!(bytes[0], 0);
        assert_eq!(&bytes[1..1 + txn.to_bcs().unwrap().len()], txn.to_bcs().unwrap().as_slice());

        let message = multi.keyed().unwrap();
        assert_eq!(
            &message[..32],
            &crypto::sha3_256(b"APTOS::RawTransactionWithData")
        );
        assert_eq!(bcs::from_bytes::<MultiAgentRawTransaction>(&bytes).unwrap(), multi);
    }

    #[test]
    fn test_fee_payer_defaults_to_placeholder() {
        let txn = create_test_raw_transaction();
        let fee_payer = FeePayerRawTransaction::new(txn, vec![], None);
        assert!(fee_payer.has_placeholder_fee_payer());

        let bytes = bcs::to_bytes(&fee_payer).unwrap();
        assert_eq!(bytes[0], 1);
        assert_eq!(&bytes[bytes.len() - 32..], &[0u8; 32]);

        let real = fee_payer.with_fee_payer(AccountAddress::THREE);
        assert!(!real.has_placeholder_fee_payer());
        assert_ne!(fee_payer.keyed().unwrap(), real.keyed().unwrap());
    }

    #[test]
    fn test_wrapped_forms_reject_wrong_discriminant() {
        let txn = create_test_raw_transaction();
        let multi = bcs::to_bytes(&MultiAgentRawTransaction::new(txn, vec![])).unwrap();
        assert!(bcs::from_bytes::<FeePayerRawTransaction>(&multi).is_err());
    }

    #[test]
    fn test_sign_and_verify_through_trait() {
        let key = Ed25519PrivateKey::generate();
        let txn = create_test_raw_transaction();
        let signature = txn.sign(&key).unwrap();
        assert!(txn.verify(&key.public_key(), &signature));

        let multi = MultiAgentRawTransaction::new(txn.clone(), vec![]);
        assert!(!multi.verify(&key.public_key(), &signature));

        let mut other = txn;
        other.sequence_number += 1;
        assert!(!other.verify(&key.public_key(), &signature));
    }
}
