//! Transaction authenticators.
//!
//! An [`AccountAuthenticator`] proves one account approved a message. A
//! [`TransactionAuthenticator`] arranges one or more of them around a raw
//! transaction: just the sender, the sender plus secondary signers, or all
//! of those plus a fee payer.

use crate::bcs::{BcsError, Deserializable, Deserializer, Serializable, Serializer};
use crate::crypto::{
    AnyPublicKey, AnySignature, AuthenticationKey, Ed25519PublicKey, Ed25519Signature,
    MultiEd25519PublicKey, MultiEd25519Signature,
};
use crate::error::AptosResult;
use crate::transaction::raw::{
    FeePayerRawTransaction, MultiAgentRawTransaction, RawTransaction, SigningMessage,
};
use crate::types::AccountAddress;
use std::iter;
use tracing::{debug, trace};

/// An authenticator for a single account.
///
/// Wire tags: Ed25519=0, MultiEd25519=1, SingleKey=2.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccountAuthenticator {
    /// Ed25519 authentication.
    Ed25519 {
        /// The public key.
        public_key: Ed25519PublicKey,
        /// The signature.
        signature: Ed25519Signature,
    },
    /// K-of-N multi-Ed25519 authentication.
    MultiEd25519 {
        /// The multi-key public key.
        public_key: MultiEd25519PublicKey,
        /// The bitmap signature.
        signature: MultiEd25519Signature,
    },
    /// Single-key authentication (Ed25519, Secp256k1 or keyless).
    SingleKey {
        /// The tagged public key.
        public_key: AnyPublicKey,
        /// The tagged signature.
        signature: AnySignature,
    },
}

impl AccountAuthenticator {
    /// Creates an Ed25519 account authenticator.
    pub fn ed25519(public_key: Ed25519PublicKey, signature: Ed25519Signature) -> Self {
        Self::Ed25519 {
            public_key,
            signature,
        }
    }

    /// Creates a multi-Ed25519 account authenticator.
    pub fn multi_ed25519(
        public_key: MultiEd25519PublicKey,
        signature: MultiEd25519Signature,
    ) -> Self {
        Self::MultiEd25519 {
            public_key,
            signature,
        }
    }

    /// Creates a single-key account authenticator.
    pub fn single_key(public_key: AnyPublicKey, signature: AnySignature) -> Self {
        Self::SingleKey {
            public_key,
            signature,
        }
    }

    /// Checks the signature over `message`.
    pub fn verify(&self, message: &[u8]) -> bool {
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => public_key.verify(message, signature),
            Self::MultiEd25519 {
                public_key,
                signature,
            } => public_key.verify(message, signature),
            Self::SingleKey {
                public_key,
                signature,
            } => public_key.verify(message, signature),
        }
    }

    /// The authentication key of the public key carried here.
    pub fn authentication_key(&self) -> AptosResult<AuthenticationKey> {
        match self {
            Self::Ed25519 { public_key, .. } => Ok(public_key.authentication_key()),
            Self::MultiEd25519 { public_key, .. } => Ok(public_key.authentication_key()),
            Self::SingleKey { public_key, .. } => public_key.authentication_key(),
        }
    }

    pub(crate) fn scheme_name(&self) -> &'static str {
        match self {
            Self::Ed25519 { .. } => "ed25519",
            Self::MultiEd25519 { .. } => "multi_ed25519",
            Self::SingleKey { .. } => "single_key",
        }
    }
}

impl Serializable for AccountAuthenticator {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => {
                serializer.serialize_variant_index(0);
                public_key.serialize(serializer)?;
                signature.serialize(serializer)
            }
            Self::MultiEd25519 {
                public_key,
                signature,
            } => {
                serializer.serialize_variant_index(1);
                public_key.serialize(serializer)?;
                signature.serialize(serializer)
            }
            Self::SingleKey {
                public_key,
                signature,
            } => {
                serializer.serialize_variant_index(2);
                public_key.serialize(serializer)?;
                signature.serialize(serializer)
            }
        }
    }
}

impl Deserializable for AccountAuthenticator {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        match deserializer.read_variant_index()? {
            0 => Ok(Self::Ed25519 {
                public_key: Deserializable::deserialize(deserializer)?,
                signature: Deserializable::deserialize(deserializer)?,
            }),
            1 => Ok(Self::MultiEd25519 {
                public_key: Deserializable::deserialize(deserializer)?,
                signature: Deserializable::deserialize(deserializer)?,
            }),
            2 => Ok(Self::SingleKey {
                public_key: Deserializable::deserialize(deserializer)?,
                signature: Deserializable::deserialize(deserializer)?,
            }),
            index => Err(BcsError::InvalidVariant {
                type_name: "AccountAuthenticator",
                index,
            }
            .into()),
        }
    }
}

/// An authenticator for a whole transaction.
///
/// Wire tags: Ed25519=0, MultiEd25519=1, MultiAgent=2, FeePayer=3,
/// SingleSender=4. Secondary signer addresses and their authenticators are
/// parallel sequences of equal length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionAuthenticator {
    /// Ed25519 single-key authentication.
    Ed25519 {
        /// The public key.
        public_key: Ed25519PublicKey,
        /// The signature.
        signature: Ed25519Signature,
    },
    /// Multi-Ed25519 authentication.
    MultiEd25519 {
        /// The multi-key public key.
        public_key: MultiEd25519PublicKey,
        /// The bitmap signature.
        signature: MultiEd25519Signature,
    },
    /// Sender plus secondary signers.
    MultiAgent {
        /// The sender's authenticator.
        sender: AccountAuthenticator,
        /// Secondary signer addresses.
        secondary_signer_addresses: Vec<AccountAddress>,
        /// Secondary signers' authenticators.
        secondary_signers: Vec<AccountAuthenticator>,
    },
    /// Sender, secondary signers and a separate gas payer.
    FeePayer {
        /// The sender's authenticator.
        sender: AccountAuthenticator,
        /// Secondary signer addresses.
        secondary_signer_addresses: Vec<AccountAddress>,
        /// Secondary signers' authenticators.
        secondary_signers: Vec<AccountAuthenticator>,
        /// The fee payer's address.
        fee_payer_address: AccountAddress,
        /// The fee payer's authenticator.
        fee_payer_signer: AccountAuthenticator,
    },
    /// A single sender using any account authenticator.
    SingleSender {
        /// The sender's authenticator.
        sender: AccountAuthenticator,
    },
}

fn unzip_signers(
    secondary_signers: Vec<(AccountAddress, AccountAuthenticator)>,
) -> (Vec<AccountAddress>, Vec<AccountAuthenticator>) {
    secondary_signers.into_iter().unzip()
}

fn check_signer(role: &'static str, authenticator: &AccountAuthenticator, message: &[u8]) -> bool {
    let ok = authenticator.verify(message);
    if !ok {
        debug!(
            role,
            scheme = authenticator.scheme_name(),
            "authenticator failed verification"
        );
    }
    ok
}

impl TransactionAuthenticator {
    /// Creates an Ed25519 authenticator.
    pub fn ed25519(public_key: Ed25519PublicKey, signature: Ed25519Signature) -> Self {
        Self::Ed25519 {
            public_key,
            signature,
        }
    }

    /// Creates a multi-Ed25519 authenticator.
    pub fn multi_ed25519(
        public_key: MultiEd25519PublicKey,
        signature: MultiEd25519Signature,
    ) -> Self {
        Self::MultiEd25519 {
            public_key,
            signature,
        }
    }

    /// Creates a multi-agent authenticator from ordered `(address, authenticator)` pairs.
    pub fn multi_agent(
        sender: AccountAuthenticator,
        secondary_signers: Vec<(AccountAddress, AccountAuthenticator)>,
    ) -> Self {
        let (secondary_signer_addresses, secondary_signers) = unzip_signers(secondary_signers);
        Self::MultiAgent {
            sender,
            secondary_signer_addresses,
            secondary_signers,
        }
    }

    /// Creates a fee payer authenticator from ordered `(address, authenticator)` pairs.
    pub fn fee_payer(
        sender: AccountAuthenticator,
        secondary_signers: Vec<(AccountAddress, AccountAuthenticator)>,
        fee_payer_address: AccountAddress,
        fee_payer_signer: AccountAuthenticator,
    ) -> Self {
        let (secondary_signer_addresses, secondary_signers) = unzip_signers(secondary_signers);
        Self::FeePayer {
            sender,
            secondary_signer_addresses,
            secondary_signers,
            fee_payer_address,
            fee_payer_signer,
        }
    }

    /// Creates a single sender authenticator.
    pub fn single_sender(sender: AccountAuthenticator) -> Self {
        Self::SingleSender { sender }
    }

    /// Addresses of the secondary signers, empty for single-signer variants.
    pub fn secondary_signer_addresses(&self) -> &[AccountAddress] {
        match self {
            Self::MultiAgent {
                secondary_signer_addresses,
                ..
            }
            | Self::FeePayer {
                secondary_signer_addresses,
                ..
            } => secondary_signer_addresses,
            _ => &[],
        }
    }

    /// The fee payer's address, if this is a fee payer authenticator.
    pub fn fee_payer_address(&self) -> Option<AccountAddress> {
        match self {
            Self::FeePayer {
                fee_payer_address, ..
            } => Some(*fee_payer_address),
            _ => None,
        }
    }

    /// Checks every signature against `raw_txn`.
    ///
    /// Signers are checked sender first, then secondaries in order, then the
    /// fee payer; the first failure ends the check.
    pub fn verify(&self, raw_txn: &RawTransaction) -> bool {
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => raw_txn.verify(public_key, signature),
            Self::MultiEd25519 {
                public_key,
                signature,
            } => raw_txn.verify(public_key, signature),
            Self::SingleSender { sender } => match raw_txn.keyed() {
                Ok(message) => check_signer("sender", sender, &message),
                Err(_) => false,
            },
            Self::MultiAgent {
                sender,
                secondary_signer_addresses,
                secondary_signers,
            } => {
                if secondary_signer_addresses.len() != secondary_signers.len() {
                    trace!("secondary signer count does not match address count");
                    return false;
                }
                let message = match MultiAgentRawTransaction::new(
                    raw_txn.clone(),
                    secondary_signer_addresses.clone(),
                )
                .keyed()
                {
                    Ok(message) => message,
                    Err(_) => return false,
                };
                check_signer("sender", sender, &message)
                    && secondary_signers
                        .iter()
                        .all(|signer| check_signer("secondary", signer, &message))
            }
            Self::FeePayer {
                sender,
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_address,
                fee_payer_signer,
            } => {
                if secondary_signer_addresses.len() != secondary_signers.len() {
                    trace!("secondary signer count does not match address count");
                    return false;
                }
                let placeholder = FeePayerRawTransaction::new(
                    raw_txn.clone(),
                    secondary_signer_addresses.clone(),
                    None,
                );
                let actual = placeholder.with_fee_payer(*fee_payer_address);
                let (placeholder_message, actual_message) =
                    match (placeholder.keyed(), actual.keyed()) {
                        (Ok(p), Ok(a)) => (p, a),
                        _ => return false,
                    };

                // Signers that did not sign the placeholder form must have
                // signed the one naming the real fee payer.
                let signers = iter::once(("sender", sender))
                    .chain(secondary_signers.iter().map(|s| ("secondary", s)));
                let mut remaining = Vec::new();
                for (role, signer) in signers {
                    if !signer.verify(&placeholder_message) {
                        trace!(role, "signer did not sign the placeholder fee payer form");
                        remaining.push((role, signer));
                    }
                }
                remaining.push(("fee_payer", fee_payer_signer));
                remaining
                    .into_iter()
                    .all(|(role, signer)| check_signer(role, signer, &actual_message))
            }
        }
    }
}

impl Serializable for TransactionAuthenticator {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => {
                serializer.serialize_variant_index(0);
                public_key.serialize(serializer)?;
                signature.serialize(serializer)
            }
            Self::MultiEd25519 {
                public_key,
                signature,
            } => {
                serializer.serialize_variant_index(1);
                public_key.serialize(serializer)?;
                signature.serialize(serializer)
            }
            Self::MultiAgent {
                sender,
                secondary_signer_addresses,
                secondary_signers,
            } => {
                serializer.serialize_variant_index(2);
                sender.serialize(serializer)?;
                serializer.serialize_seq(secondary_signer_addresses)?;
                serializer.serialize_seq(secondary_signers)
            }
            Self::FeePayer {
                sender,
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_address,
                fee_payer_signer,
            } => {
                serializer.serialize_variant_index(3);
                sender.serialize(serializer)?;
                serializer.serialize_seq(secondary_signer_addresses)?;
                serializer.serialize_seq(secondary_signers)?;
                fee_payer_address.serialize(serializer)?;
                fee_payer_signer.serialize(serializer)
            }
            Self::SingleSender { sender } => {
                serializer.serialize_variant_index(4);
                sender.serialize(serializer)
            }
        }
    }
}

fn read_secondary_signers(
    deserializer: &mut Deserializer<'_>,
) -> AptosResult<(Vec<AccountAddress>, Vec<AccountAuthenticator>)> {
    let addresses: Vec<AccountAddress> = deserializer.read_seq()?;
    let signers: Vec<AccountAuthenticator> = deserializer.read_seq()?;
    if addresses.len() != signers.len() {
        return Err(BcsError::LengthMismatch {
            expected: addresses.len(),
            actual: signers.len(),
        }
        .into());
    }
    Ok((addresses, signers))
}

impl Deserializable for TransactionAuthenticator {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        match deserializer.read_variant_index()? {
            0 => Ok(Self::Ed25519 {
                public_key: Deserializable::deserialize(deserializer)?,
                signature: Deserializable::deserialize(deserializer)?,
            }),
            1 => Ok(Self::MultiEd25519 {
                public_key: Deserializable::deserialize(deserializer)?,
                signature: Deserializable::deserialize(deserializer)?,
            }),
            2 => {
                let sender = AccountAuthenticator::deserialize(deserializer)?;
                let (secondary_signer_addresses, secondary_signers) =
                    read_secondary_signers(deserializer)?;
                Ok(Self::MultiAgent {
                    sender,
                    secondary_signer_addresses,
                    secondary_signers,
                })
            }
            3 => {
                let sender = AccountAuthenticator::deserialize(deserializer)?;
                let (secondary_signer_addresses, secondary_signers) =
                    read_secondary_signers(deserializer)?;
                Ok(Self::FeePayer {
                    sender,
                    secondary_signer_addresses,
                    secondary_signers,
                    fee_payer_address: AccountAddress::deserialize(deserializer)?,
                    fee_payer_signer: AccountAuthenticator::deserialize(deserializer)?,
                })
            }
            4 => Ok(Self::SingleSender {
                sender: AccountAuthenticator::deserialize(deserializer)?,
            }),
            index => Err(BcsError::InvalidVariant {
                type_name: "TransactionAuthenticator",
                index,
            }
            .into()),
        }
    }
}

/// Wraps a lone account authenticator as the sender's transaction authenticator.
///
/// Ed25519 and multi-Ed25519 keep their legacy top-level tags; single-key
/// authenticators travel as a single sender.
impl From<AccountAuthenticator> for TransactionAuthenticator {
    fn from(authenticator: AccountAuthenticator) -> Self {
        match authenticator {
            AccountAuthenticator::Ed25519 {
                public_key,
                signature,
            } => Self::Ed25519 {
                public_key,
                signature,
            },
            AccountAuthenticator::MultiEd25519 {
                public_key,
                signature,
            } => Self::MultiEd25519 {
                public_key,
                signature,
            },
            sender @ AccountAuthenticator::SingleKey { .. } => Self::SingleSender { sender },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bcs;
    use crate::crypto::{Ed25519PrivateKey, Secp256k1PrivateKey};
    use crate::error::AptosError;
    use crate::transaction::payload::EntryFunction;
    use crate::types::ChainId;

    fn raw_txn(sender: AccountAddress) -> RawTransaction {
        RawTransaction::new(
            sender,
            7,
            EntryFunction::builder("0x1::aptos_account::transfer")
                .unwrap()
                .arg(&AccountAddress::ONE)
                .unwrap()
                .arg(&1u64)
                .unwrap()
                .build()
                .into(),
            1_000,
            100,
            u64::MAX,
            ChainId::localnet(),
        )
    }

    fn ed25519_sign(key: &Ed25519PrivateKey, message: &[u8]) -> AccountAuthenticator {
        AccountAuthenticator::ed25519(key.public_key(), key.sign(message))
    }

    #[test]
    fn test_ed25519_layout() {
        let key = Ed25519PrivateKey::generate();
        let auth = TransactionAuthenticator::ed25519(key.public_key(), key.sign(b"m"));
        let bytes = bcs::to_bytes(&auth).unwrap();
        // variant + len + key + len + signature
        assert_eq!(bytes.len(), 1 + 1 + 32 + 1 + 64);
        assert_eq!(bytes[0], 0);
        assert_eq!(bytes[1], 32);
        assert_eq!(bytes[34], 64);
    }

    #[test]
    fn test_single_sender_with_secp256k1() {
        let key = Secp256k1PrivateKey::generate();
        let txn = raw_txn(AccountAddress::ONE);
        let message = txn.keyed().unwrap();
        let auth = TransactionAuthenticator::single_sender(AccountAuthenticator::single_key(
            key.public_key().into(),
            key.sign(&message).into(),
        ));
        assert!(auth.verify(&txn));

        let bytes = bcs::to_bytes(&auth).unwrap();
        assert_eq!(&bytes[..3], &[4, 2, 1]);
        assert_eq!(bcs::from_bytes::<TransactionAuthenticator>(&bytes).unwrap(), auth);
    }

    #[test]
    fn test_multi_agent_verify() {
        let sender = Ed25519PrivateKey::generate();
        let secondary = Ed25519PrivateKey::generate();
        let secondary_address = secondary.public_key().authentication_key().to_address();
        let txn = raw_txn(AccountAddress::ONE);
        let message = MultiAgentRawTransaction::new(txn.clone(), vec![secondary_address])
            .keyed()
            .unwrap();

        let auth = TransactionAuthenticator::multi_agent(
            ed25519_sign(&sender, &message),
            vec![(secondary_address, ed25519_sign(&secondary, &message))],
        );
        assert!(auth.verify(&txn));
        assert_eq!(auth.secondary_signer_addresses(), &[secondary_address]);

        // A plain raw transaction signature is not a multi-agent signature.
        let plain = txn.keyed().unwrap();
        let wrong = TransactionAuthenticator::multi_agent(
            ed25519_sign(&sender, &plain),
            vec![(secondary_address, ed25519_sign(&secondary, &message))],
        );
        assert!(!wrong.verify(&txn));
    }

    #[test]
    fn test_fee_payer_placeholder_and_real_signatures() {
        let sender = Ed25519PrivateKey::generate();
        let payer = Ed25519PrivateKey::generate();
        let payer_address = payer.public_key().authentication_key().to_address();
        let txn = raw_txn(AccountAddress::ONE);

        let placeholder = FeePayerRawTransaction::new(txn.clone(), vec![], None);
        let actual = placeholder.with_fee_payer(payer_address);
        let placeholder_message = placeholder.keyed().unwrap();
        let actual_message = actual.keyed().unwrap();

        let payer_auth = ed25519_sign(&payer, &actual_message);

        let via_placeholder = TransactionAuthenticator::fee_payer(
            ed25519_sign(&sender, &placeholder_message),
            vec![],
            payer_address,
            payer_auth.clone(),
        );
        assert!(via_placeholder.verify(&txn));

        let via_actual = TransactionAuthenticator::fee_payer(
            ed25519_sign(&sender, &actual_message),
            vec![],
            payer_address,
            payer_auth.clone(),
        );
        assert!(via_actual.verify(&txn));

        let payer_on_placeholder = TransactionAuthenticator::fee_payer(
            ed25519_sign(&sender, &placeholder_message),
            vec![],
            payer_address,
            ed25519_sign(&payer, &placeholder_message),
        );
        assert!(!payer_on_placeholder.verify(&txn));

        let tampered = TransactionAuthenticator::fee_payer(
            ed25519_sign(&sender, &placeholder_message),
            vec![],
            AccountAddress::THREE,
            payer_auth,
        );
        assert!(!tampered.verify(&txn));
        assert_eq!(tampered.fee_payer_address(), Some(AccountAddress::THREE));
    }

    #[test]
    fn test_mismatched_secondary_lengths_rejected() {
        let key = Ed25519PrivateKey::generate();
        let sender = ed25519_sign(&key, b"m");

        let mut bytes = vec![2u8];
        bytes.extend(bcs::to_bytes(&sender).unwrap());
        bytes.push(1);
        bytes.extend_from_slice(&[0u8; 32]);
        bytes.push(0);
        let err = bcs::from_bytes::<TransactionAuthenticator>(&bytes).unwrap_err();
        assert_eq!(
            err.as_bcs(),
            Some(&BcsError::LengthMismatch {
                expected: 1,
                actual: 0
            })
        );

        let manual = TransactionAuthenticator::MultiAgent {
            sender,
            secondary_signer_addresses: vec![AccountAddress::ONE],
            secondary_signers: vec![],
        };
        assert!(!manual.verify(&raw_txn(AccountAddress::ONE)));
    }

    #[test]
    fn test_unknown_account_authenticator_tag() {
        assert!(matches!(
            bcs::from_bytes::<AccountAuthenticator>(&[3]),
            Err(AptosError::Bcs(BcsError::InvalidVariant {
                type_name: "AccountAuthenticator",
                index: 3
            }))
        ));
    }

    #[test]
    fn test_from_account_authenticator() {
        let key = Ed25519PrivateKey::generate();
        let auth: TransactionAuthenticator = ed25519_sign(&key, b"m").into();
        assert!(matches!(auth, TransactionAuthenticator::Ed25519 { .. }));

        let secp = Secp256k1PrivateKey::generate();
        let single = AccountAuthenticator::single_key(
            secp.public_key().into(),
            secp.sign(b"m").into(),
        );
        let auth: TransactionAuthenticator = single.clone().into();
        assert_eq!(auth, TransactionAuthenticator::single_sender(single));
    }
}
