//! Transaction construction, signing and verification.
//!
//! A [`RawTransaction`] carries what the sender wants executed. Signing
//! happens over a domain-separated message ([`SigningMessage`]), either of
//! the raw transaction alone or of a [`MultiAgentRawTransaction`] /
//! [`FeePayerRawTransaction`] wrapper when more than one account signs. The
//! resulting [`SignedTransaction`] pairs the raw transaction with a
//! [`TransactionAuthenticator`].
//!
//! # Example
//!
//! ```rust
//! use aptos_txn_core::account::Ed25519Account;
//! use aptos_txn_core::transaction::{sign_transaction, EntryFunction, TransactionBuilder};
//! use aptos_txn_core::types::{AccountAddress, ChainId};
//!
//! let account = Ed25519Account::generate();
//! let payload = EntryFunction::builder("0x1::aptos_account::transfer")
//!     .unwrap()
//!     .arg(&AccountAddress::ONE)
//!     .unwrap()
//!     .arg(&1_000u64)
//!     .unwrap()
//!     .build();
//!
//! let raw_txn = TransactionBuilder::new()
//!     .sender(account.address())
//!     .sequence_number(0)
//!     .payload(payload.into())
//!     .chain_id(ChainId::testnet())
//!     .build()
//!     .unwrap();
//!
//! let signed = sign_transaction(&raw_txn, &account).unwrap();
//! assert!(signed.verify());
//! let body = signed.to_bcs().unwrap();
//! # assert!(!body.is_empty());
//! ```

mod argument;
mod authenticator;
mod builder;
mod payload;
mod raw;
mod signed;

pub use argument::TransactionArgument;
pub use authenticator::{AccountAuthenticator, TransactionAuthenticator};
pub use builder::{
    sign_fee_payer_transaction, sign_multi_agent_transaction, sign_transaction,
    TransactionBuilder,
};
pub use payload::{
    EntryFunction, EntryFunctionBuilder, Module, ModuleBundle, Script, TransactionPayload,
};
pub use raw::{
    FeePayerRawTransaction, MultiAgentRawTransaction, RawTransaction, SigningMessage,
    RAW_TRANSACTION_SALT, RAW_TRANSACTION_WITH_DATA_SALT,
};
pub use signed::{SignedTransaction, SIGNED_TRANSACTION_CONTENT_TYPE};
