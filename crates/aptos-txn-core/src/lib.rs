//! # Aptos transaction core
//!
//! Canonical encoding, signing and verification of Aptos transactions.
//!
//! This crate does no I/O. It turns a sender, a sequence number and a
//! payload into the exact bytes a fullnode accepts, and checks signatures on
//! transactions it is handed.
//!
//! ## Quick Start
//!
//! ```rust
//! use aptos_txn_core::account::Ed25519Account;
//! use aptos_txn_core::transaction::{EntryFunction, SignedTransaction, TransactionBuilder};
//! use aptos_txn_core::types::{AccountAddress, TypeTag};
//! use aptos_txn_core::TransactionConfig;
//!
//! let account = Ed25519Account::generate();
//! let payload = EntryFunction::coin_transfer(TypeTag::aptos_coin(), AccountAddress::ONE, 5_000)?;
//!
//! let signed = TransactionBuilder::with_config(TransactionConfig::testnet())
//!     .sequence_number(0)
//!     .payload(payload.into())
//!     .build_and_sign(&account)?;
//!
//! let bytes = signed.to_bcs()?;
//! let decoded = SignedTransaction::from_bcs(&bytes)?;
//! assert!(decoded.verify());
//! # Ok::<(), aptos_txn_core::AptosError>(())
//! ```
//!
//! ## Modules
//!
//! - [`bcs`] - Binary Canonical Serialization codec
//! - [`types`] - Addresses, chain IDs, hashes and Move type tags
//! - [`crypto`] - Signature schemes and authentication keys
//! - [`transaction`] - Payloads, raw and signed transactions, authenticators
//! - [`account`] - Accounts that sign transactions
//! - [`config`] - Transaction defaults

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod account;
pub mod bcs;
pub mod config;
pub mod crypto;
pub mod error;
pub mod transaction;
pub mod types;

pub use config::TransactionConfig;
pub use error::{AptosError, AptosResult};

pub use types::{AccountAddress, ChainId, HashValue};
