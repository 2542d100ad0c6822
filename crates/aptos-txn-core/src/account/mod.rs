//! Accounts that sign transactions.
//!
//! An account pairs private key material with the address it controls and
//! turns a signing message into an [`AccountAuthenticator`].
//!
//! - [`Ed25519Account`] - Ed25519 key (most common)
//! - [`Secp256k1Account`] - Secp256k1 key behind the single-key envelope
//! - [`MultiEd25519Account`] - K-of-N Ed25519 threshold account
//!
//! # Example
//!
//! ```rust
//! use aptos_txn_core::account::{Account, Ed25519Account};
//!
//! let account = Ed25519Account::generate();
//! let authenticator = account.sign_message(b"hello").unwrap();
//! assert!(authenticator.verify(b"hello"));
//! ```
//!
//! [`AccountAuthenticator`]: crate::transaction::AccountAuthenticator

mod account;
mod ed25519;
mod multi_ed25519;
mod secp256k1;

pub use account::Account;
pub use ed25519::Ed25519Account;
pub use multi_ed25519::MultiEd25519Account;
pub use secp256k1::Secp256k1Account;
