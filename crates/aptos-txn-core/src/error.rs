//! Error types for the transaction core.
//!
//! This module provides a unified error type [`AptosError`] covering every
//! failure the codec, key handling and transaction construction can report.
//! Signature verification does not produce errors; it reports a `bool`.

use crate::bcs::BcsError;
use std::fmt;
use thiserror::Error;

/// A specialized Result type for transaction core operations.
pub type AptosResult<T> = Result<T, AptosError>;

/// The main error type for the transaction core.
#[derive(Error, Debug)]
pub enum AptosError {
    /// Error occurred during BCS serialization/deserialization
    #[error("BCS error: {0}")]
    Bcs(#[from] BcsError),

    /// Error occurred during hex encoding/decoding
    #[error("Hex error: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Invalid account address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid public key
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Invalid private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Invalid signature
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Multi-signature threshold outside the allowed range
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// Invalid type tag or identifier
    #[error("Invalid type tag: {0}")]
    InvalidTypeTag(String),

    /// Transaction building error
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Insufficient signatures for multi-signature operation
    #[error("Insufficient signatures: need {required}, got {provided}")]
    InsufficientSignatures {
        /// Number of signatures required
        required: usize,
        /// Number of signatures provided
        provided: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AptosError {
    /// Creates a new transaction error
    pub fn transaction<S: Into<String>>(msg: S) -> Self {
        Self::Transaction(msg.into())
    }

    /// Creates a new type tag error
    pub fn type_tag<S: fmt::Display>(msg: S) -> Self {
        Self::InvalidTypeTag(msg.to_string())
    }

    /// Returns the codec error if this error came from decoding.
    pub fn as_bcs(&self) -> Option<&BcsError> {
        match self {
            Self::Bcs(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the error message suitable for display to end users.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Bcs(_) => "Failed to process data",
            Self::Hex(_) => "Invalid hex format",
            Self::InvalidAddress(_) => "Invalid account address",
            Self::InvalidPublicKey(_) => "Invalid public key",
            Self::InvalidPrivateKey(_) => "Invalid private key",
            Self::InvalidSignature(_) => "Invalid signature",
            Self::InvalidThreshold(_) => "Invalid signature threshold",
            Self::InvalidTypeTag(_) => "Invalid type format",
            Self::Transaction(_) => "Transaction error",
            Self::InsufficientSignatures { .. } => "Insufficient signatures",
            Self::Config(_) => "Configuration error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AptosError::InvalidAddress("bad address".to_string());
        assert_eq!(err.to_string(), "Invalid address: bad address");
    }

    #[test]
    fn test_bcs_error_conversion() {
        let err: AptosError = BcsError::InvalidBoolean(2).into();
        assert!(matches!(err, AptosError::Bcs(BcsError::InvalidBoolean(2))));
        assert_eq!(err.as_bcs(), Some(&BcsError::InvalidBoolean(2)));
        assert!(err.to_string().contains("0x02"));
    }

    #[test]
    fn test_transaction_error() {
        let err = AptosError::transaction("invalid payload");
        assert!(matches!(err, AptosError::Transaction(_)));
        assert!(err.to_string().contains("invalid payload"));
    }

    #[test]
    fn test_insufficient_signatures() {
        let err = AptosError::InsufficientSignatures {
            required: 2,
            provided: 1,
        };
        assert_eq!(err.to_string(), "Insufficient signatures: need 2, got 1");
        assert_eq!(err.user_message(), "Insufficient signatures");
    }

    #[test]
    fn test_hex_error_conversion() {
        let err: AptosError = hex::decode("zz").unwrap_err().into();
        assert!(matches!(err, AptosError::Hex(_)));
        assert!(err.as_bcs().is_none());
    }
}
