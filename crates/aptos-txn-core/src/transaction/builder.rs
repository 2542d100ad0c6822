//! Transaction builder and signing helpers.

use crate::account::Account;
use crate::config::TransactionConfig;
use crate::error::{AptosError, AptosResult};
use crate::transaction::authenticator::{AccountAuthenticator, TransactionAuthenticator};
use crate::transaction::payload::TransactionPayload;
use crate::transaction::raw::{
    FeePayerRawTransaction, MultiAgentRawTransaction, RawTransaction, SigningMessage,
};
use crate::transaction::signed::SignedTransaction;
use crate::types::{AccountAddress, ChainId};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// A builder for constructing transactions.
///
/// Fields left unset fall back to the builder's [`TransactionConfig`].
///
/// # Example
///
/// ```rust
/// use aptos_txn_core::transaction::{EntryFunction, TransactionBuilder};
/// use aptos_txn_core::types::{AccountAddress, ChainId, TypeTag};
///
/// let payload = EntryFunction::coin_transfer(
///     TypeTag::aptos_coin(),
///     AccountAddress::from_hex("0x123").unwrap(),
///     1000,
/// ).unwrap();
///
/// let txn = TransactionBuilder::new()
///     .sender(AccountAddress::ONE)
///     .sequence_number(0)
///     .payload(payload.into())
///     .chain_id(ChainId::testnet())
///     .build()
///     .unwrap();
/// assert_eq!(txn.max_gas_amount, 200_000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    config: TransactionConfig,
    sender: Option<AccountAddress>,
    sequence_number: Option<u64>,
    payload: Option<TransactionPayload>,
    max_gas_amount: Option<u64>,
    gas_unit_price: Option<u64>,
    expiration_timestamp_secs: Option<u64>,
    chain_id: Option<ChainId>,
}

impl TransactionBuilder {
    /// Creates a new transaction builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder that falls back to `config` for unset fields.
    #[must_use]
    pub fn with_config(config: TransactionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Sets the sender address.
    #[must_use]
    pub fn sender(mut self, sender: AccountAddress) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Sets the sequence number.
    #[must_use]
    pub fn sequence_number(mut self, sequence_number: u64) -> Self {
        self.sequence_number = Some(sequence_number);
        self
    }

    /// Sets the transaction payload.
    #[must_use]
    pub fn payload(mut self, payload: TransactionPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Sets the maximum gas amount.
    #[must_use]
    pub fn max_gas_amount(mut self, max_gas_amount: u64) -> Self {
        self.max_gas_amount = Some(max_gas_amount);
        self
    }

    /// Sets the gas unit price in octas.
    #[must_use]
    pub fn gas_unit_price(mut self, gas_unit_price: u64) -> Self {
        self.gas_unit_price = Some(gas_unit_price);
        self
    }

    /// Sets the expiration timestamp in seconds since Unix epoch.
    #[must_use]
    pub fn expiration_timestamp_secs(mut self, expiration_timestamp_secs: u64) -> Self {
        self.expiration_timestamp_secs = Some(expiration_timestamp_secs);
        self
    }

    /// Sets the expiration time relative to now.
    ///
    /// Saturates if the clock reads before the epoch or the sum overflows.
    #[must_use]
    pub fn expiration_from_now(mut self, seconds: u64) -> Self {
        self.expiration_timestamp_secs = Some(now_secs().saturating_add(seconds));
        self
    }

    /// Sets the chain ID.
    #[must_use]
    pub fn chain_id(mut self, chain_id: ChainId) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Builds the raw transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AptosError::Transaction`] if the sender, sequence number or
    /// payload is missing, or if no chain ID is set here or in the config.
    pub fn build(self) -> AptosResult<RawTransaction> {
        let sender = self
            .sender
            .ok_or_else(|| AptosError::transaction("sender is required"))?;
        let sequence_number = self
            .sequence_number
            .ok_or_else(|| AptosError::transaction("sequence_number is required"))?;
        let payload = self
            .payload
            .ok_or_else(|| AptosError::transaction("payload is required"))?;
        let chain_id = self
            .chain_id
            .or(self.config.chain_id)
            .ok_or_else(|| AptosError::transaction("chain_id is required"))?;

        let expiration_timestamp_secs = self
            .expiration_timestamp_secs
            .unwrap_or_else(|| now_secs().saturating_add(self.config.expiration.as_secs()));

        Ok(RawTransaction::new(
            sender,
            sequence_number,
            payload,
            self.max_gas_amount.unwrap_or(self.config.max_gas_amount),
            self.gas_unit_price.unwrap_or(self.config.gas_unit_price),
            expiration_timestamp_secs,
            chain_id,
        ))
    }

    /// Builds and signs the transaction, using the account as sender if none
    /// was set.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be built or signed.
    pub fn build_and_sign<A: Account + ?Sized>(
        self,
        account: &A,
    ) -> AptosResult<SignedTransaction> {
        let sender = self.sender.unwrap_or_else(|| account.address());
        let raw_txn = Self {
            sender: Some(sender),
            ..self
        }
        .build()?;

        sign_transaction(&raw_txn, account)
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Signs a raw transaction with the given account.
///
/// # Errors
///
/// Returns an error if generating the signing message fails or if the account fails to sign.
pub fn sign_transaction<A: Account + ?Sized>(
    raw_txn: &RawTransaction,
    account: &A,
) -> AptosResult<SignedTransaction> {
    let signing_message = raw_txn.keyed()?;
    let sender = account.sign_message(&signing_message)?;
    debug!(
        sender = %raw_txn.sender,
        sequence_number = raw_txn.sequence_number,
        scheme = sender.scheme_name(),
        "signed transaction"
    );
    Ok(SignedTransaction::new(raw_txn.clone(), sender.into()))
}

/// Signs a multi-agent transaction.
///
/// `secondary_signers` must line up with the transaction's secondary signer
/// addresses.
///
/// # Errors
///
/// Returns an error if the signer count does not match the addresses, if
/// generating the signing message fails, or if any signer fails to sign.
pub fn sign_multi_agent_transaction<A: Account + ?Sized>(
    multi_agent: &MultiAgentRawTransaction,
    sender: &A,
    secondary_signers: &[&dyn Account],
) -> AptosResult<SignedTransaction> {
    let signing_message = multi_agent.keyed()?;

    let sender_auth = sender.sign_message(&signing_message)?;
    let secondary = sign_secondaries(
        &multi_agent.secondary_signer_addresses,
        secondary_signers,
        &signing_message,
    )?;

    debug!(
        sender = %multi_agent.raw_txn.sender,
        sequence_number = multi_agent.raw_txn.sequence_number,
        scheme = sender_auth.scheme_name(),
        secondary_signers = secondary.len(),
        "signed multi-agent transaction"
    );
    Ok(SignedTransaction::new(
        multi_agent.raw_txn.clone(),
        TransactionAuthenticator::multi_agent(sender_auth, secondary),
    ))
}

/// Signs a fee payer transaction.
///
/// Every party signs the form naming the actual fee payer. A placeholder
/// fee payer address in `fee_payer_txn` is replaced with the fee payer
/// account's address.
///
/// # Errors
///
/// Returns an error if the transaction already names a different fee payer,
/// if the secondary signer count does not match the addresses, if generating
/// the signing message fails, or if any signer fails to sign.
pub fn sign_fee_payer_transaction<A: Account + ?Sized>(
    fee_payer_txn: &FeePayerRawTransaction,
    sender: &A,
    secondary_signers: &[&dyn Account],
    fee_payer: &dyn Account,
) -> AptosResult<SignedTransaction> {
    let fee_payer_address = fee_payer.address();
    if !fee_payer_txn.has_placeholder_fee_payer()
        && fee_payer_txn.fee_payer_address != fee_payer_address
    {
        return Err(AptosError::transaction(format!(
            "transaction names fee payer {}, but signer is {}",
            fee_payer_txn.fee_payer_address, fee_payer_address
        )));
    }
    let signing_message = fee_payer_txn.with_fee_payer(fee_payer_address).keyed()?;

    let sender_auth = sender.sign_message(&signing_message)?;
    let secondary = sign_secondaries(
        &fee_payer_txn.secondary_signer_addresses,
        secondary_signers,
        &signing_message,
    )?;
    let fee_payer_auth = fee_payer.sign_message(&signing_message)?;

    debug!(
        sender = %fee_payer_txn.raw_txn.sender,
        sequence_number = fee_payer_txn.raw_txn.sequence_number,
        scheme = sender_auth.scheme_name(),
        fee_payer = %fee_payer_address,
        "signed fee payer transaction"
    );
    Ok(SignedTransaction::new(
        fee_payer_txn.raw_txn.clone(),
        TransactionAuthenticator::fee_payer(
            sender_auth,
            secondary,
            fee_payer_address,
            fee_payer_auth,
        ),
    ))
}

fn sign_secondaries(
    addresses: &[AccountAddress],
    signers: &[&dyn Account],
    signing_message: &[u8],
) -> AptosResult<Vec<(AccountAddress, AccountAuthenticator)>> {
    if addresses.len() != signers.len() {
        return Err(AptosError::transaction(format!(
            "expected {} secondary signers, got {}",
            addresses.len(),
            signers.len()
        )));
    }
    addresses
        .iter()
        .zip(signers)
        .map(|(address, signer)| Ok((*address, signer.sign_message(signing_message)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{Ed25519Account, MultiEd25519Account, Secp256k1Account};
    use crate::crypto::Ed25519PrivateKey;
    use crate::transaction::payload::EntryFunction;
    use crate::types::TypeTag;
    use std::time::Duration;

    fn payload() -> TransactionPayload {
        let recipient = AccountAddress::from_hex("0x123").unwrap();
        EntryFunction::coin_transfer(TypeTag::aptos_coin(), recipient, 1000)
            .unwrap()
            .into()
    }

    fn raw_txn(sender: AccountAddress) -> RawTransaction {
        TransactionBuilder::new()
            .sender(sender)
            .sequence_number(0)
            .payload(payload())
            .chain_id(ChainId::testnet())
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_missing_fields() {
        assert!(TransactionBuilder::new().build().is_err());

        let missing_sender = TransactionBuilder::new()
            .sequence_number(0)
            .payload(payload())
            .chain_id(ChainId::testnet())
            .build();
        assert!(matches!(missing_sender, Err(AptosError::Transaction(_))));

        let missing_chain = TransactionBuilder::new()
            .sender(AccountAddress::ONE)
            .sequence_number(0)
            .payload(payload())
            .build();
        assert!(matches!(missing_chain, Err(AptosError::Transaction(_))));
    }

    #[test]
    fn test_builder_defaults() {
        let now = now_secs();
        let txn = raw_txn(AccountAddress::ONE);
        assert_eq!(txn.max_gas_amount, 200_000);
        assert_eq!(txn.gas_unit_price, 100);
        assert!(txn.expiration_timestamp_secs >= now + 600);
        assert!(txn.expiration_timestamp_secs <= now + 605);
    }

    #[test]
    fn test_builder_uses_config() {
        let config = TransactionConfig::builder()
            .max_gas_amount(2_000)
            .gas_unit_price(1)
            .expiration(Duration::from_secs(30))
            .chain_id(ChainId::new(4))
            .build()
            .unwrap();
        let txn = TransactionBuilder::with_config(config)
            .sender(AccountAddress::ONE)
            .sequence_number(11)
            .payload(payload())
            .build()
            .unwrap();
        assert_eq!(txn.max_gas_amount, 2_000);
        assert_eq!(txn.gas_unit_price, 1);
        assert_eq!(txn.chain_id, ChainId::new(4));
        assert!(txn.expiration_timestamp_secs <= now_secs() + 30);
    }

    #[test]
    fn test_builder_explicit_values_win() {
        let txn = TransactionBuilder::with_config(TransactionConfig::mainnet())
            .sender(AccountAddress::ONE)
            .sequence_number(0)
            .payload(payload())
            .max_gas_amount(500_000)
            .gas_unit_price(200)
            .expiration_timestamp_secs(9_999_999_999)
            .chain_id(ChainId::testnet())
            .build()
            .unwrap();
        assert_eq!(txn.max_gas_amount, 500_000);
        assert_eq!(txn.gas_unit_price, 200);
        assert_eq!(txn.expiration_timestamp_secs, 9_999_999_999);
        assert_eq!(txn.chain_id, ChainId::testnet());
    }

    #[test]
    fn test_expiration_from_now_saturates() {
        let txn = TransactionBuilder::new()
            .sender(AccountAddress::ONE)
            .sequence_number(0)
            .payload(payload())
            .expiration_from_now(u64::MAX)
            .chain_id(ChainId::testnet())
            .build()
            .unwrap();
        assert_eq!(txn.expiration_timestamp_secs, u64::MAX);
    }

    #[test]
    fn test_sign_transaction_per_scheme() {
        let ed = Ed25519Account::generate();
        let signed = sign_transaction(&raw_txn(ed.address()), &ed).unwrap();
        assert!(matches!(signed.authenticator(), TransactionAuthenticator::Ed25519 { .. }));
        assert!(signed.verify());

        let secp = Secp256k1Account::generate().unwrap();
        let signed = sign_transaction(&raw_txn(secp.address()), &secp).unwrap();
        assert!(matches!(
            signed.authenticator(),
            TransactionAuthenticator::SingleSender { .. }
        ));
        assert!(signed.verify());

        let keys = (0..3).map(|_| Ed25519PrivateKey::generate()).collect();
        let multi = MultiEd25519Account::from_private_keys(keys, 2).unwrap();
        let signed = TransactionBuilder::new()
            .sequence_number(1)
            .payload(payload())
            .chain_id(ChainId::testnet())
            .build_and_sign(&multi)
            .unwrap();
        assert_eq!(signed.sender(), multi.address());
        assert!(matches!(
            signed.authenticator(),
            TransactionAuthenticator::MultiEd25519 { .. }
        ));
        assert!(signed.verify());
    }

    #[test]
    fn test_sign_multi_agent_transaction() {
        let sender = Ed25519Account::generate();
        let secondary = Secp256k1Account::generate().unwrap();
        let multi_agent =
            MultiAgentRawTransaction::new(raw_txn(sender.address()), vec![secondary.address()]);

        let signed = sign_multi_agent_transaction(&multi_agent, &sender, &[&secondary]).unwrap();
        assert_eq!(signed.sender(), sender.address());
        assert_eq!(
            signed.authenticator().secondary_signer_addresses(),
            &[secondary.address()]
        );
        assert!(signed.verify());

        assert!(sign_multi_agent_transaction(&multi_agent, &sender, &[]).is_err());
    }

    #[test]
    fn test_sign_fee_payer_transaction() {
        let sender = Ed25519Account::generate();
        let fee_payer = Ed25519Account::generate();
        let fee_payer_txn = FeePayerRawTransaction::new(raw_txn(sender.address()), vec![], None);

        let signed = sign_fee_payer_transaction(&fee_payer_txn, &sender, &[], &fee_payer).unwrap();
        assert_eq!(signed.sender(), sender.address());
        assert_eq!(
            signed.authenticator().fee_payer_address(),
            Some(fee_payer.address())
        );
        assert!(signed.verify());
    }

    #[test]
    fn test_sign_fee_payer_rejects_other_payer() {
        let sender = Ed25519Account::generate();
        let fee_payer = Ed25519Account::generate();
        let fee_payer_txn = FeePayerRawTransaction::new(
            raw_txn(sender.address()),
            vec![],
            Some(AccountAddress::THREE),
        );
        assert!(matches!(
            sign_fee_payer_transaction(&fee_payer_txn, &sender, &[], &fee_payer),
            Err(AptosError::Transaction(_))
        ));
    }
}
