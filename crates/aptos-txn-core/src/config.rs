//! Transaction defaults.
//!
//! [`TransactionConfig`] holds the values a [`TransactionBuilder`] falls back
//! to when a field is not set explicitly.
//!
//! [`TransactionBuilder`]: crate::transaction::TransactionBuilder

use crate::error::{AptosError, AptosResult};
use crate::types::ChainId;
use std::time::Duration;

/// Default maximum gas amount.
pub const DEFAULT_MAX_GAS_AMOUNT: u64 = 200_000;
/// Default gas unit price in octas.
pub const DEFAULT_GAS_UNIT_PRICE: u64 = 100;
/// Default transaction expiration window.
pub const DEFAULT_EXPIRATION: Duration = Duration::from_secs(600);

/// Defaults applied to newly built transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionConfig {
    /// Maximum gas units a transaction may consume.
    /// Default: 200,000
    pub max_gas_amount: u64,
    /// Price per gas unit in octas.
    /// Default: 100
    pub gas_unit_price: u64,
    /// How long after building a transaction stays valid.
    /// Default: 10 minutes
    pub expiration: Duration,
    /// Chain to target when the builder is not told one.
    /// Default: none
    pub chain_id: Option<ChainId>,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            max_gas_amount: DEFAULT_MAX_GAS_AMOUNT,
            gas_unit_price: DEFAULT_GAS_UNIT_PRICE,
            expiration: DEFAULT_EXPIRATION,
            chain_id: None,
        }
    }
}

impl TransactionConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> TransactionConfigBuilder {
        TransactionConfigBuilder::default()
    }

    /// Defaults targeting mainnet.
    pub fn mainnet() -> Self {
        Self {
            chain_id: Some(ChainId::mainnet()),
            ..Self::default()
        }
    }

    /// Defaults targeting testnet.
    pub fn testnet() -> Self {
        Self {
            chain_id: Some(ChainId::testnet()),
            ..Self::default()
        }
    }

    /// Defaults targeting a local test network.
    pub fn localnet() -> Self {
        Self {
            chain_id: Some(ChainId::localnet()),
            ..Self::default()
        }
    }
}

/// Builder for [`TransactionConfig`].
#[derive(Debug, Clone, Default)]
pub struct TransactionConfigBuilder {
    max_gas_amount: Option<u64>,
    gas_unit_price: Option<u64>,
    expiration: Option<Duration>,
    chain_id: Option<ChainId>,
}

impl TransactionConfigBuilder {
    /// Sets the maximum gas amount.
    pub fn max_gas_amount(mut self, max_gas_amount: u64) -> Self {
        self.max_gas_amount = Some(max_gas_amount);
        self
    }

    /// Sets the gas unit price in octas.
    pub fn gas_unit_price(mut self, gas_unit_price: u64) -> Self {
        self.gas_unit_price = Some(gas_unit_price);
        self
    }

    /// Sets the expiration window.
    pub fn expiration(mut self, expiration: Duration) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Sets the default chain ID.
    pub fn chain_id(mut self, chain_id: ChainId) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AptosError::Config`] if the gas amount, gas price or
    /// expiration window is zero.
    pub fn build(self) -> AptosResult<TransactionConfig> {
        let default = TransactionConfig::default();
        let config = TransactionConfig {
            max_gas_amount: self.max_gas_amount.unwrap_or(default.max_gas_amount),
            gas_unit_price: self.gas_unit_price.unwrap_or(default.gas_unit_price),
            expiration: self.expiration.unwrap_or(default.expiration),
            chain_id: self.chain_id.or(default.chain_id),
        };
        if config.max_gas_amount == 0 {
            return Err(AptosError::Config("max_gas_amount must be positive".into()));
        }
        if config.gas_unit_price == 0 {
            return Err(AptosError::Config("gas_unit_price must be positive".into()));
        }
        if config.expiration.as_secs() == 0 {
            return Err(AptosError::Config(
                "expiration must be at least one second".into(),
            ));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TransactionConfig::default();
        assert_eq!(config.max_gas_amount, 200_000);
        assert_eq!(config.gas_unit_price, 100);
        assert_eq!(config.expiration, Duration::from_secs(600));
        assert_eq!(config.chain_id, None);
        assert_eq!(TransactionConfig::builder().build().unwrap(), config);
    }

    #[test]
    fn test_network_presets() {
        assert_eq!(TransactionConfig::mainnet().chain_id, Some(ChainId::mainnet()));
        assert_eq!(TransactionConfig::testnet().chain_id, Some(ChainId::testnet()));
        assert_eq!(TransactionConfig::localnet().chain_id, Some(ChainId::localnet()));
    }

    #[test]
    fn test_builder_overrides() {
        let config = TransactionConfig::builder()
            .max_gas_amount(2_000)
            .gas_unit_price(1)
            .expiration(Duration::from_secs(30))
            .chain_id(ChainId::new(4))
            .build()
            .unwrap();
        assert_eq!(config.max_gas_amount, 2_000);
        assert_eq!(config.gas_unit_price, 1);
        assert_eq!(config.expiration.as_secs(), 30);
        assert_eq!(config.chain_id, Some(ChainId::localnet()));
    }

    #[test]
    fn test_builder_validation() {
        assert!(matches!(
            TransactionConfig::builder().max_gas_amount(0).build(),
            Err(AptosError::Config(_))
        ));
        assert!(matches!(
            TransactionConfig::builder().gas_unit_price(0).build(),
            Err(AptosError::Config(_))
        ));
        assert!(matches!(
            TransactionConfig::builder()
                .expiration(Duration::from_millis(500))
                .build(),
            Err(AptosError::Config(_))
        ));
    }
}
