//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching swapdesk.toml structure.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::adapters::SimulatedSettlementConfig;
use crate::domain::{PriorityTable, SwapForm, WalletBalances, UNRANKED_PRIORITY};

/// Environment variable overriding `[prices] feed_path`
pub const PRICE_FEED_ENV: &str = "SWAPDESK_PRICE_FEED";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration structure matching swapdesk.toml
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub prices: PricesSection,
    #[serde(default)]
    pub wallet: WalletSection,
    /// Blockchain -> priority; omitted means the built-in table
    #[serde(default)]
    pub priorities: PriorityTable,
    #[serde(default)]
    pub settlement: SettlementSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Price feed configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct PricesSection {
    /// JSON snapshot file holding `[{currency, price, date}]`
    pub feed_path: String,
}

impl PricesSection {
    /// Feed path with environment variable override and `~` expansion.
    /// Checks SWAPDESK_PRICE_FEED first, falls back to config value
    pub fn get_feed_path(&self) -> String {
        let raw = std::env::var(PRICE_FEED_ENV).unwrap_or_else(|_| self.feed_path.clone());
        shellexpand::tilde(&raw).into_owned()
    }
}

/// Wallet configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct WalletSection {
    /// Starting balances by currency
    #[serde(default = "WalletBalances::demo")]
    pub balances: WalletBalances,
    /// Currency preselected as swap source
    #[serde(default = "default_from_currency")]
    pub default_from: String,
    /// Currency preselected as swap target
    #[serde(default = "default_to_currency")]
    pub default_to: String,
}

fn default_from_currency() -> String {
    "USD".to_string()
}

fn default_to_currency() -> String {
    "ETH".to_string()
}

impl Default for WalletSection {
    fn default() -> Self {
        Self {
            balances: WalletBalances::demo(),
            default_from: default_from_currency(),
            default_to: default_to_currency(),
        }
    }
}

impl WalletSection {
    pub fn initial_form(&self) -> SwapForm {
        SwapForm::new(self.default_from.clone(), self.default_to.clone())
    }
}

/// Simulated settlement section
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementSection {
    /// Fixed latency in milliseconds
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Maximum random extra latency in milliseconds
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,
    /// Probability (0-1) that a settlement fails
    #[serde(default)]
    pub failure_rate: f64,
}

fn default_base_delay_ms() -> u64 {
    2000
}

fn default_jitter_ms() -> u64 {
    1000
}

impl Default for SettlementSection {
    fn default() -> Self {
        Self {
            base_delay_ms: default_base_delay_ms(),
            jitter_ms: default_jitter_ms(),
            failure_rate: 0.0,
        }
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// Log level used when no CLI flag is given: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prices.feed_path.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "feed_path cannot be empty".to_string(),
            ));
        }

        for (currency, amount) in self.wallet.balances.iter() {
            if !amount.is_finite() || amount < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "balance for {} must be a non-negative number, got {}",
                    currency, amount
                )));
            }
        }

        if self.wallet.default_from.is_empty() || self.wallet.default_to.is_empty() {
            return Err(ConfigError::ValidationError(
                "default_from and default_to cannot be empty".to_string(),
            ));
        }

        // A chain configured at or below the sentinel could never be displayed
        for (chain, priority) in self.priorities.iter() {
            if priority <= UNRANKED_PRIORITY {
                return Err(ConfigError::ValidationError(format!(
                    "priority for {} must be > {}, got {}",
                    chain, UNRANKED_PRIORITY, priority
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.settlement.failure_rate) {
            return Err(ConfigError::ValidationError(format!(
                "failure_rate must be 0-1, got {}",
                self.settlement.failure_rate
            )));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "unknown log level '{}'",
                self.logging.level
            )));
        }

        Ok(())
    }
}

impl From<&SettlementSection> for SimulatedSettlementConfig {
    fn from(section: &SettlementSection) -> Self {
        SimulatedSettlementConfig {
            base_delay: Duration::from_millis(section.base_delay_ms),
            jitter: Duration::from_millis(section.jitter_ms),
            failure_rate: section.failure_rate,
        }
    }
}
