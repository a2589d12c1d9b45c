//! Configuration Module
//!
//! Loads and validates configuration from TOML files.

pub mod loader;

pub use loader::{
    Config, ConfigError, LoggingSection, PricesSection, SettlementSection, WalletSection,
    load_config, PRICE_FEED_ENV,
};
