//! Wallet balance types
//!
//! Raw balances as supplied by a balance provider, and the display rows
//! derived from them by the ranker.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockchainError {
    #[error("Blockchain id cannot be empty")]
    Empty,
}

/// Blockchain identifier (e.g. "Osmosis", "Ethereum")
///
/// Any non-empty string is accepted; whether the chain is *recognized* is
/// decided by the [`PriorityTable`](super::PriorityTable) it is looked up in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Blockchain(String);

impl Blockchain {
    pub fn new(id: impl Into<String>) -> Result<Self, BlockchainError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(BlockchainError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Blockchain {
    type Error = BlockchainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Blockchain> for String {
    fn from(chain: Blockchain) -> Self {
        chain.0
    }
}

impl fmt::Display for Blockchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// A single wallet balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// Currency symbol (e.g. "USD", "ETH")
    pub currency: String,
    /// Chain the balance lives on
    pub blockchain: Blockchain,
    /// Amount held; zero and negative values are possible in provider data
    pub amount: f64,
}

impl Balance {
    pub fn new(currency: impl Into<String>, blockchain: Blockchain, amount: f64) -> Self {
        Self {
            currency: currency.into(),
            blockchain,
            amount,
        }
    }
}

/// Display-ready balance row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedBalance {
    #[serde(flatten)]
    pub balance: Balance,
    /// Priority of the balance's chain
    pub priority: i32,
    /// Amount rendered with zero decimals
    pub formatted: String,
    /// amount * USD price (0 when the price is unknown)
    pub usd_value: f64,
}

impl RankedBalance {
    pub fn currency(&self) -> &str {
        &self.balance.currency
    }

    pub fn amount(&self) -> f64 {
        self.balance.amount
    }
}

/// Render an amount with zero decimals, rounding halves away from zero.
pub fn format_whole(amount: f64) -> String {
    format!("{:.0}", amount.round())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blockchain_rejects_empty() {
        assert_eq!(Blockchain::new(""), Err(BlockchainError::Empty));
        assert_eq!(Blockchain::new("   "), Err(BlockchainError::Empty));
    }

    #[test]
    fn test_blockchain_trims() {
        let chain = Blockchain::new(" Osmosis ").unwrap();
        assert_eq!(chain.as_str(), "Osmosis");
        assert_eq!(chain.to_string(), "Osmosis");
    }

    #[test]
    fn test_balance_deserialize() {
        let json = r#"{"currency":"ATOM","blockchain":"Osmosis","amount":12.5}"#;
        let balance: Balance = serde_json::from_str(json).unwrap();
        assert_eq!(balance.currency, "ATOM");
        assert_eq!(balance.blockchain.as_str(), "Osmosis");
        assert_eq!(balance.amount, 12.5);
    }

    #[test]
    fn test_balance_deserialize_empty_chain_fails() {
        let json = r#"{"currency":"ATOM","blockchain":"","amount":1.0}"#;
        assert!(serde_json::from_str::<Balance>(json).is_err());
    }

    #[test]
    fn test_format_whole() {
        assert_eq!(format_whole(100.0), "100");
        assert_eq!(format_whole(99.4), "99");
        assert_eq!(format_whole(2.5), "3");
        assert_eq!(format_whole(0.2), "0");
    }
}
