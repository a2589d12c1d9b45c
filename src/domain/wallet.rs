//! Wallet balances keyed by currency
//!
//! Absent currencies read as 0. Swaps mutate the mapping only through
//! [`WalletBalances::apply_swap`], which moves both legs or neither.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WalletError {
    #[error("Insufficient {currency} balance: have {available:.6}, need {required:.6}")]
    InsufficientBalance {
        currency: String,
        available: f64,
        required: f64,
    },

    #[error("Invalid {leg} amount: {amount}")]
    InvalidAmount { leg: &'static str, amount: f64 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletBalances {
    balances: BTreeMap<String, f64>,
}

impl WalletBalances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Demo wallet seed
    pub fn demo() -> Self {
        Self::from_pairs([
            ("USD", 1000.0),
            ("ETH", 2.5),
            ("USDC", 500.0),
            ("ATOM", 100.0),
            ("OSMO", 250.0),
            ("SWTH", 10000.0),
            ("WBTC", 0.1),
            ("BLUR", 50.0),
            ("GMX", 25.0),
            ("OKB", 75.0),
        ])
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            balances: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Balance of a currency, 0 when absent
    pub fn balance_of(&self, currency: &str) -> f64 {
        self.balances.get(currency).copied().unwrap_or(0.0)
    }

    /// Debit `from_amount` of `from` and credit `to_amount` of `to`.
    ///
    /// All checks run before the first write, so an error leaves the
    /// balances untouched.
    pub fn apply_swap(
        &mut self,
        from: &str,
        from_amount: f64,
        to: &str,
        to_amount: f64,
    ) -> Result<(), WalletError> {
        if !from_amount.is_finite() || from_amount <= 0.0 {
            return Err(WalletError::InvalidAmount {
                leg: "debit",
                amount: from_amount,
            });
        }
        if !to_amount.is_finite() || to_amount < 0.0 {
            return Err(WalletError::InvalidAmount {
                leg: "credit",
                amount: to_amount,
            });
        }

        let available = self.balance_of(from);
        if from_amount > available {
            return Err(WalletError::InsufficientBalance {
                currency: from.to_string(),
                available,
                required: from_amount,
            });
        }

        *self.balances.entry(from.to_string()).or_insert(0.0) -= from_amount;
        *self.balances.entry(to.to_string()).or_insert(0.0) += to_amount;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.balances.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}
