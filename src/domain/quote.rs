//! Swap Quoter
//!
//! USD-denominated conversion between two currencies:
//! `to_amount = from_amount * price(from) / price(to)`.

use serde::Serialize;
use thiserror::Error;

use super::price::PriceTable;

/// Decimal places used when a converted amount is shown in the form
pub const AMOUNT_DECIMALS: usize = 6;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    #[error("Price not available for {currency}")]
    PriceUnavailable { currency: String },

    #[error("Amount must be a positive number, got {0}")]
    InvalidAmount(f64),
}

/// Intermediate values of a conversion
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub to_amount: f64,
    /// from_amount * price(from)
    pub usd_value: f64,
    /// price(from) / price(to)
    pub exchange_rate: f64,
}

fn require_price(prices: &PriceTable, currency: &str) -> Result<f64, QuoteError> {
    let price = prices.price_of(currency);
    if price == 0.0 {
        return Err(QuoteError::PriceUnavailable {
            currency: currency.to_string(),
        });
    }
    Ok(price)
}

/// Convert `from_amount` of `from` into `to` through USD.
///
/// Fails with [`QuoteError::PriceUnavailable`] before any division when
/// either price is zero or missing (the source currency is reported first).
pub fn convert(
    from_amount: f64,
    from: &str,
    to: &str,
    prices: &PriceTable,
) -> Result<Conversion, QuoteError> {
    if !from_amount.is_finite() || from_amount <= 0.0 {
        return Err(QuoteError::InvalidAmount(from_amount));
    }

    let from_price = require_price(prices, from)?;
    let to_price = require_price(prices, to)?;

    let usd_value = from_amount * from_price;
    Ok(Conversion {
        to_amount: usd_value / to_price,
        usd_value,
        exchange_rate: from_price / to_price,
    })
}

/// Target amount for swapping `from_amount` of `from` into `to`
pub fn quote(from_amount: f64, from: &str, to: &str, prices: &PriceTable) -> Result<f64, QuoteError> {
    convert(from_amount, from, to, prices).map(|c| c.to_amount)
}

/// Form helper: converted amount as text with six decimals.
///
/// Returns an empty string when the input is empty or not a positive
/// number, or when either price is unavailable.
pub fn calculate_swap(amount: &str, from: &str, to: &str, prices: &PriceTable) -> String {
    let Some(value) = parse_amount(amount) else {
        return String::new();
    };
    match quote(value, from, to, prices) {
        Ok(to_amount) => format!("{:.*}", AMOUNT_DECIMALS, to_amount),
        Err(_) => String::new(),
    }
}

/// Parse a user-entered amount. `None` for blank or non-numeric text.
pub fn parse_amount(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}
