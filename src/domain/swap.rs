//! Swap requests and committed swap records

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::form::SwapForm;
use super::quote::Conversion;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A swap to be validated and settled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub from_currency: String,
    pub to_currency: String,
    /// Source amount as entered (validated before settlement)
    pub from_amount: String,
}

impl SwapRequest {
    pub fn new(
        from_currency: impl Into<String>,
        to_currency: impl Into<String>,
        from_amount: f64,
    ) -> Self {
        Self {
            from_currency: from_currency.into(),
            to_currency: to_currency.into(),
            from_amount: from_amount.to_string(),
        }
    }

    /// Form view of the request, used for validation
    pub fn to_form(&self) -> SwapForm {
        SwapForm::new(self.from_currency.clone(), self.to_currency.clone())
            .with_from_amount(self.from_amount.clone())
    }
}

impl From<&SwapForm> for SwapRequest {
    fn from(form: &SwapForm) -> Self {
        Self {
            from_currency: form.from_currency.clone(),
            to_currency: form.to_currency.clone(),
            from_amount: form.from_amount.clone(),
        }
    }
}

/// Record of a committed swap. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuote {
    pub success: bool,
    pub from_amount: f64,
    pub to_amount: f64,
    pub from_currency: String,
    pub to_currency: String,
    pub exchange_rate: f64,
    #[serde(rename = "totalValueUSD")]
    pub total_value_usd: f64,
    pub timestamp: DateTime<Utc>,
    pub transaction_id: String,
}

impl SwapQuote {
    pub(crate) fn committed(
        from_currency: &str,
        to_currency: &str,
        from_amount: f64,
        conversion: &Conversion,
    ) -> Self {
        let timestamp = Utc::now();
        Self {
            success: true,
            from_amount,
            to_amount: conversion.to_amount,
            from_currency: from_currency.to_string(),
            to_currency: to_currency.to_string(),
            exchange_rate: conversion.exchange_rate,
            total_value_usd: conversion.usd_value,
            transaction_id: generate_transaction_id(timestamp),
            timestamp,
        }
    }
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// `TX` + base36 millisecond timestamp + 5 random uppercase base36 chars
pub fn generate_transaction_id(at: DateTime<Utc>) -> String {
    let millis = at.timestamp_millis().max(0) as u64;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..5)
        .map(|_| BASE36[rng.gen_range(0..36)].to_ascii_uppercase() as char)
        .collect();
    format!("TX{}{}", to_base36(millis), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_693_293_040_000), "llvyyfls");
    }

    #[test]
    fn test_transaction_id_shape() {
        let at = Utc.timestamp_millis_opt(1_693_293_040_000).unwrap();
        let id = generate_transaction_id(at);
        assert!(id.starts_with("TXllvyyfls"));
        assert_eq!(id.len(), 2 + 8 + 5);
        assert!(id[10..].chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_transaction_ids_unique() {
        let at = Utc::now();
        let ids: HashSet<_> = (0..100).map(|_| generate_transaction_id(at)).collect();
        assert!(ids.len() > 95);
    }

    #[test]
    fn test_request_from_form() {
        let form = SwapForm::new("USD", "ETH").with_from_amount("12");
        let request = SwapRequest::from(&form);
        assert_eq!(request.from_amount, "12");
        assert_eq!(request.to_form(), form);
    }

    #[test]
    fn test_quote_serializes_camel_case() {
        let conversion = Conversion {
            to_amount: 0.05,
            usd_value: 100.0,
            exchange_rate: 0.0005,
        };
        let quote = SwapQuote::committed("USD", "ETH", 100.0, &conversion);
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["fromCurrency"], "USD");
        assert_eq!(json["totalValueUSD"], 100.0);
        assert!(json["transactionId"].as_str().unwrap().starts_with("TX"));
    }
}
