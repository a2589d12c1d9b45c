//! Price snapshot
//!
//! A [`PriceTable`] is built from one full price-feed snapshot
//! (`[{currency, price, date}]`) and is replaced wholesale on every refresh.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

/// One record of the external price feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPrice {
    pub currency: String,
    pub price: f64,
    pub date: String,
}

impl TokenPrice {
    pub fn new(currency: impl Into<String>, price: f64, date: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            price,
            date: date.into(),
        }
    }

    fn parsed_date(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.date).ok()
    }
}

#[derive(Debug, Clone)]
struct PriceEntry {
    price: f64,
    date: Option<DateTime<FixedOffset>>,
}

/// Currency -> USD price lookup
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    prices: HashMap<String, PriceEntry>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a feed snapshot.
    ///
    /// Duplicate currencies resolve to the record with the latest date; a
    /// parsable date beats an unparsable one and ties keep the first record.
    /// This is not a first-match lookup: an older duplicate listed first
    /// loses to a newer one listed later. Negative or non-finite prices are
    /// skipped.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = TokenPrice>,
    {
        let mut prices: HashMap<String, PriceEntry> = HashMap::new();

        for record in records {
            if !record.price.is_finite() || record.price < 0.0 {
                warn!(
                    "Skipping invalid price {} for {} ({})",
                    record.price, record.currency, record.date
                );
                continue;
            }

            let candidate = PriceEntry {
                price: record.price,
                date: record.parsed_date(),
            };

            match prices.get_mut(&record.currency) {
                Some(existing) => {
                    let newer = match (existing.date, candidate.date) {
                        (Some(old), Some(new)) => new > old,
                        (None, Some(_)) => true,
                        _ => false,
                    };
                    if newer {
                        *existing = candidate;
                    }
                }
                None => {
                    prices.insert(record.currency, candidate);
                }
            }
        }

        Self { prices }
    }

    /// Convenience constructor for undated prices
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self::from_records(
            pairs
                .into_iter()
                .map(|(currency, price)| TokenPrice::new(currency, price, "")),
        )
    }

    /// USD price of a currency, if the snapshot has one
    pub fn get(&self, currency: &str) -> Option<f64> {
        self.prices.get(currency).map(|e| e.price)
    }

    /// USD price of a currency, 0 when unknown
    pub fn price_of(&self, currency: &str) -> f64 {
        self.get(currency).unwrap_or(0.0)
    }

    /// Whether a nonzero price is known for the currency
    pub fn has_price(&self, currency: &str) -> bool {
        self.price_of(currency) != 0.0
    }

    /// Sorted, de-duplicated list of currencies in the snapshot
    pub fn available_currencies(&self) -> Vec<String> {
        self.prices
            .keys()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// An empty table means prices are still loading (or the feed failed)
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}
