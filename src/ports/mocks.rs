use std::sync::{Arc, Mutex};
use async_trait::async_trait;

use crate::domain::TokenPrice;
use super::price_source::{PriceSource, PriceSourceError};
use super::settlement::{Settlement, SettlementError, SettlementRequest};

/// Price source serving a fixed snapshot and counting fetches
#[derive(Debug, Default, Clone)]
pub struct StaticPriceSource {
    records: Arc<Mutex<Vec<TokenPrice>>>,
    fetches: Arc<Mutex<u32>>,
}

impl StaticPriceSource {
    pub fn new(records: Vec<TokenPrice>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            fetches: Arc::new(Mutex::new(0)),
        }
    }

    /// Builder method to add an undated record
    pub fn with_price(self, currency: &str, price: f64) -> Self {
        if let Ok(mut records) = self.records.lock() {
            records.push(TokenPrice::new(currency, price, ""));
        }
        self
    }

    /// Replace the snapshot served by the next fetch
    pub fn set_records(&self, records: Vec<TokenPrice>) {
        if let Ok(mut guard) = self.records.lock() {
            *guard = records;
        }
    }

    pub fn fetch_count(&self) -> u32 {
        self.fetches.lock().map(|g| *g).unwrap_or(0)
    }
}

#[async_trait]
impl PriceSource for StaticPriceSource {
    async fn fetch_prices(&self) -> Result<Vec<TokenPrice>, PriceSourceError> {
        if let Ok(mut count) = self.fetches.lock() {
            *count += 1;
        }
        self.records
            .lock()
            .map(|r| r.clone())
            .map_err(|e| PriceSourceError::Unavailable(e.to_string()))
    }
}

/// Settlement that records requests and answers immediately
#[derive(Debug, Default, Clone)]
pub struct RecordingSettlement {
    calls: Arc<Mutex<Vec<SettlementRequest>>>,
    failure: Option<String>,
}

impl RecordingSettlement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: every settlement fails with the given reason
    pub fn failing(reason: &str) -> Self {
        Self {
            calls: Arc::default(),
            failure: Some(reason.to_string()),
        }
    }

    /// Get all recorded requests
    pub fn calls(&self) -> Vec<SettlementRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Settlement for RecordingSettlement {
    async fn settle(&self, request: &SettlementRequest) -> Result<(), SettlementError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.clone());
        }
        match &self.failure {
            Some(reason) => Err(SettlementError::Failed(reason.clone())),
            None => Ok(()),
        }
    }
}
