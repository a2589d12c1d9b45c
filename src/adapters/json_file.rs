//! JSON file adapters
//!
//! Reads price-feed snapshots and balance lists from local JSON files.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::domain::{Balance, TokenPrice};
use crate::ports::{PriceSource, PriceSourceError};

/// Price source backed by a JSON file holding `[{currency, price, date}]`.
/// The file is re-read on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFilePriceSource {
    path: PathBuf,
}

impl JsonFilePriceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PriceSource for JsonFilePriceSource {
    async fn fetch_prices(&self) -> Result<Vec<TokenPrice>, PriceSourceError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let records: Vec<TokenPrice> = serde_json::from_str(&content)?;
        debug!("Loaded {} price records from {}", records.len(), self.path.display());
        Ok(records)
    }
}

#[derive(Debug, Error)]
pub enum BalanceFileError {
    #[error("Failed to read balances file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse balances file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load `[{currency, blockchain, amount}]` from a JSON file
pub fn load_balances<P: AsRef<Path>>(path: P) -> Result<Vec<Balance>, BalanceFileError> {
    let content = std::fs::read_to_string(path)?;
    let balances: Vec<Balance> = serde_json::from_str(&content)?;
    Ok(balances)
}
