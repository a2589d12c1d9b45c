use async_trait::async_trait;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use crate::domain::TokenPrice;

#[derive(Debug, Error)]
pub enum PriceSourceError {
    #[error("Failed to read price feed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse price feed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Price feed unavailable: {0}")]
    Unavailable(String),
}

/// Source of full price snapshots (`[{currency, price, date}]`)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch the current snapshot. Each call replaces the previous one.
    async fn fetch_prices(&self) -> Result<Vec<TokenPrice>, PriceSourceError>;
}
