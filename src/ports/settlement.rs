use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SettlementError {
    #[error("Settlement failed: {0}")]
    Failed(String),
}

/// A validated swap handed to settlement before balances are touched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementRequest {
    pub from_currency: String,
    pub to_currency: String,
    pub from_amount: f64,
    pub to_amount: f64,
}

/// The Pending step of a swap: network/settlement latency and the chance
/// of failure. Implementations must not mutate balances.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Settlement: Send + Sync {
    async fn settle(&self, request: &SettlementRequest) -> Result<(), SettlementError>;
}
