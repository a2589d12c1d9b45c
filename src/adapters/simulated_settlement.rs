//! Simulated Settlement
//!
//! Stands in for a real settlement venue: waits a base delay plus random
//! jitter, then succeeds or fails with a configured probability.

use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, warn};

use crate::ports::{Settlement, SettlementError, SettlementRequest};

/// Settlement simulation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedSettlementConfig {
    /// Minimum latency of every settlement
    pub base_delay: Duration,
    /// Upper bound of the random extra latency
    pub jitter: Duration,
    /// Probability (0-1) that a settlement fails
    pub failure_rate: f64,
}

impl Default for SimulatedSettlementConfig {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(2000),
            jitter: Duration::from_millis(1000),
            failure_rate: 0.0,
        }
    }
}

impl SimulatedSettlementConfig {
    /// No latency, never fails
    pub fn instant() -> Self {
        Self {
            base_delay: Duration::ZERO,
            jitter: Duration::ZERO,
            failure_rate: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimulatedSettlement {
    config: SimulatedSettlementConfig,
}

impl SimulatedSettlement {
    pub fn new(config: SimulatedSettlementConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulatedSettlementConfig {
        &self.config
    }

    /// Draw the latency and outcome of one settlement
    fn draw(&self) -> (Duration, bool) {
        let mut rng = rand::thread_rng();
        let jitter_ms = self.config.jitter.as_millis() as u64;
        let extra = if jitter_ms > 0 {
            Duration::from_millis(rng.gen_range(0..=jitter_ms))
        } else {
            Duration::ZERO
        };
        let fails = self.config.failure_rate > 0.0 && rng.gen::<f64>() < self.config.failure_rate;
        (self.config.base_delay + extra, fails)
    }
}

#[async_trait]
impl Settlement for SimulatedSettlement {
    async fn settle(&self, request: &SettlementRequest) -> Result<(), SettlementError> {
        let (delay, fails) = self.draw();
        debug!(
            "Settling {} {} -> {:.6} {} (latency {:?})",
            request.from_amount, request.from_currency, request.to_amount, request.to_currency, delay
        );

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if fails {
            warn!(
                "Simulated settlement failure for {} -> {}",
                request.from_currency, request.to_currency
            );
            return Err(SettlementError::Failed(
                "simulated settlement failure".to_string(),
            ));
        }
        Ok(())
    }
}
