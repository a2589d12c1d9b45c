//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - JSON files: price-feed snapshots and balance lists
//! - Simulated settlement: latency and failure injection for swaps
//! - CLI: Command-line interface handlers

pub mod json_file;
pub mod simulated_settlement;
pub mod cli;

pub use json_file::{load_balances, BalanceFileError, JsonFilePriceSource};
pub use simulated_settlement::{SimulatedSettlement, SimulatedSettlementConfig};
pub use cli::CliApp;
