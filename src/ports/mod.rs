//! Ports Layer - Trait definitions for external dependencies
//!
//! - Price snapshots (the external price feed)
//! - Settlement (the Pending step of a swap)
//!
//! `mocks` holds in-memory implementations used by tests and demos.

pub mod price_source;
pub mod settlement;
pub mod mocks;

pub use price_source::{PriceSource, PriceSourceError};
pub use settlement::{Settlement, SettlementError, SettlementRequest};
pub use mocks::{RecordingSettlement, StaticPriceSource};
