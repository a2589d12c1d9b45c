//! swapdesk - Wallet balance ranking and token swap quoting
//!
//! Ranks wallet balances by blockchain priority and quotes swaps between
//! currencies through their USD prices, with a simulated settlement step.
//!
//! # Modules
//!
//! - `domain`: Core business logic (BalanceRanker, PriceTable, SwapForm, WalletBalances)
//! - `ports`: Trait abstractions (PriceSource, Settlement)
//! - `adapters`: External implementations (JSON files, simulated settlement, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: SwapDesk use cases

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod application;
