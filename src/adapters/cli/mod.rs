//! CLI Adapter
//!
//! Command-line interface for swapdesk.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{CliApp, Command, PricesCmd, QuoteCmd, RankCmd, SwapCmd};

use anyhow::Result;

/// Initialize the CLI application
pub fn init() -> CliApp {
    use clap::Parser;
    CliApp::parse()
}

/// Execute the CLI command
pub async fn execute(app: CliApp) -> Result<()> {
    commands::execute(app).await
}
