//! CLI Command Handlers
//!
//! Implementation of all CLI commands for swapdesk.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use crate::adapters::json_file::{load_balances, JsonFilePriceSource};
use crate::adapters::simulated_settlement::{SimulatedSettlement, SimulatedSettlementConfig};
use crate::application::{SwapDesk, SwapError};
use crate::config::{load_config, Config};
use crate::domain::{convert, BalanceRanker, PriceTable, RankedBalance};
use crate::ports::PriceSource;

/// swapdesk - Wallet balance ranking and token swap quoting
#[derive(Parser, Debug)]
#[command(
    name = "swapdesk",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Wallet balance ranking and token swap quoting",
    long_about = "swapdesk ranks wallet balances by blockchain priority, quotes swaps \
                  between currencies through their USD prices, and runs simulated swaps \
                  against a configured wallet."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE", default_value = "config/swapdesk.toml")]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rank wallet balances by blockchain priority
    Rank(RankCmd),

    /// Quote a swap between two currencies
    Quote(QuoteCmd),

    /// Execute a simulated swap against the configured wallet
    Swap(SwapCmd),

    /// List currencies with a known price
    Prices(PricesCmd),
}

/// Rank balances
#[derive(Parser, Debug)]
pub struct RankCmd {
    /// JSON file with `[{currency, blockchain, amount}]`
    #[arg(short, long, value_name = "FILE")]
    pub balances: PathBuf,

    /// Output format (text, json)
    #[arg(short, long, value_name = "FORMAT", default_value = "text")]
    pub format: String,
}

/// Get swap quote
#[derive(Parser, Debug)]
pub struct QuoteCmd {
    /// Source currency (e.g., USD)
    #[arg(value_name = "FROM")]
    pub from_currency: String,

    /// Target currency (e.g., ETH)
    #[arg(value_name = "TO")]
    pub to_currency: String,

    /// Amount of the source currency
    #[arg(value_name = "AMOUNT")]
    pub amount: f64,
}

/// Execute swap
#[derive(Parser, Debug)]
pub struct SwapCmd {
    /// Source currency (e.g., USD)
    #[arg(value_name = "FROM")]
    pub from_currency: String,

    /// Target currency (e.g., ETH)
    #[arg(value_name = "TO")]
    pub to_currency: String,

    /// Amount of the source currency
    #[arg(value_name = "AMOUNT")]
    pub amount: String,

    /// Confirm swap without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Skip the simulated settlement latency
    #[arg(long)]
    pub instant: bool,
}

/// List prices
#[derive(Parser, Debug)]
pub struct PricesCmd {
    /// Output format (text, json)
    #[arg(short, long, value_name = "FORMAT", default_value = "text")]
    pub format: String,
}

/// Execute the CLI command
pub async fn execute(app: CliApp) -> Result<()> {
    let config = load_config(&app.config)
        .with_context(|| format!("Failed to load configuration from {}", app.config.display()))?;
    init_logging(app.verbose, app.debug, &config.logging.level)?;

    match app.command {
        Command::Rank(cmd) => rank_command(cmd, &config).await,
        Command::Quote(cmd) => quote_command(cmd, &config).await,
        Command::Swap(cmd) => swap_command(cmd, &config).await,
        Command::Prices(cmd) => prices_command(cmd, &config).await,
    }
}

/// Initialize logging system
fn init_logging(verbose: bool, debug: bool, configured: &str) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

async fn load_prices(config: &Config) -> Result<PriceTable> {
    let path = config.prices.get_feed_path();
    let source = JsonFilePriceSource::new(&path);
    let records = source
        .fetch_prices()
        .await
        .with_context(|| format!("Failed to load prices from {}", path))?;
    let table = PriceTable::from_records(records);
    if table.is_empty() {
        tracing::warn!("Price feed {} is empty", path);
    }
    Ok(table)
}

/// Handle rank command
async fn rank_command(cmd: RankCmd, config: &Config) -> Result<()> {
    let balances = load_balances(&cmd.balances)
        .with_context(|| format!("Failed to load balances from {}", cmd.balances.display()))?;
    let prices = load_prices(config).await?;

    let ranker = BalanceRanker::new(config.priorities.clone());
    let rows = ranker.rank(&balances, &prices);
    tracing::info!("{} of {} balances displayed", rows.len(), balances.len());

    match cmd.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&rows)?),
        _ => print_rows(&rows),
    }
    Ok(())
}

fn print_rows(rows: &[RankedBalance]) {
    println!("{:<10} {:<12} {:>14} {:>16}", "CURRENCY", "CHAIN", "AMOUNT", "USD VALUE");
    for row in rows {
        println!(
            "{:<10} {:<12} {:>14} {:>16.2}",
            row.currency(),
            row.balance.blockchain,
            row.formatted,
            row.usd_value
        );
    }
    let total: f64 = rows.iter().map(|r| r.usd_value).sum();
    println!("{:<10} {:<12} {:>14} {:>16.2}", "TOTAL", "", "", total);
}

/// Handle quote command
async fn quote_command(cmd: QuoteCmd, config: &Config) -> Result<()> {
    let prices = load_prices(config).await?;
    let conversion = convert(cmd.amount, &cmd.from_currency, &cmd.to_currency, &prices)?;

    println!(
        "{} {} = {:.6} {}",
        cmd.amount, cmd.from_currency, conversion.to_amount, cmd.to_currency
    );
    println!(
        "Rate: 1 {} = {:.6} {}",
        cmd.from_currency, conversion.exchange_rate, cmd.to_currency
    );
    println!("Value: ${:.2}", conversion.usd_value);
    Ok(())
}

/// Handle swap command
async fn swap_command(cmd: SwapCmd, config: &Config) -> Result<()> {
    let prices = load_prices(config).await?;

    let settlement_config = if cmd.instant {
        SimulatedSettlementConfig::instant()
    } else {
        SimulatedSettlementConfig::from(&config.settlement)
    };
    let desk = SwapDesk::new(
        config.wallet.balances.clone(),
        prices,
        Arc::new(SimulatedSettlement::new(settlement_config)),
    )
    .with_form(config.wallet.initial_form());

    desk.set_from_currency(&cmd.from_currency).await;
    desk.set_to_currency(&cmd.to_currency).await;
    desk.set_from_amount(&cmd.amount).await;

    let errors = desk.validate().await;
    if !errors.is_empty() {
        for field in errors.fields() {
            eprintln!("  {}: {}", field, errors.get(field).unwrap_or_default());
        }
        bail!("Swap rejected");
    }

    let form = desk.form().await;
    println!(
        "Swap {} {} -> {} {}",
        form.from_amount, form.from_currency, form.to_amount, form.to_currency
    );

    if !cmd.yes && !confirm("Proceed?")? {
        println!("Swap cancelled");
        return Ok(());
    }

    match desk.execute_swap().await {
        Ok(quote) => {
            println!("{}", serde_json::to_string_pretty(&quote)?);
            let balances = desk.balances().await;
            println!(
                "Balances: {} {:.6} | {} {:.6}",
                quote.from_currency,
                balances.balance_of(&quote.from_currency),
                quote.to_currency,
                balances.balance_of(&quote.to_currency)
            );
            Ok(())
        }
        Err(SwapError::Rejected(errors)) => bail!("Swap rejected: {}", errors),
        Err(e) => Err(e).context("Swap failed"),
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Handle prices command
async fn prices_command(cmd: PricesCmd, config: &Config) -> Result<()> {
    let prices = load_prices(config).await?;
    let currencies = prices.available_currencies();

    match cmd.format.as_str() {
        "json" => {
            let listing: Vec<serde_json::Value> = currencies
                .iter()
                .map(|c| serde_json::json!({ "currency": c, "price": prices.price_of(c) }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        _ => {
            for currency in &currencies {
                println!("{:<10} {:>18.8}", currency, prices.price_of(currency));
            }
        }
    }
    Ok(())
}
