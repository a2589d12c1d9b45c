//! swapdesk - Wallet balance ranking and token swap quoting

use anyhow::Result;

use swapdesk::adapters::cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (SWAPDESK_PRICE_FEED, RUST_LOG)
    dotenvy::dotenv().ok();

    let app = cli::init();
    cli::execute(app).await
}
