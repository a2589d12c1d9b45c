//! swapdesk Integration Tests
//!
//! Integration tests that verify the components work together:
//! 1. Balance file + price feed -> BalanceRanker display rows
//! 2. Price feed -> SwapDesk form -> validation
//! 3. SwapDesk submission through settlement to committed balances
//!
//! All tests are deterministic (no network, no real latency).

use std::io::Write;
use std::sync::Arc;

use swapdesk::adapters::{load_balances, JsonFilePriceSource};
use swapdesk::application::{SwapDesk, SwapError, SwapPhase};
use swapdesk::domain::{
    Balance, BalanceRanker, Blockchain, FormField, PriceTable, PriorityTable, SwapRequest,
    TokenPrice, WalletBalances,
};
use swapdesk::ports::{PriceSource, RecordingSettlement, StaticPriceSource};
use tempfile::NamedTempFile;

// ============================================================================
// Test Fixtures
// ============================================================================

fn feed() -> Vec<TokenPrice> {
    vec![
        TokenPrice::new("USD", 1.0, "2023-08-29T07:10:40.000Z"),
        TokenPrice::new("ETH", 1645.93, "2023-08-29T07:10:52.000Z"),
        TokenPrice::new("ATOM", 7.19, "2023-08-29T07:10:50.000Z"),
        TokenPrice::new("OSMO", 0.37, "2023-08-29T07:10:50.000Z"),
        TokenPrice::new("USDC", 1.0, "2023-08-29T07:10:40.000Z"),
        // older duplicate, ignored
        TokenPrice::new("ETH", 1600.0, "2023-08-28T07:10:52.000Z"),
    ]
}

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn demo_desk(settlement: RecordingSettlement) -> SwapDesk {
    SwapDesk::new(
        WalletBalances::demo(),
        PriceTable::from_records(feed()),
        Arc::new(settlement),
    )
}

// ============================================================================
// Ranking
// ============================================================================

#[tokio::test]
async fn test_rank_from_files() {
    let balances = write_temp(
        r#"[
            {"currency": "ETH",  "blockchain": "Ethereum", "amount": 2.5},
            {"currency": "OSMO", "blockchain": "Osmosis",  "amount": 100},
            {"currency": "ATOM", "blockchain": "Cosmos",   "amount": 40},
            {"currency": "USDC", "blockchain": "Arbitrum", "amount": 0},
            {"currency": "ZIL",  "blockchain": "Zilliqa",  "amount": 12.4}
        ]"#,
    );
    let prices = write_temp(&serde_json::to_string(&feed()).unwrap());

    let balances = load_balances(balances.path()).unwrap();
    let records = JsonFilePriceSource::new(prices.path())
        .fetch_prices()
        .await
        .unwrap();
    let table = PriceTable::from_records(records);

    let rows = BalanceRanker::new(PriorityTable::default()).rank(&balances, &table);

    let currencies: Vec<&str> = rows.iter().map(|r| r.currency()).collect();
    // Cosmos is unranked, USDC is empty
    assert_eq!(currencies, vec!["OSMO", "ETH", "ZIL"]);

    assert_eq!(rows[0].formatted, "100");
    assert!((rows[0].usd_value - 37.0).abs() < 1e-9);
    assert!((rows[1].usd_value - 2.5 * 1645.93).abs() < 1e-9);
    assert_eq!(rows[1].formatted, "3");
    // no ZIL price
    assert_eq!(rows[2].usd_value, 0.0);
    assert_eq!(rows[2].formatted, "12");
}

#[test]
fn test_rank_serializes_flat_rows() {
    let balances = vec![Balance::new(
        "ETH",
        Blockchain::new("Ethereum").unwrap(),
        1.0,
    )];
    let table = PriceTable::from_pairs([("ETH", 2000.0)]);
    let rows = BalanceRanker::new(PriorityTable::default()).rank(&balances, &table);

    let json = serde_json::to_value(&rows).unwrap();
    assert_eq!(json[0]["currency"], "ETH");
    assert_eq!(json[0]["blockchain"], "Ethereum");
    assert_eq!(json[0]["usdValue"], 2000.0);
    assert_eq!(json[0]["formatted"], "1");
}

// ============================================================================
// Form validation
// ============================================================================

#[tokio::test]
async fn test_desk_loads_prices_and_quotes() {
    let source = StaticPriceSource::new(feed());
    let desk = SwapDesk::new(
        WalletBalances::demo(),
        PriceTable::new(),
        Arc::new(RecordingSettlement::new()),
    );
    assert!(desk.is_loading().await);

    let count = desk.refresh_prices(&source).await.unwrap();
    assert_eq!(count, 5);
    assert!(!desk.is_loading().await);
    assert_eq!(
        desk.available_currencies().await,
        vec!["ATOM", "ETH", "OSMO", "USD", "USDC"]
    );

    desk.set_from_amount("1645.93").await;
    let form = desk.form().await;
    assert_eq!(form.to_amount, "1.000000");
}

#[tokio::test]
async fn test_validation_reports_each_field() {
    let desk = demo_desk(RecordingSettlement::new());

    desk.set_to_currency("USD").await;
    desk.set_from_amount("abc").await;
    let errors = desk.validate().await;

    assert!(errors.contains(FormField::Amount));
    assert!(errors.contains(FormField::Currencies));
    assert!(!errors.contains(FormField::Balance));
}

#[tokio::test]
async fn test_validation_insufficient_balance() {
    let desk = demo_desk(RecordingSettlement::new());

    desk.set_from_amount("5000").await;
    let errors = desk.validate().await;

    assert_eq!(errors.len(), 1);
    assert!(errors
        .get(FormField::Balance)
        .unwrap()
        .starts_with("Insufficient balance"));
}

// ============================================================================
// Execution
// ============================================================================

#[tokio::test]
async fn test_execute_swap_commits_balances() {
    let settlement = RecordingSettlement::new();
    let desk = demo_desk(settlement.clone());

    desk.set_from_amount("164.593").await;
    let quote = desk.execute_swap().await.unwrap();

    assert!(quote.success);
    assert!(quote.transaction_id.starts_with("TX"));
    assert!((quote.to_amount - 0.1).abs() < 1e-9);
    assert!((quote.total_value_usd - 164.593).abs() < 1e-9);

    assert!((desk.balance_of("USD").await - (1000.0 - 164.593)).abs() < 1e-9);
    assert!((desk.balance_of("ETH").await - 2.6).abs() < 1e-9);
    assert_eq!(settlement.calls().len(), 1);

    let form = desk.form().await;
    assert_eq!(form.from_amount, "");
    assert_eq!(form.to_amount, "");
    assert_eq!(form.from_currency, "USD");
    assert_eq!(desk.phase().await, SwapPhase::Idle);
    assert_eq!(desk.last_quote().await, Some(quote));
}

#[tokio::test]
async fn test_rejected_swap_never_settles() {
    let settlement = RecordingSettlement::new();
    let desk = demo_desk(settlement.clone());

    let result = desk.submit(SwapRequest::new("ATOM", "ATOM", 1.0)).await;

    assert!(matches!(result, Err(SwapError::Rejected(_))));
    assert!(settlement.calls().is_empty());
    assert_eq!(desk.balances().await, WalletBalances::demo());
}

#[tokio::test]
async fn test_failed_settlement_leaves_balances() {
    let desk = demo_desk(RecordingSettlement::failing("venue offline"));

    desk.set_from_amount("10").await;
    let result = desk.execute_swap().await;

    assert!(matches!(result, Err(SwapError::Settlement(_))));
    assert_eq!(desk.balances().await, WalletBalances::demo());
    assert_eq!(desk.form().await.from_amount, "10");
}

#[tokio::test]
async fn test_sequential_swaps_stop_at_balance() {
    let desk = demo_desk(RecordingSettlement::new());

    for _ in 0..4 {
        desk.submit(SwapRequest::new("ATOM", "OSMO", 25.0))
            .await
            .unwrap();
    }
    let result = desk.submit(SwapRequest::new("ATOM", "OSMO", 25.0)).await;

    assert!(matches!(result, Err(SwapError::Rejected(_))));
    assert_eq!(desk.balance_of("ATOM").await, 0.0);
}
