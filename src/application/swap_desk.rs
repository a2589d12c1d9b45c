//! Swap Desk
//!
//! Owns one wallet's balances, the current price snapshot and the swap form,
//! and runs swap submissions:
//!
//! ```text
//! Idle -> Validating -> Rejected(errors) -> Idle
//!                    -> Pending -> Committed(SwapQuote)
//!                    -> Pending -> Failed(error) -> Idle
//! ```
//!
//! Balances change only when a submission commits. Submissions are
//! serialized per desk; quoting and form edits never wait on a pending
//! settlement.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::domain::{
    calculate_swap, convert, quote, validate_form, FormField, PriceTable, QuoteError, SwapForm,
    SwapQuote, SwapRequest, TokenPrice, ValidationErrors, WalletBalances, WalletError,
};
use crate::ports::{PriceSource, PriceSourceError, Settlement, SettlementError, SettlementRequest};

#[derive(Debug, Error)]
pub enum SwapError {
    #[error("Swap rejected: {0}")]
    Rejected(ValidationErrors),
    #[error(transparent)]
    Quote(#[from] QuoteError),
    #[error(transparent)]
    Settlement(#[from] SettlementError),
    #[error("Swap could not be committed: {0}")]
    Commit(#[from] WalletError),
}

impl SwapError {
    /// Validation errors, when the swap was rejected before settlement
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            SwapError::Rejected(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Where the current submission is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapPhase {
    Idle,
    Validating,
    Pending,
}

/// Single owner of a wallet's balances
#[derive(Clone)]
pub struct SwapDesk {
    balances: Arc<RwLock<WalletBalances>>,
    prices: Arc<RwLock<PriceTable>>,
    form: Arc<RwLock<SwapForm>>,
    errors: Arc<RwLock<ValidationErrors>>,
    phase: Arc<RwLock<SwapPhase>>,
    last_quote: Arc<RwLock<Option<SwapQuote>>>,
    settlement: Arc<dyn Settlement>,
    submit_lock: Arc<Mutex<()>>,
}

impl SwapDesk {
    pub fn new(balances: WalletBalances, prices: PriceTable, settlement: Arc<dyn Settlement>) -> Self {
        Self {
            balances: Arc::new(RwLock::new(balances)),
            prices: Arc::new(RwLock::new(prices)),
            form: Arc::new(RwLock::new(SwapForm::default())),
            errors: Arc::new(RwLock::new(ValidationErrors::new())),
            phase: Arc::new(RwLock::new(SwapPhase::Idle)),
            last_quote: Arc::new(RwLock::new(None)),
            settlement,
            submit_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Replace the initial form (default pair is USD -> ETH)
    pub fn with_form(self, form: SwapForm) -> Self {
        Self {
            form: Arc::new(RwLock::new(form)),
            ..self
        }
    }

    // ------------------------------------------------------------------
    // Prices
    // ------------------------------------------------------------------

    /// Replace the price snapshot with a new full feed snapshot
    pub async fn replace_prices(&self, records: Vec<TokenPrice>) {
        let table = PriceTable::from_records(records);
        info!("Price snapshot replaced: {} currencies", table.len());
        *self.prices.write().await = table;
    }

    /// Fetch a snapshot from `source` and install it. On error the previous
    /// snapshot stays in place.
    pub async fn refresh_prices(&self, source: &dyn PriceSource) -> Result<usize, PriceSourceError> {
        let records = source.fetch_prices().await.map_err(|e| {
            warn!("Failed to fetch prices: {}", e);
            e
        })?;
        self.replace_prices(records).await;
        Ok(self.prices.read().await.len())
    }

    pub async fn prices(&self) -> PriceTable {
        self.prices.read().await.clone()
    }

    pub async fn available_currencies(&self) -> Vec<String> {
        self.prices.read().await.available_currencies()
    }

    /// True until the first non-empty snapshot arrives
    pub async fn is_loading(&self) -> bool {
        self.prices.read().await.is_empty()
    }

    // ------------------------------------------------------------------
    // Balances
    // ------------------------------------------------------------------

    pub async fn balances(&self) -> WalletBalances {
        self.balances.read().await.clone()
    }

    pub async fn balance_of(&self, currency: &str) -> f64 {
        self.balances.read().await.balance_of(currency)
    }

    // ------------------------------------------------------------------
    // Quoting
    // ------------------------------------------------------------------

    pub async fn quote(&self, from_amount: f64, from: &str, to: &str) -> Result<f64, QuoteError> {
        quote(from_amount, from, to, &*self.prices.read().await)
    }

    pub async fn calculate_swap(&self, amount: &str, from: &str, to: &str) -> String {
        calculate_swap(amount, from, to, &*self.prices.read().await)
    }

    // ------------------------------------------------------------------
    // Form
    // ------------------------------------------------------------------

    pub async fn form(&self) -> SwapForm {
        self.form.read().await.clone()
    }

    pub async fn errors(&self) -> ValidationErrors {
        self.errors.read().await.clone()
    }

    /// Edit the source amount; recomputes the target amount and clears
    /// stale amount/balance errors
    pub async fn set_from_amount(&self, value: &str) {
        let prices = self.prices.read().await;
        self.form.write().await.set_from_amount(value, &prices);
        drop(prices);

        let mut errors = self.errors.write().await;
        errors.remove(FormField::Amount);
        errors.remove(FormField::Balance);
    }

    /// Edit the target amount; recomputes the source amount
    pub async fn set_to_amount(&self, value: &str) {
        let prices = self.prices.read().await;
        self.form.write().await.set_to_amount(value, &prices);
    }

    /// Pick the source currency; recomputes the target amount and clears
    /// a stale `fromCurrency` error
    pub async fn set_from_currency(&self, currency: &str) {
        {
            let prices = self.prices.read().await;
            let mut form = self.form.write().await;
            form.from_currency = currency.to_string();
            let amount = form.from_amount.clone();
            form.set_from_amount(amount, &prices);
        }
        self.errors.write().await.remove(FormField::FromCurrency);
    }

    /// Pick the target currency; recomputes the target amount and clears
    /// a stale `toCurrency` error
    pub async fn set_to_currency(&self, currency: &str) {
        {
            let prices = self.prices.read().await;
            let mut form = self.form.write().await;
            form.to_currency = currency.to_string();
            let amount = form.from_amount.clone();
            form.set_from_amount(amount, &prices);
        }
        self.errors.write().await.remove(FormField::ToCurrency);
    }

    /// Swap the currency pair together with both amounts
    pub async fn flip_currencies(&self) {
        self.form.write().await.flip();
    }

    /// Validate the current form and remember the result
    pub async fn validate(&self) -> ValidationErrors {
        let form = self.form.read().await.clone();
        let errors = {
            let balances = self.balances.read().await;
            let prices = self.prices.read().await;
            validate_form(&form, &balances, &prices)
        };
        *self.errors.write().await = errors.clone();
        errors
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    pub async fn phase(&self) -> SwapPhase {
        *self.phase.read().await
    }

    pub async fn last_quote(&self) -> Option<SwapQuote> {
        self.last_quote.read().await.clone()
    }

    /// Submit the current form.
    ///
    /// On success the amounts are cleared and the pair kept. On rejection
    /// the errors are stored for the form; on settlement failure the form
    /// is left as it was so the user can retry.
    pub async fn execute_swap(&self) -> Result<SwapQuote, SwapError> {
        let _serial = self.submit_lock.lock().await;
        let request = SwapRequest::from(&*self.form.read().await);

        let result = self.process(&request).await;
        match &result {
            Ok(_) => {
                self.form.write().await.clear_amounts();
                *self.errors.write().await = ValidationErrors::new();
            }
            Err(SwapError::Rejected(errors)) => {
                *self.errors.write().await = errors.clone();
            }
            Err(_) => {}
        }
        self.set_phase(SwapPhase::Idle).await;
        result
    }

    /// Submit an explicit request, bypassing the form
    pub async fn submit(&self, request: SwapRequest) -> Result<SwapQuote, SwapError> {
        let _serial = self.submit_lock.lock().await;
        let result = self.process(&request).await;
        self.set_phase(SwapPhase::Idle).await;
        result
    }

    async fn set_phase(&self, phase: SwapPhase) {
        debug!("Swap phase -> {:?}", phase);
        *self.phase.write().await = phase;
    }

    async fn process(&self, request: &SwapRequest) -> Result<SwapQuote, SwapError> {
        self.set_phase(SwapPhase::Validating).await;

        let form = request.to_form();
        let (from_amount, conversion) = {
            let balances = self.balances.read().await;
            let prices = self.prices.read().await;

            let errors = validate_form(&form, &balances, &prices);
            if !errors.is_empty() {
                info!("Swap rejected: {}", errors);
                return Err(SwapError::Rejected(errors));
            }

            let from_amount = form.parsed_from_amount().unwrap_or(f64::NAN);
            let conversion = convert(from_amount, &form.from_currency, &form.to_currency, &prices)?;
            (from_amount, conversion)
        };

        self.set_phase(SwapPhase::Pending).await;
        let settlement_request = SettlementRequest {
            from_currency: form.from_currency.clone(),
            to_currency: form.to_currency.clone(),
            from_amount,
            to_amount: conversion.to_amount,
        };
        if let Err(e) = self.settlement.settle(&settlement_request).await {
            warn!(
                "Swap {} {} -> {} failed during settlement: {}",
                from_amount, form.from_currency, form.to_currency, e
            );
            return Err(e.into());
        }

        let committed = {
            let mut balances = self.balances.write().await;
            balances.apply_swap(
                &form.from_currency,
                from_amount,
                &form.to_currency,
                conversion.to_amount,
            )?;
            SwapQuote::committed(&form.from_currency, &form.to_currency, from_amount, &conversion)
        };

        info!(
            "Swap committed {}: {} {} -> {:.6} {} (${:.2})",
            committed.transaction_id,
            committed.from_amount,
            committed.from_currency,
            committed.to_amount,
            committed.to_currency,
            committed.total_value_usd
        );
        *self.last_quote.write().await = Some(committed.clone());
        Ok(committed)
    }
}
