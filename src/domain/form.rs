//! Swap form state and validation

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::price::PriceTable;
use super::quote::{calculate_swap, parse_amount};
use super::wallet::WalletBalances;

pub const MSG_INVALID_AMOUNT: &str = "Please enter a valid amount";
pub const MSG_SAME_CURRENCY: &str = "Please select different currencies";
pub const MSG_PRICE_UNAVAILABLE: &str = "Price not available for selected currency";

/// Form field an error is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Amount,
    Balance,
    Currencies,
    FromCurrency,
    ToCurrency,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormField::Amount => "amount",
            FormField::Balance => "balance",
            FormField::Currencies => "currencies",
            FormField::FromCurrency => "fromCurrency",
            FormField::ToCurrency => "toCurrency",
        };
        f.write_str(name)
    }
}

/// Field -> message map. Empty means the form is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<FormField, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn remove(&mut self, field: FormField) -> Option<String> {
        self.errors.remove(&field)
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.errors.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, msg)| format!("{}: {}", field, msg))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Swap form as edited by the user. Amounts are kept as entered text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapForm {
    pub from_currency: String,
    pub to_currency: String,
    pub from_amount: String,
    pub to_amount: String,
}

impl Default for SwapForm {
    fn default() -> Self {
        Self::new("USD", "ETH")
    }
}

impl SwapForm {
    pub fn new(from_currency: impl Into<String>, to_currency: impl Into<String>) -> Self {
        Self {
            from_currency: from_currency.into(),
            to_currency: to_currency.into(),
            from_amount: String::new(),
            to_amount: String::new(),
        }
    }

    pub fn with_from_amount(mut self, amount: impl Into<String>) -> Self {
        self.from_amount = amount.into();
        self
    }

    /// Set the source amount and recompute the target amount
    pub fn set_from_amount(&mut self, value: impl Into<String>, prices: &PriceTable) {
        self.from_amount = value.into();
        self.to_amount = calculate_swap(&self.from_amount, &self.from_currency, &self.to_currency, prices);
    }

    /// Set the target amount and recompute the source amount
    pub fn set_to_amount(&mut self, value: impl Into<String>, prices: &PriceTable) {
        self.to_amount = value.into();
        self.from_amount = calculate_swap(&self.to_amount, &self.to_currency, &self.from_currency, prices);
    }

    /// Exchange the currency pair together with both amounts
    pub fn flip(&mut self) {
        std::mem::swap(&mut self.from_currency, &mut self.to_currency);
        std::mem::swap(&mut self.from_amount, &mut self.to_amount);
    }

    /// Clear both amounts, keeping the currency pair
    pub fn clear_amounts(&mut self) {
        self.from_amount.clear();
        self.to_amount.clear();
    }

    pub fn parsed_from_amount(&self) -> Option<f64> {
        parse_amount(&self.from_amount)
    }
}

/// Validate a swap form. Every rule is checked; all violations are returned.
pub fn validate_form(
    form: &SwapForm,
    balances: &WalletBalances,
    prices: &PriceTable,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    let amount = form.parsed_from_amount();

    match amount {
        Some(value) if value.is_finite() && value > 0.0 => {}
        _ => errors.insert(FormField::Amount, MSG_INVALID_AMOUNT),
    }

    let available = balances.balance_of(&form.from_currency);
    if let Some(value) = amount {
        if value > available {
            errors.insert(
                FormField::Balance,
                format!(
                    "Insufficient balance. You have {:.6} {}",
                    available, form.from_currency
                ),
            );
        }
    }

    if form.from_currency == form.to_currency {
        errors.insert(FormField::Currencies, MSG_SAME_CURRENCY);
    }

    if !prices.has_price(&form.from_currency) {
        errors.insert(FormField::FromCurrency, MSG_PRICE_UNAVAILABLE);
    }

    if !prices.has_price(&form.to_currency) {
        errors.insert(FormField::ToCurrency, MSG_PRICE_UNAVAILABLE);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices() -> PriceTable {
        PriceTable::from_pairs([("USD", 1.0), ("ETH", 2000.0), ("ATOM", 8.0)])
    }

    fn wallet() -> WalletBalances {
        WalletBalances::from_pairs([("USD", 1000.0), ("ETH", 2.5)])
    }

    #[test]
    fn test_valid_form() {
        let form = SwapForm::new("USD", "ETH").with_from_amount("100");
        assert!(validate_form(&form, &wallet(), &prices()).is_empty());
    }

    #[test]
    fn test_negative_amount_and_same_currency_reported_together() {
        let form = SwapForm::new("USD", "USD").with_from_amount("-1");
        let errors = validate_form(&form, &wallet(), &prices());
        assert_eq!(errors.get(FormField::Amount), Some(MSG_INVALID_AMOUNT));
        assert_eq!(errors.get(FormField::Currencies), Some(MSG_SAME_CURRENCY));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_missing_amount() {
        let form = SwapForm::new("USD", "ETH");
        let errors = validate_form(&form, &wallet(), &prices());
        assert!(errors.contains(FormField::Amount));
        assert!(!errors.contains(FormField::Balance));
    }

    #[test]
    fn test_non_numeric_amount() {
        let form = SwapForm::new("USD", "ETH").with_from_amount("ten");
        let errors = validate_form(&form, &wallet(), &prices());
        assert!(errors.contains(FormField::Amount));
    }

    #[test]
    fn test_insufficient_balance_message() {
        let form = SwapForm::new("ETH", "USD").with_from_amount("3");
        let errors = validate_form(&form, &wallet(), &prices());
        assert_eq!(
            errors.get(FormField::Balance),
            Some("Insufficient balance. You have 2.500000 ETH")
        );
        assert!(!errors.contains(FormField::Amount));
    }

    #[test]
    fn test_unheld_currency_balance_is_zero() {
        let form = SwapForm::new("ATOM", "USD").with_from_amount("1");
        let errors = validate_form(&form, &wallet(), &prices());
        assert_eq!(
            errors.get(FormField::Balance),
            Some("Insufficient balance. You have 0.000000 ATOM")
        );
    }

    #[test]
    fn test_price_unavailable_both_sides() {
        let form = SwapForm::new("FOO", "BAR").with_from_amount("1");
        let errors = validate_form(&form, &wallet(), &prices());
        assert_eq!(errors.get(FormField::FromCurrency), Some(MSG_PRICE_UNAVAILABLE));
        assert_eq!(errors.get(FormField::ToCurrency), Some(MSG_PRICE_UNAVAILABLE));
    }

    #[test]
    fn test_every_rule_at_once() {
        let form = SwapForm::new("FOO", "FOO").with_from_amount("5000");
        let errors = validate_form(&form, &wallet(), &PriceTable::new());
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(
            fields,
            vec![
                FormField::Balance,
                FormField::Currencies,
                FormField::FromCurrency,
                FormField::ToCurrency
            ]
        );
    }

    #[test]
    fn test_set_from_amount_recomputes_target() {
        let mut form = SwapForm::default();
        form.set_from_amount("100", &prices());
        assert_eq!(form.to_amount, "0.050000");
    }

    #[test]
    fn test_set_to_amount_recomputes_source() {
        let mut form = SwapForm::default();
        form.set_to_amount("0.5", &prices());
        assert_eq!(form.from_amount, "1000.000000");
    }

    #[test]
    fn test_flip_exchanges_pair_and_amounts() {
        let mut form = SwapForm::default();
        form.set_from_amount("100", &prices());
        form.flip();
        assert_eq!(form.from_currency, "ETH");
        assert_eq!(form.to_currency, "USD");
        assert_eq!(form.from_amount, "0.050000");
        assert_eq!(form.to_amount, "100");
    }

    #[test]
    fn test_clear_amounts_keeps_pair() {
        let mut form = SwapForm::new("ATOM", "ETH").with_from_amount("3");
        form.to_amount = "0.012".into();
        form.clear_amounts();
        assert_eq!(form, SwapForm::new("ATOM", "ETH"));
    }

    #[test]
    fn test_errors_serialize_with_field_names() {
        let form = SwapForm::new("USD", "USD").with_from_amount("-1");
        let errors = validate_form(&form, &wallet(), &prices());
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["amount"], MSG_INVALID_AMOUNT);
        assert_eq!(json["currencies"], MSG_SAME_CURRENCY);
    }
}
