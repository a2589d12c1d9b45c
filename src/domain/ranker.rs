//! Balance Ranker
//!
//! Turns raw wallet balances into display rows: positive balances on
//! recognized chains only, highest chain priority first.

use std::cmp::Reverse;

use super::balance::{format_whole, Balance, RankedBalance};
use super::price::PriceTable;
use super::priority::PriorityTable;

/// Filter, order and value a set of balances.
///
/// A balance survives iff its chain is ranked and its amount is > 0.
/// Survivors are ordered by descending priority; balances with equal
/// priority keep their input order.
pub fn rank_balances(
    balances: &[Balance],
    priorities: &PriorityTable,
    prices: &PriceTable,
) -> Vec<RankedBalance> {
    let mut ranked: Vec<(i32, &Balance)> = balances
        .iter()
        .filter(|b| b.amount > 0.0)
        .filter_map(|b| {
            let priority = priorities.priority_of(&b.blockchain);
            priorities.is_ranked(&b.blockchain).then_some((priority, b))
        })
        .collect();

    // sort_by_key is stable
    ranked.sort_by_key(|(priority, _)| Reverse(*priority));

    ranked
        .into_iter()
        .map(|(priority, balance)| RankedBalance {
            balance: balance.clone(),
            priority,
            formatted: format_whole(balance.amount),
            usd_value: balance.amount * prices.price_of(&balance.currency),
        })
        .collect()
}

/// Ranker bound to a priority table
#[derive(Debug, Clone, Default)]
pub struct BalanceRanker {
    priorities: PriorityTable,
}

impl BalanceRanker {
    pub fn new(priorities: PriorityTable) -> Self {
        Self { priorities }
    }

    pub fn rank(&self, balances: &[Balance], prices: &PriceTable) -> Vec<RankedBalance> {
        rank_balances(balances, &self.priorities, prices)
    }

    /// Total USD value of the rows [`rank`](Self::rank) would display
    pub fn total_usd_value(&self, balances: &[Balance], prices: &PriceTable) -> f64 {
        self.rank(balances, prices).iter().map(|r| r.usd_value).sum()
    }
}
