//! Reward reporting over a user's transactions: what was earned, what could
//! have been earned, and where the money went.

mod config;
mod optimal;
mod spending;
mod summary;
pub mod views;

#[cfg(test)]
mod tests;

pub use config::{AnalysisConfig, DEFAULT_IMPROVEMENT_THRESHOLD, DEFAULT_TOP_OPPORTUNITIES};
pub use optimal::{
    ImprovementOpportunity, OptimalCashbackAnalyzer, OptimalCashbackReport, NO_CARD, UNKNOWN_CARD,
};
pub use spending::{SpendingSummary, Tally, UNKNOWN_ACCOUNT, UNKNOWN_INSTITUTION};
pub use summary::{Breakdown, CashbackAggregator, RewardSummary};

use crate::rewards::parse_date;
use crate::transactions::Transaction;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Cent rounding applied at the reporting boundary only.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp(2)
}

pub(crate) fn round_map(values: &BTreeMap<String, Decimal>) -> BTreeMap<String, Decimal> {
    values
        .iter()
        .map(|(key, value)| (key.clone(), round_money(*value)))
        .collect()
}

/// Ascending date order for cap accounting. Undated rows sort first and equal
/// dates keep their input order.
pub(crate) fn chronological(transactions: &[Transaction]) -> Vec<&Transaction> {
    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    ordered.sort_by_key(|transaction| parse_date(&transaction.date));
    ordered
}

/// The entry for `key` plus `amount`, or `None` when the sum overflows.
pub(crate) fn checked_entry(
    values: &BTreeMap<String, Decimal>,
    key: &str,
    amount: Decimal,
) -> Option<Decimal> {
    values
        .get(key)
        .copied()
        .unwrap_or_default()
        .checked_add(amount)
}
