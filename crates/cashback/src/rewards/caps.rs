use super::program::{Quote, RewardError, RewardProgram};
use crate::transactions::Transaction;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const LIFETIME_KEY: &str = "lifetime";

/// Window a capped program's limits apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapPeriod {
    Quarterly,
    Annual,
}

impl CapPeriod {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Quarterly => "quarter",
            Self::Annual => "year",
        }
    }

    pub fn key_for(self, date: NaiveDate) -> String {
        match self {
            Self::Quarterly => format!("{}-Q{}", date.year(), date.month0() / 3 + 1),
            Self::Annual => date.year().to_string(),
        }
    }
}

/// Whether cap usage rolls over with the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapResetPolicy {
    /// Usage is bucketed by the calendar quarter or year of the transaction
    /// date. Undated transactions share one lifetime bucket.
    #[default]
    CalendarPeriod,
    /// One bucket for the whole evaluated window.
    Lifetime,
}

impl CapResetPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "calendar" | "calendar_period" | "period" => Some(Self::CalendarPeriod),
            "lifetime" | "never" | "none" => Some(Self::Lifetime),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CalendarPeriod => "calendar period",
            Self::Lifetime => "lifetime",
        }
    }
}

/// Qualifying spend and tier reward already consumed in one cap period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CapUsage {
    pub spend: Decimal,
    pub reward: Decimal,
}

/// Running cap usage for a single evaluation pass.
///
/// A ledger belongs to exactly one pass over one user's transactions and is
/// dropped afterwards. The actual-reward pass and the what-if pass each build
/// their own.
#[derive(Debug, Clone, Default)]
pub struct CapLedger {
    policy: CapResetPolicy,
    usage: HashMap<(String, String), CapUsage>,
}

impl CapLedger {
    pub fn new(policy: CapResetPolicy) -> Self {
        Self {
            policy,
            usage: HashMap::new(),
        }
    }

    fn period_key(&self, program: &RewardProgram, date: &str) -> Option<String> {
        let period = program.cap_period()?;
        let key = match self.policy {
            CapResetPolicy::Lifetime => LIFETIME_KEY.to_string(),
            CapResetPolicy::CalendarPeriod => parse_date(date)
                .map(|date| period.key_for(date))
                .unwrap_or_else(|| LIFETIME_KEY.to_string()),
        };
        Some(key)
    }

    /// Usage already consumed in the period `transaction` falls into.
    pub fn usage_for(&self, program: &RewardProgram, transaction: &Transaction) -> CapUsage {
        self.period_key(program, &transaction.date)
            .and_then(|key| self.usage.get(&(program.name.clone(), key)).copied())
            .unwrap_or_default()
    }

    /// Prices `transaction` without recording anything.
    pub fn quote(
        &self,
        program: &RewardProgram,
        transaction: &Transaction,
    ) -> Result<Quote, RewardError> {
        program.quote(transaction, self.usage_for(program, transaction))
    }

    /// Records the usage a previously computed quote consumes.
    pub fn commit(&mut self, program: &RewardProgram, transaction: &Transaction, quote: &Quote) {
        let Some(usage) = quote.usage else {
            return;
        };
        if let Some(key) = self.period_key(program, &transaction.date) {
            self.usage.insert((program.name.clone(), key), usage);
        }
    }

    /// Quotes and commits in one step, returning the reward.
    pub fn evaluate(
        &mut self,
        program: &RewardProgram,
        transaction: &Transaction,
    ) -> Result<Decimal, RewardError> {
        let quote = self.quote(program, transaction)?;
        self.commit(program, transaction, &quote);
        Ok(quote.reward)
    }

    /// Seeds usage for the period containing `date`, e.g. spend accrued before
    /// the evaluated window.
    pub fn seed(&mut self, program: &RewardProgram, date: &str, usage: CapUsage) {
        if let Some(key) = self.period_key(program, date) {
            self.usage.insert((program.name.clone(), key), usage);
        }
    }

    pub fn reset(&mut self) {
        self.usage.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.usage.is_empty()
    }
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::program::{Condition, ProgramKind, Tier};
    use crate::transactions::OTHER_CHANNEL;
    use rust_decimal_macros::dec;

    fn discover_like() -> RewardProgram {
        RewardProgram::new(
            "Rotating",
            ProgramKind::Capped {
                tiers: vec![Tier::new(
                    "quarterly_category",
                    Condition::CategoryContains(&["Groceries"]),
                    dec!(0.05),
                )],
                default_rate: dec!(0.01),
                spend_cap: dec!(1500),
                reward_ceiling: None,
                period: CapPeriod::Quarterly,
            },
        )
    }

    fn grocery(date: &str, amount: Decimal) -> Transaction {
        Transaction {
            id: format!("tx-{date}"),
            account_id: "acc".to_string(),
            date: date.to_string(),
            name: "Whole Foods".to_string(),
            merchant_name: Some("Whole Foods".to_string()),
            amount: -amount,
            category: "Groceries".to_string(),
            payment_channel: OTHER_CHANNEL.to_string(),
        }
    }

    #[test]
    fn quarter_keys_follow_calendar() {
        let date = |m| NaiveDate::from_ymd_opt(2025, m, 15).expect("valid date");
        assert_eq!(CapPeriod::Quarterly.key_for(date(1)), "2025-Q1");
        assert_eq!(CapPeriod::Quarterly.key_for(date(6)), "2025-Q2");
        assert_eq!(CapPeriod::Quarterly.key_for(date(12)), "2025-Q4");
        assert_eq!(CapPeriod::Annual.key_for(date(12)), "2025");
    }

    #[test]
    fn evaluate_accumulates_within_period() {
        let program = discover_like();
        let mut ledger = CapLedger::new(CapResetPolicy::CalendarPeriod);

        let first = ledger
            .evaluate(&program, &grocery("2025-04-02", dec!(1490)))
            .expect("first");
        assert_eq!(first, dec!(74.50));

        let straddle = ledger
            .evaluate(&program, &grocery("2025-05-20", dec!(50)))
            .expect("straddle");
        assert_eq!(straddle, dec!(0.90));

        let after = ledger
            .evaluate(&program, &grocery("2025-06-01", dec!(100)))
            .expect("after cap");
        assert_eq!(after, dec!(1.00));
    }

    #[test]
    fn calendar_policy_resets_next_quarter() {
        let program = discover_like();
        let mut ledger = CapLedger::new(CapResetPolicy::CalendarPeriod);
        ledger
            .evaluate(&program, &grocery("2025-06-30", dec!(1500)))
            .expect("fill q2");

        let next_quarter = ledger
            .evaluate(&program, &grocery("2025-07-01", dec!(100)))
            .expect("q3");
        assert_eq!(next_quarter, dec!(5.00));
    }

    #[test]
    fn lifetime_policy_never_resets() {
        let program = discover_like();
        let mut ledger = CapLedger::new(CapResetPolicy::Lifetime);
        ledger
            .evaluate(&program, &grocery("2025-06-30", dec!(1500)))
            .expect("fill");

        let next_quarter = ledger
            .evaluate(&program, &grocery("2025-07-01", dec!(100)))
            .expect("next");
        assert_eq!(next_quarter, dec!(1.00));
    }

    #[test]
    fn quote_does_not_consume_usage() {
        let program = discover_like();
        let ledger = CapLedger::new(CapResetPolicy::CalendarPeriod);
        let transaction = grocery("2025-04-02", dec!(1500));

        let first = ledger.quote(&program, &transaction).expect("quote");
        let second = ledger.quote(&program, &transaction).expect("quote");
        assert_eq!(first, second);
        assert!(ledger.is_empty());
    }

    #[test]
    fn seeded_usage_applies_to_matching_period() {
        let program = discover_like();
        let mut ledger = CapLedger::new(CapResetPolicy::CalendarPeriod);
        ledger.seed(
            &program,
            "2025-04-01",
            CapUsage {
                spend: dec!(1490),
                reward: dec!(74.50),
            },
        );

        let reward = ledger
            .evaluate(&program, &grocery("2025-05-05", dec!(50)))
            .expect("straddle");
        assert_eq!(reward, dec!(0.90));

        ledger.reset();
        assert!(ledger.is_empty());
    }

    #[test]
    fn undated_transactions_share_lifetime_bucket() {
        let program = discover_like();
        let mut ledger = CapLedger::new(CapResetPolicy::CalendarPeriod);
        ledger
            .evaluate(&program, &grocery("unknown", dec!(1500)))
            .expect("fill");

        let reward = ledger
            .evaluate(&program, &grocery("", dec!(100)))
            .expect("still capped");
        assert_eq!(reward, dec!(1.00));
    }

    #[test]
    fn parses_policy_labels() {
        assert_eq!(
            CapResetPolicy::parse("Lifetime"),
            Some(CapResetPolicy::Lifetime)
        );
        assert_eq!(
            CapResetPolicy::parse("calendar"),
            Some(CapResetPolicy::CalendarPeriod)
        );
        assert_eq!(CapResetPolicy::parse("weekly"), None);
    }
}
