use super::caps::{CapPeriod, CapUsage};
use crate::transactions::Transaction;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Predicate a transaction must satisfy for a tier rate to apply.
///
/// Every text comparison is a case-insensitive substring test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    MerchantContains(&'static [&'static str]),
    CategoryContains(&'static [&'static str]),
    Channel(&'static str),
    All(Vec<Condition>),
}

impl Condition {
    pub fn matches(&self, transaction: &Transaction) -> bool {
        match self {
            Condition::MerchantContains(merchants) => {
                contains_any(transaction.merchant_text(), merchants)
            }
            Condition::CategoryContains(keywords) => contains_any(&transaction.category, keywords),
            Condition::Channel(channel) => transaction
                .payment_channel
                .trim()
                .eq_ignore_ascii_case(channel),
            Condition::All(conditions) => conditions.iter().all(|c| c.matches(transaction)),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::MerchantContains(merchants) => {
                write!(f, "merchant contains {}", merchants.join(" / "))
            }
            Condition::CategoryContains(keywords) => {
                write!(f, "category contains {}", keywords.join(" / "))
            }
            Condition::Channel(channel) => write!(f, "paid via {channel}"),
            Condition::All(conditions) => {
                let parts: Vec<String> = conditions.iter().map(ToString::to_string).collect();
                write!(f, "{}", parts.join(" and "))
            }
        }
    }
}

pub(crate) fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    if haystack.is_empty() {
        return false;
    }
    let haystack = haystack.to_lowercase();
    needles
        .iter()
        .filter(|needle| !needle.is_empty())
        .any(|needle| haystack.contains(&needle.to_lowercase()))
}

/// Named entry of a program's rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tier {
    pub label: &'static str,
    pub condition: Condition,
    pub rate: Decimal,
}

impl Tier {
    pub fn new(label: &'static str, condition: Condition, rate: Decimal) -> Self {
        Self {
            label,
            condition,
            rate,
        }
    }
}

/// Closed set of reward policies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgramKind {
    /// One rate for every purchase.
    FlatRate { rate: Decimal },
    /// Ordered tiers, first match wins, otherwise `default_rate`.
    Tiered {
        tiers: Vec<Tier>,
        default_rate: Decimal,
    },
    /// Qualifying tiers share a per-period spend cap; spend past the cap earns
    /// `default_rate`. `reward_ceiling` additionally limits the tier reward
    /// earned within one period.
    Capped {
        tiers: Vec<Tier>,
        default_rate: Decimal,
        spend_cap: Decimal,
        reward_ceiling: Option<Decimal>,
        period: CapPeriod,
    },
}

pub const DEFAULT_TIER: &str = "other";
pub const ALL_PURCHASES_TIER: &str = "all_purchases";

/// Reward computed for one transaction, plus the cap usage it consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub reward: Decimal,
    pub tier: &'static str,
    /// Cap usage after this transaction; `None` for uncapped programs.
    pub usage: Option<CapUsage>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RewardError {
    #[error("reward arithmetic overflowed for {program} on transaction {transaction_id}")]
    Overflow {
        program: String,
        transaction_id: String,
    },
}

/// Immutable reward program definition.
///
/// Programs hold no running counters; capped programs read and return their
/// usage through [`RewardProgram::quote`], and the caller decides where that
/// usage lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewardProgram {
    pub name: String,
    pub kind: ProgramKind,
}

impl RewardProgram {
    pub fn new(name: impl Into<String>, kind: ProgramKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn cap_period(&self) -> Option<CapPeriod> {
        match self.kind {
            ProgramKind::Capped { period, .. } => Some(period),
            _ => None,
        }
    }

    /// Highest rate anywhere in the rule table.
    pub fn max_rate(&self) -> Decimal {
        match &self.kind {
            ProgramKind::FlatRate { rate } => *rate,
            ProgramKind::Tiered {
                tiers,
                default_rate,
            }
            | ProgramKind::Capped {
                tiers,
                default_rate,
                ..
            } => tiers
                .iter()
                .map(|tier| tier.rate)
                .fold(*default_rate, Decimal::max),
        }
    }

    /// Human-readable rule table, most specific rule first.
    pub fn rule_lines(&self) -> Vec<String> {
        match &self.kind {
            ProgramKind::FlatRate { rate } => vec![format!("{} on all purchases", percent(*rate))],
            ProgramKind::Tiered {
                tiers,
                default_rate,
            } => {
                let mut lines: Vec<String> = tiers
                    .iter()
                    .map(|tier| format!("{} {} ({})", percent(tier.rate), tier.label, tier.condition))
                    .collect();
                lines.push(format!("{} on everything else", percent(*default_rate)));
                lines
            }
            ProgramKind::Capped {
                tiers,
                default_rate,
                spend_cap,
                reward_ceiling,
                period,
            } => {
                let mut lines: Vec<String> = tiers
                    .iter()
                    .map(|tier| format!("{} {} ({})", percent(tier.rate), tier.label, tier.condition))
                    .collect();
                lines.push(format!(
                    "tier spend capped at ${} per {}",
                    spend_cap.normalize(),
                    period.label()
                ));
                if let Some(ceiling) = reward_ceiling {
                    lines.push(format!(
                        "tier reward capped at ${} per {}",
                        ceiling.normalize(),
                        period.label()
                    ));
                }
                lines.push(format!("{} on everything else", percent(*default_rate)));
                lines
            }
        }
    }

    /// Computes the reward for `transaction` given the usage already consumed
    /// in the transaction's cap period. Never negative.
    pub fn quote(&self, transaction: &Transaction, usage: CapUsage) -> Result<Quote, RewardError> {
        let amount = transaction.spend();
        let math = Math {
            program: &self.name,
            transaction,
        };

        match &self.kind {
            ProgramKind::FlatRate { rate } => Ok(Quote {
                reward: math.mul(amount, *rate)?,
                tier: ALL_PURCHASES_TIER,
                usage: None,
            }),
            ProgramKind::Tiered {
                tiers,
                default_rate,
            } => {
                let (tier, rate) = tiers
                    .iter()
                    .find(|tier| tier.condition.matches(transaction))
                    .map(|tier| (tier.label, tier.rate))
                    .unwrap_or((DEFAULT_TIER, *default_rate));
                Ok(Quote {
                    reward: math.mul(amount, rate)?,
                    tier,
                    usage: None,
                })
            }
            ProgramKind::Capped {
                tiers,
                default_rate,
                spend_cap,
                reward_ceiling,
                ..
            } => {
                let Some(tier) = tiers.iter().find(|tier| tier.condition.matches(transaction))
                else {
                    return Ok(Quote {
                        reward: math.mul(amount, *default_rate)?,
                        tier: DEFAULT_TIER,
                        usage: Some(usage),
                    });
                };

                let remaining_cap = (*spend_cap - usage.spend).max(Decimal::ZERO);
                let qualifying = amount.min(remaining_cap);
                let mut tier_reward = math.mul(qualifying, tier.rate)?;
                let mut covered = qualifying;

                if let Some(ceiling) = reward_ceiling {
                    let remaining_reward = (*ceiling - usage.reward).max(Decimal::ZERO);
                    if tier_reward > remaining_reward {
                        tier_reward = remaining_reward;
                        covered = if tier.rate.is_zero() {
                            Decimal::ZERO
                        } else {
                            math.div(remaining_reward, tier.rate)?.min(qualifying)
                        };
                    }
                }

                let excess = amount - covered;
                let reward = math.add(tier_reward, math.mul(excess, *default_rate)?)?;

                Ok(Quote {
                    reward,
                    tier: tier.label,
                    usage: Some(CapUsage {
                        spend: math.add(usage.spend, qualifying)?,
                        reward: math.add(usage.reward, tier_reward)?,
                    }),
                })
            }
        }
    }
}

struct Math<'a> {
    program: &'a str,
    transaction: &'a Transaction,
}

impl Math<'_> {
    fn overflow(&self) -> RewardError {
        RewardError::Overflow {
            program: self.program.to_string(),
            transaction_id: self.transaction.id.clone(),
        }
    }

    fn mul(&self, lhs: Decimal, rhs: Decimal) -> Result<Decimal, RewardError> {
        lhs.checked_mul(rhs).ok_or_else(|| self.overflow())
    }

    fn add(&self, lhs: Decimal, rhs: Decimal) -> Result<Decimal, RewardError> {
        lhs.checked_add(rhs).ok_or_else(|| self.overflow())
    }

    fn div(&self, lhs: Decimal, rhs: Decimal) -> Result<Decimal, RewardError> {
        lhs.checked_div(rhs).ok_or_else(|| self.overflow())
    }
}

fn percent(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}
