use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub const OTHER_CATEGORY: &str = "Other";
pub const OTHER_CHANNEL: &str = "other";
pub const UNKNOWN_MERCHANT: &str = "Unknown Merchant";

/// Normalized transaction as handed to the reward engine.
///
/// `amount` is signed: positive is an inflow (deposit, refund), negative is
/// spend. The ingest layer guarantees `category` and `payment_channel` are
/// populated before a value of this type exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    pub date: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_name: Option<String>,
    pub amount: Decimal,
    pub category: String,
    pub payment_channel: String,
}

impl Transaction {
    /// Magnitude of the transaction; all reward math runs on this value.
    pub fn spend(&self) -> Decimal {
        self.amount.abs()
    }

    pub fn is_debit(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    pub fn is_credit(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// Merchant text used for rule matching, empty when the feed had none.
    pub fn merchant_text(&self) -> &str {
        self.merchant_name.as_deref().unwrap_or("")
    }

    /// Label shown in reports: the aggregator description, then the merchant.
    pub fn display_merchant(&self) -> &str {
        if !self.name.trim().is_empty() {
            &self.name
        } else if !self.merchant_text().trim().is_empty() {
            self.merchant_text()
        } else {
            UNKNOWN_MERCHANT
        }
    }
}

/// Which transactions are allowed to earn a reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardEligibility {
    /// Only outflows (`amount < 0`) earn; deposits and refunds earn nothing.
    #[default]
    DebitsOnly,
    /// Every non-zero transaction earns on its absolute value.
    AbsoluteAmount,
}

impl RewardEligibility {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debits" | "debits_only" | "spend" => Some(Self::DebitsOnly),
            "absolute" | "absolute_amount" | "all" => Some(Self::AbsoluteAmount),
            _ => None,
        }
    }

    pub fn admits(self, transaction: &Transaction) -> bool {
        match self {
            Self::DebitsOnly => transaction.is_debit(),
            Self::AbsoluteAmount => !transaction.amount.is_zero(),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::DebitsOnly => "debits only",
            Self::AbsoluteAmount => "absolute amount",
        }
    }
}

/// Display metadata for a linked account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub account_name: String,
    pub institution_name: String,
}

impl AccountInfo {
    pub fn new(account_name: impl Into<String>, institution_name: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into(),
            institution_name: institution_name.into(),
        }
    }
}

/// Lookup from account identifier to account metadata, supplied by whatever
/// owns the linked-account records.
pub trait AccountDirectory {
    fn lookup(&self, account_id: &str) -> Option<&AccountInfo>;
}

impl AccountDirectory for HashMap<String, AccountInfo> {
    fn lookup(&self, account_id: &str) -> Option<&AccountInfo> {
        self.get(account_id)
    }
}

impl AccountDirectory for BTreeMap<String, AccountInfo> {
    fn lookup(&self, account_id: &str) -> Option<&AccountInfo> {
        self.get(account_id)
    }
}
