//! Adapters from aggregator exports to normalized transactions.
//!
//! Rows are validated one at a time. A malformed row is logged, counted in
//! [`NormalizedFeed::skipped`] and dropped; it never aborts the batch.

mod flat;
mod normalizer;
mod plaid;

pub use flat::{AmountSign, CsvFeed};
pub use normalizer::{primary_category, DEFAULT_INSTITUTION};
pub use plaid::PlaidFeed;

use crate::transactions::{AccountDirectory, AccountInfo, Transaction};
use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read transaction feed: {0}")]
    Io(#[from] std::io::Error),
    #[error("transaction feed is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("transaction feed is not valid CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Transactions newest first, plus the accounts they reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedFeed {
    pub transactions: Vec<Transaction>,
    pub accounts: BTreeMap<String, AccountInfo>,
    pub skipped: usize,
}

impl NormalizedFeed {
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

impl AccountDirectory for NormalizedFeed {
    fn lookup(&self, account_id: &str) -> Option<&AccountInfo> {
        self.accounts.get(account_id)
    }
}
