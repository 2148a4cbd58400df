use super::normalizer::{
    institution_or_default, payment_channel, primary_category, sort_newest_first,
};
use super::{IngestError, NormalizedFeed};
use crate::transactions::{AccountInfo, Transaction};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Aggregator JSON export: `{ "accounts": [...], "transactions": [...] }`.
///
/// Amounts in this format are positive for spend, so they are negated on the
/// way in.
pub struct PlaidFeed;

#[derive(Debug, Default, Deserialize)]
struct RawFeed {
    #[serde(default)]
    accounts: Vec<Value>,
    #[serde(default)]
    transactions: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawAccount {
    account_id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    official_name: Option<String>,
    #[serde(default)]
    institution_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTransaction {
    transaction_id: String,
    account_id: String,
    date: String,
    name: String,
    amount: Decimal,
    #[serde(default)]
    merchant_name: Option<String>,
    #[serde(default)]
    category: Value,
    #[serde(default)]
    payment_channel: Option<String>,
}

impl RawTransaction {
    fn normalize(self) -> Transaction {
        Transaction {
            id: self.transaction_id,
            account_id: self.account_id,
            date: self.date.trim().to_string(),
            name: self.name,
            merchant_name: self.merchant_name.filter(|name| !name.trim().is_empty()),
            amount: -self.amount,
            category: primary_category(&self.category),
            payment_channel: payment_channel(self.payment_channel.as_deref()),
        }
    }
}

impl PlaidFeed {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<NormalizedFeed, IngestError> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<NormalizedFeed, IngestError> {
        let raw: RawFeed = serde_json::from_reader(reader)?;
        let mut feed = NormalizedFeed::default();

        for value in raw.accounts {
            match serde_json::from_value::<RawAccount>(value) {
                Ok(account) => {
                    let name = account
                        .name
                        .or(account.official_name)
                        .unwrap_or_default();
                    feed.accounts.insert(
                        account.account_id,
                        AccountInfo::new(name, institution_or_default(account.institution_name)),
                    );
                }
                Err(err) => warn!(error = %err, "skipping malformed account"),
            }
        }

        for value in raw.transactions {
            let id = value
                .get("transaction_id")
                .and_then(Value::as_str)
                .unwrap_or("<missing>")
                .to_string();
            match serde_json::from_value::<RawTransaction>(value) {
                Ok(transaction) => feed.transactions.push(transaction.normalize()),
                Err(err) => {
                    warn!(transaction_id = %id, error = %err, "skipping malformed transaction");
                    feed.skipped += 1;
                }
            }
        }

        sort_newest_first(&mut feed.transactions);
        info!(
            transactions = feed.transactions.len(),
            accounts = feed.accounts.len(),
            skipped = feed.skipped,
            "loaded aggregator feed"
        );

        Ok(feed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::DEFAULT_INSTITUTION;
    use crate::transactions::{OTHER_CATEGORY, OTHER_CHANNEL};
    use rust_decimal_macros::dec;
    use std::io::Cursor;

    const FEED: &str = r#"{
        "accounts": [
            {"account_id": "acc-1", "name": "Sapphire Preferred", "institution_name": "Chase"},
            {"account_id": "acc-2", "name": "Everyday Checking"},
            {"name": "no id"}
        ],
        "transactions": [
            {"transaction_id": "t1", "account_id": "acc-1", "date": "2025-05-01",
             "name": "Uber Eats", "amount": 23.40, "category": ["Food and Drink", "Restaurants"],
             "payment_channel": "online", "merchant_name": "Uber Eats"},
            {"transaction_id": "t2", "account_id": "acc-2", "date": "2025-05-09",
             "name": "Payroll", "amount": -1500, "category": "['Transfer', 'Payroll']"},
            {"transaction_id": "t3", "account_id": "acc-1", "date": "2025-04-28",
             "amount": 12.00},
            {"transaction_id": "t4", "account_id": "acc-1", "date": "2025-05-03",
             "name": "Hardware", "amount": 8.25, "category": null}
        ]
    }"#;

    fn load() -> NormalizedFeed {
        PlaidFeed::from_json_reader(Cursor::new(FEED)).expect("feed parses")
    }

    #[test]
    fn negates_amounts_and_sorts_newest_first() {
        let feed = load();
        let ids: Vec<&str> = feed.transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t2", "t4", "t1"]);

        let uber = &feed.transactions[2];
        assert_eq!(uber.amount, dec!(-23.40));
        assert_eq!(uber.category, "Food and Drink");
        assert_eq!(uber.payment_channel, "online");
        assert_eq!(feed.transactions[0].amount, dec!(1500));
    }

    #[test]
    fn fills_defaults_for_optional_fields() {
        let feed = load();
        let hardware = &feed.transactions[1];
        assert_eq!(hardware.category, OTHER_CATEGORY);
        assert_eq!(hardware.payment_channel, OTHER_CHANNEL);
        assert_eq!(hardware.merchant_name, None);
        assert_eq!(feed.transactions[0].category, "Transfer");
    }

    #[test]
    fn skips_rows_missing_required_fields() {
        let feed = load();
        assert_eq!(feed.skipped, 1);
        assert_eq!(feed.transactions.len(), 3);
        assert_eq!(feed.accounts.len(), 2);
        assert_eq!(
            feed.accounts.get("acc-2").map(|info| info.institution_name.as_str()),
            Some(DEFAULT_INSTITUTION)
        );
    }

    #[test]
    fn rejects_documents_that_are_not_json() {
        let err = PlaidFeed::from_json_reader(Cursor::new("not json")).expect_err("invalid");
        assert!(matches!(err, IngestError::Json(_)));
    }
}
