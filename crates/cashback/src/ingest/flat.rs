use super::normalizer::{
    empty_string_as_none, institution_or_default, payment_channel, primary_category,
    sort_newest_first,
};
use super::{IngestError, NormalizedFeed};
use crate::transactions::{AccountInfo, Transaction};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

/// Sign convention of the `amount` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmountSign {
    /// Spend is positive, as aggregator exports report it.
    #[default]
    AggregatorPositiveSpend,
    /// Spend is already negative.
    Signed,
}

impl AmountSign {
    fn apply(self, amount: Decimal) -> Decimal {
        match self {
            Self::AggregatorPositiveSpend => -amount,
            Self::Signed => amount,
        }
    }
}

/// Flattened CSV export with one row per transaction and the account's
/// display names repeated on every row.
pub struct CsvFeed;

#[derive(Debug, Deserialize)]
struct FlatRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    transaction_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    account_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    amount: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    merchant_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    category: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    payment_channel: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    account_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    institution_name: Option<String>,
}

impl FlatRow {
    fn missing_field(&self) -> Option<&'static str> {
        [
            ("transaction_id", self.transaction_id.is_none()),
            ("account_id", self.account_id.is_none()),
            ("date", self.date.is_none()),
            ("name", self.name.is_none()),
            ("amount", self.amount.is_none()),
        ]
        .into_iter()
        .find_map(|(field, missing)| missing.then_some(field))
    }
}

impl CsvFeed {
    pub fn from_path<P: AsRef<Path>>(path: P, sign: AmountSign) -> Result<NormalizedFeed, IngestError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, sign)
    }

    pub fn from_reader<R: Read>(reader: R, sign: AmountSign) -> Result<NormalizedFeed, IngestError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let mut feed = NormalizedFeed::default();

        for (index, record) in csv_reader.deserialize::<FlatRow>().enumerate() {
            let row = match record {
                Ok(row) => row,
                Err(err) if err.is_io_error() => return Err(err.into()),
                Err(err) => {
                    warn!(row = index + 1, error = %err, "skipping unreadable csv row");
                    feed.skipped += 1;
                    continue;
                }
            };

            if let Some(field) = row.missing_field() {
                warn!(row = index + 1, field, "skipping csv row missing a required field");
                feed.skipped += 1;
                continue;
            }

            match normalize_row(row, sign) {
                Some((transaction, account)) => {
                    feed.accounts
                        .entry(transaction.account_id.clone())
                        .or_insert(account);
                    feed.transactions.push(transaction);
                }
                None => {
                    warn!(row = index + 1, "skipping csv row with unparseable amount");
                    feed.skipped += 1;
                }
            }
        }

        sort_newest_first(&mut feed.transactions);
        info!(
            transactions = feed.transactions.len(),
            accounts = feed.accounts.len(),
            skipped = feed.skipped,
            "loaded csv feed"
        );

        Ok(feed)
    }
}

fn normalize_row(row: FlatRow, sign: AmountSign) -> Option<(Transaction, AccountInfo)> {
    let amount = Decimal::from_str(row.amount.as_deref()?).ok()?;
    let account = AccountInfo::new(
        row.account_name.unwrap_or_default(),
        institution_or_default(row.institution_name),
    );
    let category = row.category.map(Value::String).unwrap_or(Value::Null);

    let transaction = Transaction {
        id: row.transaction_id?,
        account_id: row.account_id?,
        date: row.date?,
        name: row.name?,
        merchant_name: row.merchant_name,
        amount: sign.apply(amount),
        category: primary_category(&category),
        payment_channel: payment_channel(row.payment_channel.as_deref()),
    };

    Some((transaction, account))
}
