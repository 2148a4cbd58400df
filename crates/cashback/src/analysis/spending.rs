use super::round_money;
use super::views::{AccountTallyView, SpendingSummaryView, TallyView};
use crate::transactions::{AccountDirectory, Transaction};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::warn;

pub const UNKNOWN_ACCOUNT: &str = "Unknown Account";
pub const UNKNOWN_INSTITUTION: &str = "Unknown Institution";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub count: usize,
    pub amount: Decimal,
}

impl Tally {
    fn plus(self, amount: Decimal) -> Option<Self> {
        Some(Self {
            count: self.count + 1,
            amount: self.amount.checked_add(amount)?,
        })
    }

    fn to_view(self) -> TallyView {
        TallyView {
            count: self.count,
            amount: round_money(self.amount),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AccountTally {
    name: String,
    institution: String,
    tally: Tally,
}

/// Cash-flow totals independent of any reward program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpendingSummary {
    pub total_transactions: usize,
    /// Sum of magnitudes.
    pub total_amount: Decimal,
    pub income: Decimal,
    pub expenses: Decimal,
    pub categories: BTreeMap<String, Tally>,
    pub institutions: BTreeMap<String, Tally>,
    /// Rows left out because they would overflow a running total.
    pub faulted_transactions: usize,
    accounts: BTreeMap<String, AccountTally>,
}

impl SpendingSummary {
    pub fn from_transactions<D>(transactions: &[Transaction], directory: &D) -> Self
    where
        D: AccountDirectory + ?Sized,
    {
        let mut summary = Self {
            total_transactions: transactions.len(),
            ..Self::default()
        };

        for transaction in transactions {
            if summary.try_record(transaction, directory).is_none() {
                warn!(
                    transaction_id = %transaction.id,
                    "leaving transaction out of spending totals after overflow"
                );
                summary.faulted_transactions += 1;
            }
        }

        summary
    }

    /// Adds one transaction to every total, or changes nothing and returns
    /// `None` if any total would overflow.
    fn try_record<D>(&mut self, transaction: &Transaction, directory: &D) -> Option<()>
    where
        D: AccountDirectory + ?Sized,
    {
        let magnitude = transaction.spend();
        let tally = |map: &BTreeMap<String, Tally>, key: &str| {
            map.get(key).copied().unwrap_or_default().plus(magnitude)
        };

        let info = directory.lookup(&transaction.account_id);
        let institution = info
            .map(|info| info.institution_name.as_str())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(UNKNOWN_INSTITUTION);

        let total_amount = self.total_amount.checked_add(magnitude)?;
        let income = if transaction.is_credit() {
            self.income.checked_add(magnitude)?
        } else {
            self.income
        };
        let expenses = if transaction.is_debit() {
            self.expenses.checked_add(magnitude)?
        } else {
            self.expenses
        };
        let category = tally(&self.categories, &transaction.category)?;
        let by_institution = tally(&self.institutions, institution)?;
        let account = match self.accounts.get(&transaction.account_id) {
            Some(entry) => AccountTally {
                tally: entry.tally.plus(magnitude)?,
                ..entry.clone()
            },
            None => AccountTally {
                name: info
                    .map(|info| info.account_name.clone())
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or_else(|| UNKNOWN_ACCOUNT.to_string()),
                institution: institution.to_string(),
                tally: Tally::default().plus(magnitude)?,
            },
        };

        self.total_amount = total_amount;
        self.income = income;
        self.expenses = expenses;
        self.categories.insert(transaction.category.clone(), category);
        self.institutions.insert(institution.to_string(), by_institution);
        self.accounts.insert(transaction.account_id.clone(), account);
        Some(())
    }

    pub fn account(&self, account_id: &str) -> Option<(&str, Tally)> {
        self.accounts
            .get(account_id)
            .map(|entry| (entry.name.as_str(), entry.tally))
    }

    pub fn net(&self) -> Decimal {
        self.income - self.expenses
    }

    pub fn view(&self) -> SpendingSummaryView {
        let tallies = |map: &BTreeMap<String, Tally>| {
            map.iter()
                .map(|(key, tally)| (key.clone(), tally.to_view()))
                .collect()
        };

        SpendingSummaryView {
            total_transactions: self.total_transactions,
            faulted_transactions: self.faulted_transactions,
            total_amount: round_money(self.total_amount),
            income: round_money(self.income),
            expenses: round_money(self.expenses),
            categories: tallies(&self.categories),
            accounts: self
                .accounts
                .iter()
                .map(|(id, entry)| {
                    (
                        id.clone(),
                        AccountTallyView {
                            name: entry.name.clone(),
                            institution: entry.institution.clone(),
                            count: entry.tally.count,
                            amount: round_money(entry.tally.amount),
                        },
                    )
                })
                .collect(),
            institutions: tallies(&self.institutions),
        }
    }
}
