use super::config::AnalysisConfig;
use super::views::{BreakdownView, RewardSummaryView};
use super::{checked_entry, chronological, round_map, round_money};
use crate::rewards::{CapLedger, InstitutionMatcher, RewardProgramRegistry};
use crate::transactions::{AccountDirectory, Transaction};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Count and sums for one slice of rewarded spend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Breakdown {
    pub count: usize,
    pub spend: Decimal,
    pub cashback: Decimal,
}

impl Breakdown {
    fn plus(self, spend: Decimal, cashback: Decimal) -> Option<Self> {
        Some(Self {
            count: self.count + 1,
            spend: self.spend.checked_add(spend)?,
            cashback: self.cashback.checked_add(cashback)?,
        })
    }

    pub fn to_view(&self) -> BreakdownView {
        BreakdownView {
            count: self.count,
            spend: round_money(self.spend),
            cashback: round_money(self.cashback),
        }
    }
}

/// Rewards actually earned across a transaction set. Values are unrounded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewardSummary {
    pub total_transactions: usize,
    pub matched_transactions: usize,
    pub unmatched_transactions: usize,
    pub ineligible_transactions: usize,
    pub faulted_transactions: usize,
    pub total_cashback: Decimal,
    pub total_spend: Decimal,
    pub cashback_by_card: BTreeMap<String, Decimal>,
    pub spending_by_card: BTreeMap<String, Decimal>,
    pub by_category: BTreeMap<String, Breakdown>,
    pub by_account: BTreeMap<String, Breakdown>,
    pub by_institution: BTreeMap<String, Breakdown>,
}

impl RewardSummary {
    /// Adds one rewarded transaction to every total, or leaves the summary
    /// untouched and returns `None` if any total would overflow.
    fn try_record(
        &mut self,
        card: &str,
        transaction: &Transaction,
        institution: &str,
        spend: Decimal,
        cashback: Decimal,
    ) -> Option<()> {
        let breakdown = |map: &BTreeMap<String, Breakdown>, key: &str| {
            map.get(key).copied().unwrap_or_default().plus(spend, cashback)
        };

        let total_cashback = self.total_cashback.checked_add(cashback)?;
        let total_spend = self.total_spend.checked_add(spend)?;
        let card_cashback = checked_entry(&self.cashback_by_card, card, cashback)?;
        let card_spend = checked_entry(&self.spending_by_card, card, spend)?;
        let category = breakdown(&self.by_category, &transaction.category)?;
        let account = breakdown(&self.by_account, &transaction.account_id)?;
        let by_institution = breakdown(&self.by_institution, institution)?;

        self.matched_transactions += 1;
        self.total_cashback = total_cashback;
        self.total_spend = total_spend;
        self.cashback_by_card.insert(card.to_string(), card_cashback);
        self.spending_by_card.insert(card.to_string(), card_spend);
        self.by_category.insert(transaction.category.clone(), category);
        self.by_account.insert(transaction.account_id.clone(), account);
        self.by_institution.insert(institution.to_string(), by_institution);
        Some(())
    }

    /// Presentation copy with money rounded to cents.
    pub fn view(&self) -> RewardSummaryView {
        let breakdowns = |map: &BTreeMap<String, Breakdown>| {
            map.iter()
                .map(|(key, breakdown)| (key.clone(), breakdown.to_view()))
                .collect()
        };

        RewardSummaryView {
            total_cashback: round_money(self.total_cashback),
            cashback_by_card: round_map(&self.cashback_by_card),
            spending_by_card: round_map(&self.spending_by_card),
            total_transactions: self.total_transactions,
            matched_transactions: self.matched_transactions,
            unmatched_transactions: self.unmatched_transactions,
            total_spend: round_money(self.total_spend),
            by_category: breakdowns(&self.by_category),
            by_account: breakdowns(&self.by_account),
            by_institution: breakdowns(&self.by_institution),
        }
    }
}

/// Totals the rewards each transaction earned on the card it was charged to.
pub struct CashbackAggregator<'a> {
    registry: &'a RewardProgramRegistry,
    config: AnalysisConfig,
}

impl<'a> CashbackAggregator<'a> {
    pub fn new(registry: &'a RewardProgramRegistry, config: AnalysisConfig) -> Self {
        Self { registry, config }
    }

    /// Each call prices against its own fresh cap ledger, so repeated calls
    /// over the same input return the same summary. Caps are consumed in
    /// date order whatever order `transactions` arrive in.
    pub fn aggregate<D>(&self, transactions: &[Transaction], directory: &D) -> RewardSummary
    where
        D: AccountDirectory + ?Sized,
    {
        let matcher = InstitutionMatcher::new(self.registry);
        let mut ledger = CapLedger::new(self.config.cap_reset);
        let mut summary = RewardSummary {
            total_transactions: transactions.len(),
            ..RewardSummary::default()
        };

        for transaction in chronological(transactions) {
            if !self.config.eligibility.admits(transaction) {
                summary.ineligible_transactions += 1;
                continue;
            }

            let Some((program, account)) = matcher.match_account(directory, &transaction.account_id)
            else {
                summary.unmatched_transactions += 1;
                continue;
            };

            let quote = match ledger.quote(program, transaction) {
                Ok(quote) => quote,
                Err(err) => {
                    warn!(
                        transaction_id = %transaction.id,
                        program = %program.name,
                        error = %err,
                        "skipping transaction after reward evaluation failed"
                    );
                    summary.faulted_transactions += 1;
                    continue;
                }
            };
            let spend = transaction.spend();
            let cashback = quote.reward;

            if summary
                .try_record(
                    &program.name,
                    transaction,
                    &account.institution_name,
                    spend,
                    cashback,
                )
                .is_none()
            {
                warn!(
                    transaction_id = %transaction.id,
                    program = %program.name,
                    "skipping transaction whose amounts overflow the running totals"
                );
                summary.faulted_transactions += 1;
                continue;
            }
            ledger.commit(program, transaction, &quote);

            debug!(
                transaction_id = %transaction.id,
                program = %program.name,
                %spend,
                %cashback,
                "rewarded transaction"
            );
        }

        info!(
            total = summary.total_transactions,
            matched = summary.matched_transactions,
            unmatched = summary.unmatched_transactions,
            total_cashback = %summary.total_cashback.round_dp(2),
            "cashback aggregation complete"
        );

        summary
    }
}
