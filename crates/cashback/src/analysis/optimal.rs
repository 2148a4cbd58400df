use super::config::AnalysisConfig;
use super::views::{ImprovementView, OptimalCashbackView};
use super::{checked_entry, chronological, round_map, round_money};
use crate::rewards::{CapLedger, InstitutionMatcher, Quote, RewardProgram, RewardProgramRegistry};
use crate::transactions::{AccountDirectory, Transaction};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

pub const UNKNOWN_CARD: &str = "Unknown Card";
pub const NO_CARD: &str = "No Card";

/// A transaction that would have earned noticeably more on another card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImprovementOpportunity {
    pub transaction_id: String,
    pub date: String,
    pub merchant: String,
    pub amount: Decimal,
    pub actual_card: String,
    pub actual_cashback: Decimal,
    pub optimal_card: String,
    pub optimal_cashback: Decimal,
    pub improvement: Decimal,
}

impl ImprovementOpportunity {
    pub fn to_view(&self) -> ImprovementView {
        ImprovementView {
            transaction_id: self.transaction_id.clone(),
            date: self.date.clone(),
            merchant: self.merchant.clone(),
            amount: round_money(self.amount),
            actual_card: self.actual_card.clone(),
            actual_cashback: round_money(self.actual_cashback),
            optimal_card: self.optimal_card.clone(),
            optimal_cashback: round_money(self.optimal_cashback),
            improvement: round_money(self.improvement),
        }
    }
}

/// Actual against best-achievable rewards for one transaction set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptimalCashbackReport {
    pub actual_total_cashback: Decimal,
    pub optimal_total_cashback: Decimal,
    pub optimal_cashback_by_card: BTreeMap<String, Decimal>,
    pub optimal_spending_by_card: BTreeMap<String, Decimal>,
    /// Largest gains first, already cut to the configured count.
    pub top_improvement_opportunities: Vec<ImprovementOpportunity>,
    pub analyzed_transactions: usize,
    /// Program quotes that failed checked arithmetic.
    pub faulted_quotes: usize,
    /// Transactions skipped because they would overflow a running total.
    pub faulted_transactions: usize,
    /// Set when routing every transaction to its best card still earned less
    /// than the cards actually used, so the actual routing is reported.
    pub baseline_kept: bool,
}

impl OptimalCashbackReport {
    pub fn potential_increase(&self) -> Decimal {
        self.optimal_total_cashback - self.actual_total_cashback
    }

    /// Percent gain over actual, one decimal place. Zero when nothing was earned.
    pub fn improvement_percentage(&self) -> Decimal {
        if self.actual_total_cashback <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.optimal_total_cashback
            .checked_div(self.actual_total_cashback)
            .and_then(|ratio| (ratio - Decimal::ONE).checked_mul(dec!(100)))
            .map(|pct| pct.round_dp(1))
            .unwrap_or(Decimal::ZERO)
    }

    pub fn view(&self) -> OptimalCashbackView {
        OptimalCashbackView {
            actual_total_cashback: round_money(self.actual_total_cashback),
            optimal_total_cashback: round_money(self.optimal_total_cashback),
            potential_increase: round_money(self.potential_increase()),
            improvement_percentage: self.improvement_percentage(),
            optimal_cashback_by_card: round_map(&self.optimal_cashback_by_card),
            optimal_spending_by_card: round_map(&self.optimal_spending_by_card),
            top_improvement_opportunities: self
                .top_improvement_opportunities
                .iter()
                .map(ImprovementOpportunity::to_view)
                .collect(),
        }
    }
}

/// Per-card spend and cashback for one routing of the transactions.
#[derive(Debug, Default)]
struct Routing {
    total: Decimal,
    cashback_by_card: BTreeMap<String, Decimal>,
    spending_by_card: BTreeMap<String, Decimal>,
}

/// Totals one routing would hold after recording a transaction.
struct Staged {
    total: Decimal,
    cashback: Decimal,
    spend: Decimal,
}

impl Routing {
    fn stage(&self, card: &str, spend: Decimal, cashback: Decimal) -> Option<Staged> {
        Some(Staged {
            total: self.total.checked_add(cashback)?,
            cashback: checked_entry(&self.cashback_by_card, card, cashback)?,
            spend: checked_entry(&self.spending_by_card, card, spend)?,
        })
    }

    fn apply(&mut self, card: &str, staged: Staged) {
        self.total = staged.total;
        self.cashback_by_card.insert(card.to_string(), staged.cashback);
        self.spending_by_card.insert(card.to_string(), staged.spend);
    }
}

/// Compares what each transaction earned with what the best registered card
/// would have paid, given the caps that routing would have consumed.
pub struct OptimalCashbackAnalyzer<'a> {
    registry: &'a RewardProgramRegistry,
    config: AnalysisConfig,
}

impl<'a> OptimalCashbackAnalyzer<'a> {
    pub fn new(registry: &'a RewardProgramRegistry, config: AnalysisConfig) -> Self {
        Self { registry, config }
    }

    pub fn analyze<D>(&self, transactions: &[Transaction], directory: &D) -> OptimalCashbackReport
    where
        D: AccountDirectory + ?Sized,
    {
        let matcher = InstitutionMatcher::new(self.registry);
        let mut actual_ledger = CapLedger::new(self.config.cap_reset);
        let mut optimal_ledger = CapLedger::new(self.config.cap_reset);
        let mut actual = Routing::default();
        let mut optimal = Routing::default();
        let mut opportunities = Vec::new();
        let mut report = OptimalCashbackReport::default();

        for transaction in chronological(transactions) {
            if !self.config.eligibility.admits(transaction) || transaction.spend().is_zero() {
                continue;
            }
            let spend = transaction.spend();

            let actual_program = matcher
                .match_account(directory, &transaction.account_id)
                .map(|(program, _)| program);
            let actual_quote = actual_program.and_then(|program| {
                match actual_ledger.quote(program, transaction) {
                    Ok(quote) => Some((program, quote)),
                    Err(err) => {
                        warn!(
                            transaction_id = %transaction.id,
                            program = %program.name,
                            error = %err,
                            "actual reward evaluation failed; counting zero"
                        );
                        report.faulted_quotes += 1;
                        None
                    }
                }
            });
            let actual_cashback = actual_quote
                .as_ref()
                .map_or(Decimal::ZERO, |(_, quote)| quote.reward);
            let actual_card = actual_program.map_or(UNKNOWN_CARD, |program| program.name.as_str());

            let best = self.best_quote(&optimal_ledger, transaction, &mut report.faulted_quotes);
            let (optimal_card, optimal_cashback) = best
                .as_ref()
                .map_or((NO_CARD, Decimal::ZERO), |(program, quote)| {
                    (program.name.as_str(), quote.reward)
                });

            let staged_actual = match actual_program {
                Some(_) => actual
                    .stage(actual_card, spend, actual_cashback)
                    .map(Some),
                None => Some(None),
            };
            let staged_optimal = optimal.stage(optimal_card, spend, optimal_cashback);
            let (Some(staged_actual), Some(staged_optimal)) = (staged_actual, staged_optimal)
            else {
                warn!(
                    transaction_id = %transaction.id,
                    "skipping transaction whose amounts overflow the running totals"
                );
                report.faulted_transactions += 1;
                continue;
            };

            report.analyzed_transactions += 1;
            if let Some(staged) = staged_actual {
                actual.apply(actual_card, staged);
            }
            optimal.apply(optimal_card, staged_optimal);
            if let Some((program, quote)) = &actual_quote {
                actual_ledger.commit(program, transaction, quote);
            }
            if let Some((program, quote)) = &best {
                optimal_ledger.commit(program, transaction, quote);
            }

            let improvement = optimal_cashback - actual_cashback;
            debug!(
                transaction_id = %transaction.id,
                actual_card,
                %actual_cashback,
                optimal_card,
                %optimal_cashback,
                "routed transaction"
            );
            if improvement > self.config.improvement_threshold {
                opportunities.push(ImprovementOpportunity {
                    transaction_id: transaction.id.clone(),
                    date: transaction.date.clone(),
                    merchant: transaction.display_merchant().to_string(),
                    amount: spend,
                    actual_card: actual_card.to_string(),
                    actual_cashback,
                    optimal_card: optimal_card.to_string(),
                    optimal_cashback,
                    improvement,
                });
            }
        }

        report.actual_total_cashback = actual.total;

        if optimal.total < actual.total {
            info!(
                actual = %actual.total.round_dp(2),
                best_card = %optimal.total.round_dp(2),
                "best-card routing earned less than actual routing; keeping actual cards"
            );
            report.baseline_kept = true;
            optimal = actual;
            opportunities.clear();
        }

        opportunities.sort_by(|left, right| right.improvement.cmp(&left.improvement));
        opportunities.truncate(self.config.top_opportunities);

        report.optimal_total_cashback = optimal.total;
        report.optimal_cashback_by_card = optimal.cashback_by_card;
        report.optimal_spending_by_card = optimal.spending_by_card;
        report.top_improvement_opportunities = opportunities;

        info!(
            analyzed = report.analyzed_transactions,
            actual = %report.actual_total_cashback.round_dp(2),
            optimal = %report.optimal_total_cashback.round_dp(2),
            opportunities = report.top_improvement_opportunities.len(),
            "optimal cashback analysis complete"
        );

        report
    }

    /// Highest quote across the registry. Ties keep the earlier program.
    fn best_quote(
        &self,
        ledger: &CapLedger,
        transaction: &Transaction,
        faults: &mut usize,
    ) -> Option<(&'a RewardProgram, Quote)> {
        let mut best: Option<(&'a RewardProgram, Quote)> = None;
        for program in self.registry {
            let quote = match ledger.quote(program, transaction) {
                Ok(quote) => quote,
                Err(err) => {
                    warn!(
                        transaction_id = %transaction.id,
                        program = %program.name,
                        error = %err,
                        "skipping program that failed to quote"
                    );
                    *faults += 1;
                    continue;
                }
            };
            let better = match &best {
                Some((_, current)) => quote.reward > current.reward,
                None => true,
            };
            if better {
                best = Some((program, quote));
            }
        }
        best
    }
}
