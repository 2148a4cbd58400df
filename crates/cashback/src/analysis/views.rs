use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownView {
    pub count: usize,
    pub spend: Decimal,
    pub cashback: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewardSummaryView {
    pub total_cashback: Decimal,
    pub cashback_by_card: BTreeMap<String, Decimal>,
    pub spending_by_card: BTreeMap<String, Decimal>,
    pub total_transactions: usize,
    pub matched_transactions: usize,
    pub unmatched_transactions: usize,
    pub total_spend: Decimal,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub by_category: BTreeMap<String, BreakdownView>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub by_account: BTreeMap<String, BreakdownView>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub by_institution: BTreeMap<String, BreakdownView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImprovementView {
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

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimalCashbackView {
    pub actual_total_cashback: Decimal,
    pub optimal_total_cashback: Decimal,
    pub potential_increase: Decimal,
    /// Percent, one decimal place.
    pub improvement_percentage: Decimal,
    pub optimal_cashback_by_card: BTreeMap<String, Decimal>,
    pub optimal_spending_by_card: BTreeMap<String, Decimal>,
    pub top_improvement_opportunities: Vec<ImprovementView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TallyView {
    pub count: usize,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountTallyView {
    pub name: String,
    pub institution: String,
    pub count: usize,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpendingSummaryView {
    pub total_transactions: usize,
    pub faulted_transactions: usize,
    pub total_amount: Decimal,
    pub income: Decimal,
    pub expenses: Decimal,
    pub categories: BTreeMap<String, TallyView>,
    pub accounts: BTreeMap<String, AccountTallyView>,
    pub institutions: BTreeMap<String, TallyView>,
}
