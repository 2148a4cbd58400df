use cashback::analysis::{AnalysisConfig, CashbackAggregator, SpendingSummary};
use cashback::ingest::{NormalizedFeed, PlaidFeed};
use cashback::rewards::{catalog, RewardProgramRegistry};
use rust_decimal_macros::dec;

fn sample_feed() -> NormalizedFeed {
    let data = include_bytes!("../data/sample_feed.json");
    PlaidFeed::from_json_reader(&data[..]).expect("sample feed parses")
}

#[test]
fn sample_feed_loads_newest_first() {
    let feed = sample_feed();

    assert_eq!(feed.skipped, 1);
    assert_eq!(feed.transactions.len(), 13);
    assert_eq!(feed.accounts.len(), 4);
    assert_eq!(feed.transactions.first().map(|t| t.id.as_str()), Some("t-001"));
    assert_eq!(feed.transactions.last().map(|t| t.id.as_str()), Some("t-013"));
    assert!(feed
        .transactions
        .windows(2)
        .all(|pair| pair[0].date >= pair[1].date));
}

#[test]
fn actual_rewards_follow_the_cards_used() {
    let feed = sample_feed();
    let registry = RewardProgramRegistry::standard();

    let summary = CashbackAggregator::new(&registry, AnalysisConfig::default())
        .aggregate(&feed.transactions, &feed);

    assert_eq!(summary.total_transactions, 13);
    assert_eq!(summary.matched_transactions, 10);
    assert_eq!(summary.unmatched_transactions, 1);
    assert_eq!(summary.ineligible_transactions, 2);
    assert_eq!(summary.total_cashback, dec!(57.2953));
    assert_eq!(
        summary.cashback_by_card.get(catalog::CHASE_SAPPHIRE_PREFERRED),
        Some(&dec!(12.3655))
    );
    assert_eq!(
        summary.cashback_by_card.get(catalog::APPLE_CARD),
        Some(&dec!(34.02))
    );
    assert_eq!(
        summary.cashback_by_card.get(catalog::CITI_DOUBLE_CASH),
        Some(&dec!(10.9098))
    );

    let view = summary.view();
    assert_eq!(view.total_cashback, dec!(57.30));
    assert_eq!(
        view.cashback_by_card.get(catalog::CHASE_SAPPHIRE_PREFERRED),
        Some(&dec!(12.37))
    );
}

#[test]
fn summary_serializes_money_as_numbers() {
    let feed = sample_feed();
    let registry = RewardProgramRegistry::standard();
    let summary = CashbackAggregator::new(&registry, AnalysisConfig::default())
        .aggregate(&feed.transactions, &feed);

    let json = serde_json::to_value(summary.view()).expect("view serializes");
    assert_eq!(json["total_cashback"], serde_json::json!(57.3));
    assert_eq!(json["matched_transactions"], serde_json::json!(10));
    assert!(json["by_institution"]["Citibank"]["cashback"].is_number());
}

#[test]
fn spending_summary_splits_cash_flow() {
    let feed = sample_feed();
    let summary = SpendingSummary::from_transactions(&feed.transactions, &feed);

    assert_eq!(summary.total_transactions, 13);
    assert_eq!(summary.income, dec!(2535));
    assert_eq!(summary.expenses, dec!(2389.54));
    let (name, tally) = summary.account("acc-checking").expect("checking tallied");
    assert_eq!(name, "Everyday Checking");
    assert_eq!(tally.count, 2);
}
