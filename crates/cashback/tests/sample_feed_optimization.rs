use cashback::analysis::{AnalysisConfig, OptimalCashbackAnalyzer, UNKNOWN_CARD};
use cashback::ingest::{NormalizedFeed, PlaidFeed};
use cashback::rewards::{catalog, CapResetPolicy, RewardProgramRegistry};
use rust_decimal_macros::dec;

fn sample_feed() -> NormalizedFeed {
    let data = include_bytes!("../data/sample_feed.json");
    PlaidFeed::from_json_reader(&data[..]).expect("sample feed parses")
}

#[test]
fn best_card_routing_beats_actual_routing() {
    let feed = sample_feed();
    let registry = RewardProgramRegistry::standard();

    let report = OptimalCashbackAnalyzer::new(&registry, AnalysisConfig::default())
        .analyze(&feed.transactions, &feed);

    assert!(!report.baseline_kept);
    assert_eq!(report.analyzed_transactions, 11);
    assert_eq!(report.actual_total_cashback, dec!(57.2953));
    assert_eq!(report.optimal_total_cashback, dec!(72.8297));
    assert_eq!(report.potential_increase(), dec!(15.5344));
    assert_eq!(report.improvement_percentage(), dec!(27.1));

    assert_eq!(
        report.optimal_cashback_by_card.get(catalog::DISCOVER_IT_STUDENT),
        Some(&dec!(13.715))
    );
    assert_eq!(
        report.optimal_cashback_by_card.get(catalog::BOFA_CUSTOMIZED_CASH),
        Some(&dec!(10.95))
    );
    assert_eq!(
        report.optimal_cashback_by_card.get(catalog::APPLE_CARD),
        Some(&dec!(33.57))
    );
}

#[test]
fn opportunities_rank_largest_gain_first() {
    let feed = sample_feed();
    let registry = RewardProgramRegistry::standard();

    let report = OptimalCashbackAnalyzer::new(&registry, AnalysisConfig::default())
        .analyze(&feed.transactions, &feed);

    let ranked: Vec<&str> = report
        .top_improvement_opportunities
        .iter()
        .map(|entry| entry.transaction_id.as_str())
        .collect();
    assert_eq!(ranked, vec!["t-003", "t-010", "t-013", "t-005", "t-007", "t-001"]);

    let groceries = &report.top_improvement_opportunities[0];
    assert_eq!(groceries.merchant, "Whole Foods Market");
    assert_eq!(groceries.actual_card, catalog::CITI_DOUBLE_CASH);
    assert_eq!(groceries.optimal_card, catalog::DISCOVER_IT_STUDENT);
    assert_eq!(groceries.improvement, dec!(6.30));

    let hardware = &report.top_improvement_opportunities[3];
    assert_eq!(hardware.actual_card, UNKNOWN_CARD);
    assert_eq!(hardware.optimal_card, catalog::WELLS_FARGO_ACTIVE_CASH);
}

#[test]
fn view_rounds_and_respects_top_count() {
    let feed = sample_feed();
    let registry = RewardProgramRegistry::standard();
    let config = AnalysisConfig {
        top_opportunities: 2,
        improvement_threshold: dec!(1),
        cap_reset: CapResetPolicy::Lifetime,
        ..AnalysisConfig::default()
    };

    let view = OptimalCashbackAnalyzer::new(&registry, config)
        .analyze(&feed.transactions, &feed)
        .view();

    assert_eq!(view.actual_total_cashback, dec!(57.30));
    assert_eq!(view.optimal_total_cashback, dec!(72.83));
    assert_eq!(view.potential_increase, dec!(15.53));
    assert_eq!(view.top_improvement_opportunities.len(), 2);
    assert_eq!(view.top_improvement_opportunities[1].improvement, dec!(3.20));
}

#[test]
fn analysis_is_repeatable() {
    let feed = sample_feed();
    let registry = RewardProgramRegistry::standard();
    let analyzer = OptimalCashbackAnalyzer::new(&registry, AnalysisConfig::default());

    let first = analyzer.analyze(&feed.transactions, &feed);
    let second = analyzer.analyze(&feed.transactions, &feed);
    assert_eq!(first, second);
    assert!(first.optimal_total_cashback >= first.actual_total_cashback);
}
