use crate::infra::{load_feed, sample_feed, FeedFormat};
use crate::reports::{print_json, render_optimal, render_spending, render_summary};
use cashback::analysis::{
    views::{OptimalCashbackView, RewardSummaryView, SpendingSummaryView},
    AnalysisConfig, CashbackAggregator, OptimalCashbackAnalyzer, SpendingSummary,
};
use cashback::error::AppError;
use cashback::ingest::AmountSign;
use cashback::rewards::RewardProgramRegistry;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Feed to run against. Defaults to the bundled sample feed.
    #[arg(long)]
    pub(crate) feed: Option<PathBuf>,
    /// Feed file format when --feed is given
    #[arg(long, value_enum)]
    pub(crate) format: Option<FeedFormat>,
    /// CSV amounts already carry a negative sign for spend
    #[arg(long)]
    pub(crate) signed_amounts: bool,
    /// Emit all reports as one JSON document
    #[arg(long)]
    pub(crate) json: bool,
}

impl DemoArgs {
    pub(crate) fn amount_sign(&self) -> AmountSign {
        if self.signed_amounts {
            AmountSign::Signed
        } else {
            AmountSign::AggregatorPositiveSpend
        }
    }
}

#[derive(Debug, Serialize)]
struct DemoReport {
    summary: RewardSummaryView,
    optimal: OptimalCashbackView,
    spending: SpendingSummaryView,
}

pub(crate) fn run_demo(
    args: DemoArgs,
    registry: &RewardProgramRegistry,
    analysis: AnalysisConfig,
) -> Result<(), AppError> {
    let sign = args.amount_sign();
    let DemoArgs {
        feed, format, json, ..
    } = args;

    let feed = match feed {
        Some(path) => load_feed(&path, format.unwrap_or(FeedFormat::Json), sign)?,
        None => sample_feed()?,
    };

    let summary = CashbackAggregator::new(registry, analysis.clone())
        .aggregate(&feed.transactions, &feed);
    let report = OptimalCashbackAnalyzer::new(registry, analysis)
        .analyze(&feed.transactions, &feed);
    let spending = SpendingSummary::from_transactions(&feed.transactions, &feed);

    if json {
        return print_json(&DemoReport {
            summary: summary.view(),
            optimal: report.view(),
            spending: spending.view(),
        });
    }

    println!("Cash-back optimizer demo");
    println!(
        "- {} transactions loaded, {} malformed rows skipped",
        feed.transactions.len(),
        feed.skipped
    );
    println!();
    render_summary(&summary, false)?;
    println!();
    render_optimal(&report, false)?;
    println!();
    render_spending(&spending, false)
}

