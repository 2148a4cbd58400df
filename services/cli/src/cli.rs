use crate::demo::{run_demo, DemoArgs};
use crate::infra::{load_feed, FeedFormat};
use crate::reports::{render_optimal, render_programs, render_spending, render_summary};
use cashback::analysis::{
    AnalysisConfig, CashbackAggregator, OptimalCashbackAnalyzer, SpendingSummary,
};
use cashback::config::AppConfig;
use cashback::error::AppError;
use cashback::ingest::AmountSign;
use cashback::rewards::RewardProgramRegistry;
use cashback::telemetry;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "cashback",
    about = "Measure earned cash back and find better card routing for a transaction feed",
    version
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rewards actually earned on the cards used
    Summary(FeedArgs),
    /// Compare actual rewards with best-card routing
    Optimize(OptimizeArgs),
    /// Income, expenses and spend by category, account and institution
    Spending(FeedArgs),
    /// List the registered reward programs and their rules
    Programs(ProgramsArgs),
    /// Run every report against a feed, the bundled sample by default (default command)
    Demo(DemoArgs),
}

#[derive(Args, Debug)]
pub(crate) struct FeedArgs {
    /// Transaction feed to analyze
    #[arg(long)]
    pub(crate) feed: PathBuf,
    /// Feed file format
    #[arg(long, value_enum, default_value_t = FeedFormat::Json)]
    pub(crate) format: FeedFormat,
    /// CSV amounts already carry a negative sign for spend
    #[arg(long)]
    pub(crate) signed_amounts: bool,
    /// Emit the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

impl FeedArgs {
    fn amount_sign(&self) -> AmountSign {
        if self.signed_amounts {
            AmountSign::Signed
        } else {
            AmountSign::AggregatorPositiveSpend
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ProgramsArgs {
    /// Emit the rule tables as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct OptimizeArgs {
    #[command(flatten)]
    pub(crate) feed: FeedArgs,
    /// Number of improvement opportunities to list
    #[arg(long)]
    pub(crate) top: Option<usize>,
    /// Minimum per-transaction gain worth listing
    #[arg(long, value_parser = crate::infra::parse_decimal)]
    pub(crate) threshold: Option<Decimal>,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let registry = RewardProgramRegistry::standard();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Demo(DemoArgs::default()));

    match command {
        Command::Summary(args) => {
            let feed = load_feed(&args.feed, args.format, args.amount_sign())?;
            let summary = CashbackAggregator::new(&registry, config.analysis)
                .aggregate(&feed.transactions, &feed);
            render_summary(&summary, args.json)
        }
        Command::Optimize(args) => {
            let analysis = apply_overrides(config.analysis, args.top, args.threshold);
            let feed = load_feed(&args.feed.feed, args.feed.format, args.feed.amount_sign())?;
            let report = OptimalCashbackAnalyzer::new(&registry, analysis)
                .analyze(&feed.transactions, &feed);
            render_optimal(&report, args.feed.json)
        }
        Command::Spending(args) => {
            let feed = load_feed(&args.feed, args.format, args.amount_sign())?;
            let summary = SpendingSummary::from_transactions(&feed.transactions, &feed);
            render_spending(&summary, args.json)
        }
        Command::Programs(args) => render_programs(&registry, args.json),
        Command::Demo(args) => run_demo(args, &registry, config.analysis),
    }
}

fn apply_overrides(
    mut analysis: AnalysisConfig,
    top: Option<usize>,
    threshold: Option<Decimal>,
) -> AnalysisConfig {
    if let Some(top) = top {
        analysis.top_opportunities = top;
    }
    if let Some(threshold) = threshold {
        analysis.improvement_threshold = threshold;
    }
    analysis
}
