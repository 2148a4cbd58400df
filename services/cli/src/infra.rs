use cashback::error::AppError;
use cashback::ingest::{AmountSign, CsvFeed, NormalizedFeed, PlaidFeed};
use clap::ValueEnum;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

const SAMPLE_FEED: &[u8] = include_bytes!("../../../crates/cashback/data/sample_feed.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum FeedFormat {
    /// Aggregator JSON document with accounts and transactions
    Json,
    /// Flat CSV export, one row per transaction
    Csv,
}

pub(crate) fn load_feed(
    path: &Path,
    format: FeedFormat,
    sign: AmountSign,
) -> Result<NormalizedFeed, AppError> {
    info!(path = %path.display(), ?format, "loading transaction feed");
    let feed = match format {
        FeedFormat::Json => PlaidFeed::from_path(path)?,
        FeedFormat::Csv => CsvFeed::from_path(path, sign)?,
    };
    Ok(feed)
}

pub(crate) fn sample_feed() -> Result<NormalizedFeed, AppError> {
    Ok(PlaidFeed::from_json_reader(SAMPLE_FEED)?)
}

pub(crate) fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    let value = Decimal::from_str(raw.trim())
        .map_err(|err| format!("failed to parse '{raw}' as a decimal amount ({err})"))?;
    if value.is_sign_negative() {
        return Err(format!("'{raw}' must not be negative"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_non_negative_decimals() {
        assert_eq!(parse_decimal(" 0.75 "), Ok(dec!(0.75)));
        assert!(parse_decimal("-1").is_err());
        assert!(parse_decimal("five").is_err());
    }

    #[test]
    fn bundled_sample_feed_loads() {
        let feed = sample_feed().expect("sample loads");
        assert!(!feed.is_empty());
        assert!(feed.skipped > 0);
    }
}
