use crate::transactions::{Transaction, OTHER_CATEGORY, OTHER_CHANNEL};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub const DEFAULT_INSTITUTION: &str = "Financial Institution";

/// First entry of an aggregator category, whatever shape it arrived in.
///
/// Accepts a JSON list, a list serialized into a string (`"['Travel',
/// 'Airlines']"`) or a plain label. Anything empty becomes `Other`.
pub fn primary_category(value: &Value) -> String {
    let category = match value {
        Value::Array(items) => items.first().and_then(Value::as_str).map(clean_label),
        Value::String(text) => Some(first_listed(text)),
        _ => None,
    };

    category
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| OTHER_CATEGORY.to_string())
}

fn first_listed(text: &str) -> String {
    let trimmed = text.trim();
    match trimmed
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
    {
        Some(inner) => inner.split(',').next().map(clean_label).unwrap_or_default(),
        None => clean_label(trimmed),
    }
}

fn clean_label(value: &str) -> String {
    value
        .trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .trim()
        .to_string()
}

pub(crate) fn payment_channel(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|channel| !channel.is_empty())
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| OTHER_CHANNEL.to_string())
}

pub(crate) fn institution_or_default(value: Option<String>) -> String {
    value
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_INSTITUTION.to_string())
}

/// ISO dates sort lexically; the sort is stable for equal dates.
pub(crate) fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|left, right| right.date.cmp(&left.date));
}

pub(crate) fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}
