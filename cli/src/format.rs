use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Star rating assumed when a hotel reports none
pub const DEFAULT_STAR_RATING: u32 = 3;

/// Highest star rating the dashboard will draw
pub const MAX_STAR_RATING: u32 = 5;

/// Formats a money amount to two decimals; absent amounts render `$0.00`
pub fn format_currency(amount: Option<f64>) -> String {
    match amount {
        Some(value) => format!("${:.2}", value),
        None => "$0.00".to_string(),
    }
}

/// Formats an API timestamp as a short date like `Jan 5, 2026`.
///
/// Absent or unparseable values render `N/A`.
pub fn format_date(raw: Option<&str>) -> String {
    raw.and_then(parse_api_date)
        .map(|date| date.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// The API serves RFC 3339 timestamps, naive datetimes and bare dates
fn parse_api_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.date_naive());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.date());
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(parsed);
    }
    None
}

/// Star glyphs for a hotel rating.
///
/// A missing or zero rating falls back to the default; anything above
/// [`MAX_STAR_RATING`] is capped so a corrupt value cannot flood the row.
pub fn stars(rating: Option<u32>) -> String {
    let rating = match rating {
        None | Some(0) => DEFAULT_STAR_RATING,
        Some(value) => value.min(MAX_STAR_RATING),
    };
    "★".repeat(rating as usize)
}

/// Joins first and last name; an entirely blank name renders `N/A`
pub fn full_name(first: Option<&str>, last: Option<&str>) -> String {
    let joined = format!("{} {}", first.unwrap_or(""), last.unwrap_or(""));
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        "N/A".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Text content with the `N/A` fallback for absent or blank values
pub fn text_or_na(value: Option<&str>) -> String {
    match value {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        _ => "N/A".to_string(),
    }
}

/// Display text for fields served as either strings or numbers
pub fn value_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) if !text.trim().is_empty() => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => "N/A".to_string(),
    }
}
