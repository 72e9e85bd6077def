//! Permissive numeric extraction from scraped text.
//!
//! Course pages render numbers inside labels and units ("6,500 yd",
//! "PAR 4", "72H", "+3.5"). These helpers pull out the first number in a
//! token and return `None` instead of guessing when there isn't one.

use regex::Regex;
use std::sync::LazyLock;

static NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-+]?\d+(?:\.\d+)?").expect("number pattern should compile")
});

/// Find the first numeric substring after dropping thousands separators.
fn first_number(text: &str) -> Option<String> {
    let cleaned = text.replace(',', "");
    NUMBER_PATTERN
        .find(&cleaned)
        .map(|m| m.as_str().trim_start_matches('+').to_string())
}

/// Parse the first integer found in `text`.
///
/// Decimals truncate toward zero, so `"6,500.7 yd"` gives `6500`.
pub fn parse_int(text: &str) -> Option<i64> {
    let token = first_number(text)?;
    if let Ok(value) = token.parse::<i64>() {
        return Some(value);
    }
    let value = token.parse::<f64>().ok()?;
    if value.is_finite() && value.abs() < i64::MAX as f64 {
        Some(value.trunc() as i64)
    } else {
        None
    }
}

/// Parse the first integer in `text` as an unsigned count (holes, par, yards).
pub fn parse_count(text: &str) -> Option<u32> {
    parse_int(text).and_then(|v| u32::try_from(v).ok())
}

/// Parse the first decimal number found in `text`.
pub fn parse_float(text: &str) -> Option<f64> {
    first_number(text)?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
