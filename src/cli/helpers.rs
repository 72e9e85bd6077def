//! Shared helper functions for CLI commands.

use std::fmt::Display;

use anyhow::Context;

use crate::config::Settings;
use crate::models::Course;

/// Load the dataset named by the settings.
pub fn load_dataset(settings: &Settings) -> anyhow::Result<Vec<Course>> {
    crate::storage::load_courses(&settings.dataset_path).with_context(|| {
        format!(
            "Failed to load dataset {} (run `golf scrape` first?)",
            settings.dataset_path.display()
        )
    })
}

/// Truncate a string to `max` characters, marking the cut with "...".
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Render an optional value, or "-" when absent.
pub fn fmt_opt<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Format a whole yardage with thousands separators.
pub fn format_yards(yards: u64) -> String {
    let digits = yards.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
