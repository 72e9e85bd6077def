//! Country code normalization.
//!
//! Listing cards carry three-letter country codes. The dataset and the
//! search filters use full names; anything not in the table passes through
//! untouched so it can still be used as a substring filter.

/// Known country codes and their display names.
pub const COUNTRY_CODES: &[(&str, &str)] = &[
    ("KOR", "South Korea"),
    ("JPN", "Japan"),
    ("CHN", "China"),
    ("TWN", "Taiwan"),
    ("THA", "Thailand"),
    ("VNM", "Vietnam"),
    ("PHL", "Philippines"),
    ("MYS", "Malaysia"),
    ("IDN", "Indonesia"),
    ("SGP", "Singapore"),
    ("AUS", "Australia"),
    ("NZL", "New Zealand"),
    ("USA", "United States"),
    ("CAN", "Canada"),
    ("MEX", "Mexico"),
    ("GBR", "United Kingdom"),
    ("SCO", "Scotland"),
    ("IRL", "Ireland"),
    ("ESP", "Spain"),
    ("PRT", "Portugal"),
    ("FRA", "France"),
    ("DEU", "Germany"),
    ("ARE", "United Arab Emirates"),
    ("ZAF", "South Africa"),
];

/// Look up the full name for a code (case-insensitive).
pub fn country_name(code: &str) -> Option<&'static str> {
    let code = code.trim();
    COUNTRY_CODES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

/// Normalize a country code or name.
///
/// Codes map to their full name, full names are returned in canonical
/// casing, unknown input is returned trimmed but otherwise unchanged.
/// Empty input yields `None`.
pub fn normalize_country(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(name) = country_name(trimmed) {
        return Some(name.to_string());
    }
    let canonical = COUNTRY_CODES
        .iter()
        .find(|(_, name)| name.eq_ignore_ascii_case(trimmed))
        .map(|(_, name)| name.to_string());
    Some(canonical.unwrap_or_else(|| trimmed.to_string()))
}
