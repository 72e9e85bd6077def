//! Hole-range and yardage-range expressions.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::utils::parse_count;

/// Upper bound for hole numbers when the course's hole count is unknown.
pub const MAX_HOLE_NUMBER: u32 = 999;

/// A whole number, optionally with thousands separators ("6,500").
static YARDAGE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,3}(?:,\d{3})+\b|\d+").expect("yardage number pattern should compile")
});

/// Parse a hole selection like `"1,3,5-9"`.
///
/// Ranges are inclusive and may be written backwards. Malformed tokens are
/// dropped. Values outside `[1, ceiling]` are dropped; without a ceiling the
/// bound is [`MAX_HOLE_NUMBER`]. The result is sorted and deduplicated.
pub fn parse_hole_input(expr: &str, ceiling: Option<u32>) -> Vec<u32> {
    let max = ceiling.unwrap_or(MAX_HOLE_NUMBER);
    let mut holes = BTreeSet::new();

    for part in expr.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (start, end) = match part.split_once('-') {
            Some((a, b)) => match (parse_digits(a), parse_digits(b)) {
                (Some(a), Some(b)) => (a.min(b), a.max(b)),
                _ => continue,
            },
            None => match parse_digits(part) {
                Some(n) => (n, n),
                None => continue,
            },
        };
        let start = start.max(1);
        let end = end.min(max);
        if start <= end {
            holes.extend(start..=end);
        }
    }

    holes.into_iter().collect()
}

/// Digits only, no sign or decimals.
fn parse_digits(token: &str) -> Option<u32> {
    let token = token.trim();
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Inclusive yardage bounds; `None` means unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YardageRange {
    pub lo: Option<u32>,
    pub hi: Option<u32>,
}

impl YardageRange {
    pub const UNBOUNDED: YardageRange = YardageRange { lo: None, hi: None };

    pub fn new(lo: Option<u32>, hi: Option<u32>) -> Self {
        Self { lo, hi }
    }

    /// Parse one of `lo-hi`, `>=N`, `<=N`, `N`, or two numbers separated by
    /// whitespace or commas. Units and other text around the numbers are
    /// ignored. A dash range with one side missing is open on that side.
    /// Anything without a number is unbounded.
    pub fn parse(expr: &str) -> Self {
        let text = expr.trim();
        if text.is_empty() {
            return Self::UNBOUNDED;
        }

        if let Some(rest) = text.strip_prefix(">=") {
            return Self::new(parse_count(rest), None);
        }
        if let Some(rest) = text.strip_prefix("<=") {
            return Self::new(None, parse_count(rest));
        }
        if let Some((a, b)) = text.split_once('-') {
            return match (parse_count(a), parse_count(b)) {
                (Some(a), Some(b)) => Self::ordered(a, b),
                (lo, hi) => Self::new(lo, hi),
            };
        }

        let numbers: Vec<u32> = YARDAGE_NUMBER
            .find_iter(text)
            .filter_map(|m| parse_count(m.as_str()))
            .collect();
        match numbers.as_slice() {
            [] => Self::UNBOUNDED,
            [n] => Self::new(Some(*n), Some(*n)),
            [a, b, ..] => Self::ordered(*a, *b),
        }
    }

    fn ordered(a: u32, b: u32) -> Self {
        Self::new(Some(a.min(b)), Some(a.max(b)))
    }

    pub fn is_unbounded(&self) -> bool {
        self.lo.is_none() && self.hi.is_none()
    }

    /// Whether `value` lies within the bounds. A missing value never matches.
    pub fn contains(&self, value: Option<u64>) -> bool {
        let Some(value) = value else {
            return false;
        };
        if self.lo.is_some_and(|lo| value < u64::from(lo)) {
            return false;
        }
        if self.hi.is_some_and(|hi| value > u64::from(hi)) {
            return false;
        }
        true
    }
}

impl fmt::Display for YardageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.lo, self.hi) {
            (None, None) => f.write_str("any"),
            (Some(lo), Some(hi)) if lo == hi => write!(f, "{}", lo),
            (Some(lo), Some(hi)) => write!(f, "{}-{}", lo, hi),
            (Some(lo), None) => write!(f, ">={}", lo),
            (None, Some(hi)) => write!(f, "<={}", hi),
        }
    }
}
