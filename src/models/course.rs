//! Course, hole and tee records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One scraped golf course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Display name from the listing card.
    pub name: String,
    /// Absolute detail-page URL.
    pub url: String,
    /// Full country name (or the raw code when unmapped).
    #[serde(default)]
    pub country: Option<String>,
    /// Total hole count.
    #[serde(default, deserialize_with = "lenient::count")]
    pub holes: Option<u32>,
    /// Aggregate par for the full course.
    #[serde(default, deserialize_with = "lenient::count")]
    pub par: Option<u32>,
    /// Aggregate yardage in yards.
    #[serde(default, deserialize_with = "lenient::count")]
    pub yardage: Option<u32>,
    /// Per-hole detail keyed by hole number.
    ///
    /// Serialized with string keys ("1", "2", ...) in numeric order.
    #[serde(default, deserialize_with = "lenient::per_hole")]
    pub per_hole: BTreeMap<u32, Hole>,
}

impl Course {
    /// Create a course with only listing-level identity.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            country: None,
            holes: None,
            par: None,
            yardage: None,
            per_hole: BTreeMap::new(),
        }
    }

    /// Look up a hole by number.
    pub fn hole(&self, number: u32) -> Option<&Hole> {
        self.per_hole.get(&number)
    }

    /// Distinct tee names across all holes, in first-seen order.
    pub fn tee_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for hole in self.per_hole.values() {
            for tee in &hole.tees {
                let name = tee.tee.trim();
                if !name.is_empty() && !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }

    /// Drop per-hole entries numbered above a known hole count.
    ///
    /// Returns the number of entries removed.
    pub fn clamp_holes(&mut self) -> usize {
        let Some(total) = self.holes else {
            return 0;
        };
        let before = self.per_hole.len();
        self.per_hole.retain(|number, _| *number >= 1 && *number <= total);
        before - self.per_hole.len()
    }
}

/// Detail for a single hole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    #[serde(default, deserialize_with = "lenient::count")]
    pub par: Option<u32>,
    #[serde(default)]
    pub tees: Vec<TeeEntry>,
    #[serde(default)]
    pub video: Option<String>,
}

/// One tee box on a hole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeeEntry {
    /// Tee name or colour ("Blue", "White").
    pub tee: String,
    /// Distance in yards.
    #[serde(default, deserialize_with = "lenient::count")]
    pub distance: Option<u32>,
    /// Elevation delta.
    #[serde(default, deserialize_with = "lenient::float")]
    pub height: Option<f64>,
}

impl TeeEntry {
    pub fn new(tee: impl Into<String>, distance: Option<u32>, height: Option<f64>) -> Self {
        Self {
            tee: tee.into(),
            distance,
            height,
        }
    }
}

/// Tolerant field readers for datasets written by older scrapers, where
/// numbers were sometimes left as raw strings ("312 yd").
mod lenient {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use tracing::debug;

    use super::Hole;
    use crate::utils::{parse_count, parse_float};

    pub fn count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .or_else(|| n.as_f64().and_then(|f| parse_count(&f.to_string()))),
            Some(Value::String(s)) => parse_count(&s),
            _ => None,
        })
    }

    pub fn float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => parse_float(&s),
            _ => None,
        })
    }

    pub fn per_hole<'de, D>(deserializer: D) -> Result<BTreeMap<u32, Hole>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<BTreeMap<String, Hole>>::deserialize(deserializer)?.unwrap_or_default();
        let mut holes = BTreeMap::new();
        for (key, hole) in raw {
            match key.trim().parse::<u32>() {
                Ok(number) if number > 0 => {
                    holes.insert(number, hole);
                }
                _ => debug!("Ignoring per_hole entry with key {:?}", key),
            }
        }
        Ok(holes)
    }
}
