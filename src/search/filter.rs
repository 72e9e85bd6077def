//! Course filters: name, country, tee and yardage.

use serde::Serialize;

use super::ranges::YardageRange;
use super::totals::{find_tee, tee_totals};
use crate::models::{normalize_country, Course};

/// Combined course filter. Empty criteria match everything except the
/// yardage check, which always needs a value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseFilter {
    /// Case-insensitive substring of the course name.
    pub name: Option<String>,
    /// Country code or name; normalized, then matched as a substring.
    pub country: Option<String>,
    /// Tee name; when set, yardage is checked against that tee's total.
    pub tee: Option<String>,
    pub yardage: YardageRange,
}

/// A course that passed the filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseMatch<'a> {
    pub course: &'a Course,
    /// Matched tee name as stored in the dataset.
    pub tee: Option<String>,
    /// Tee total when filtering by tee, otherwise the course yardage.
    pub yardage: u64,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl CourseFilter {
    fn matches_name(&self, course: &Course) -> bool {
        match non_empty(&self.name) {
            Some(needle) => course.name.to_lowercase().contains(&needle.to_lowercase()),
            None => true,
        }
    }

    fn matches_country(&self, course: &Course) -> bool {
        let Some(wanted) = non_empty(&self.country).and_then(normalize_country) else {
            return true;
        };
        course
            .country
            .as_deref()
            .is_some_and(|c| c.to_lowercase().contains(&wanted.to_lowercase()))
    }

    /// Apply every criterion, keeping dataset order.
    pub fn apply<'a>(&self, courses: &'a [Course]) -> Vec<CourseMatch<'a>> {
        courses
            .iter()
            .filter(|c| self.matches_name(c) && self.matches_country(c))
            .filter_map(|course| match non_empty(&self.tee) {
                Some(tee) => {
                    let totals = tee_totals(course);
                    let (name, total) = find_tee(&totals, tee)?;
                    self.yardage.contains(Some(total)).then(|| CourseMatch {
                        course,
                        tee: Some(name.to_string()),
                        yardage: total,
                    })
                }
                None => {
                    let yardage = course.yardage.map(u64::from);
                    if !self.yardage.contains(yardage) {
                        return None;
                    }
                    yardage.map(|yardage| CourseMatch {
                        course,
                        tee: None,
                        yardage,
                    })
                }
            })
            .collect()
    }
}

/// Courses whose name contains `query`, case-insensitively.
pub fn find_by_name<'a>(courses: &'a [Course], query: &str) -> Vec<&'a Course> {
    let needle = query.trim().to_lowercase();
    courses
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&needle))
        .collect()
}
