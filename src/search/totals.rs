//! Tee totals and flattened per-tee rows.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Course, Hole};

/// Sum distances per tee name across every hole of `course`.
///
/// Tees with blank names or no distance are skipped.
pub fn tee_totals(course: &Course) -> BTreeMap<String, u64> {
    sum_tees(course.per_hole.values())
}

/// Sum distances per tee name across the selected holes only.
pub fn tee_totals_for_holes(course: &Course, holes: &[u32]) -> BTreeMap<String, u64> {
    sum_tees(holes.iter().filter_map(|n| course.hole(*n)))
}

fn sum_tees<'a>(holes: impl Iterator<Item = &'a Hole>) -> BTreeMap<String, u64> {
    let mut totals = BTreeMap::new();
    for hole in holes {
        for tee in &hole.tees {
            let name = tee.tee.trim();
            let Some(distance) = tee.distance else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            *totals.entry(name.to_string()).or_insert(0) += u64::from(distance);
        }
    }
    totals
}

/// Case-insensitive lookup of a tee total. Returns the stored tee name.
pub fn find_tee<'a>(totals: &'a BTreeMap<String, u64>, tee: &str) -> Option<(&'a str, u64)> {
    let wanted = tee.trim().to_lowercase();
    totals
        .iter()
        .find(|(name, _)| name.to_lowercase() == wanted)
        .map(|(name, total)| (name.as_str(), *total))
}

/// One tee on one hole of a course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeeRow<'a> {
    pub course: &'a str,
    pub country: Option<&'a str>,
    pub url: &'a str,
    pub total_holes: Option<u32>,
    pub course_par: Option<u32>,
    pub course_yardage: Option<u32>,
    pub hole: u32,
    pub par: Option<u32>,
    pub tee: &'a str,
    pub distance: Option<u32>,
    pub elevation: Option<f64>,
}

/// One row per (course, hole, tee), in dataset then hole order.
pub fn flatten_courses(courses: &[Course]) -> Vec<TeeRow<'_>> {
    courses
        .iter()
        .flat_map(|course| {
            course.per_hole.iter().flat_map(move |(number, hole)| {
                hole.tees.iter().map(move |tee| TeeRow {
                    course: &course.name,
                    country: course.country.as_deref(),
                    url: &course.url,
                    total_holes: course.holes,
                    course_par: course.par,
                    course_yardage: course.yardage,
                    hole: *number,
                    par: hole.par,
                    tee: &tee.tee,
                    distance: tee.distance,
                    elevation: tee.height,
                })
            })
        })
        .collect()
}

/// Rows for the selected holes of one course, sorted by hole then tee.
///
/// Holes absent from the course are skipped.
pub fn hole_rows<'a>(course: &'a Course, holes: &[u32]) -> Vec<TeeRow<'a>> {
    let mut rows: Vec<TeeRow<'a>> = flatten_courses(std::slice::from_ref(course))
        .into_iter()
        .filter(|row| holes.contains(&row.hole))
        .collect();
    rows.sort_by(|a, b| a.hole.cmp(&b.hole).then_with(|| a.tee.cmp(b.tee)));
    rows
}

/// Distinct tee names across the dataset, sorted.
pub fn distinct_tees(courses: &[Course]) -> Vec<String> {
    let mut names: Vec<String> = flatten_courses(courses)
        .into_iter()
        .map(|row| row.tee.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Number of courses offering each tee. Courses sharing a name count separately.
pub fn tee_course_counts(courses: &[Course]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for course in courses {
        for name in course.tee_names() {
            *counts.entry(name).or_insert(0) += 1;
        }
    }
    counts
}
