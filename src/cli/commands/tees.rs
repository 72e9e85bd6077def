//! Tees command: tee names across the dataset, or totals per course.

use console::style;

use crate::cli::helpers::{format_yards, load_dataset, truncate};
use crate::config::Settings;
use crate::search::{distinct_tees, find_by_name, tee_course_counts, tee_totals};

/// List distinct tees, or per-tee totals for courses matching `query`.
pub async fn cmd_tees(settings: &Settings, query: Option<&str>) -> anyhow::Result<()> {
    let courses = load_dataset(settings)?;

    let Some(query) = query else {
        let tees = distinct_tees(&courses);
        if tees.is_empty() {
            println!("{} No tee data in {}", style("!").yellow(), settings.dataset_path.display());
            return Ok(());
        }

        let usage = tee_course_counts(&courses);

        println!("\n{:<20} {:>8}", style("Tee").bold(), style("Courses").bold());
        println!("{}", "-".repeat(29));
        for tee in &tees {
            let count = usage.get(tee).copied().unwrap_or(0);
            println!("{:<20} {:>8}", truncate(tee, 20), count);
        }
        return Ok(());
    };

    let matches = find_by_name(&courses, query);
    if matches.is_empty() {
        println!("{} No course matches '{}'", style("!").yellow(), query);
        return Ok(());
    }

    for course in matches {
        println!("\n{}", style(&course.name).bold());
        let totals = tee_totals(course);
        if totals.is_empty() {
            println!("  {}", style("no per-hole tee data").dim());
            continue;
        }
        // Tees in the order the course lists them
        for tee in course.tee_names() {
            if let Some(total) = totals.get(&tee) {
                println!("  {:<14} {:>8} yd", tee, format_yards(*total));
            }
        }
    }
    Ok(())
}
