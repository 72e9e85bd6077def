//! Search command: unified course filters.

use console::style;

use crate::cli::helpers::{fmt_opt, format_yards, load_dataset, truncate};
use crate::config::Settings;
use crate::search::{CourseFilter, YardageRange};

/// Filter the dataset and print matching courses.
pub async fn cmd_search(
    settings: &Settings,
    name: Option<String>,
    country: Option<String>,
    tee: Option<String>,
    yardage: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let courses = load_dataset(settings)?;

    let filter = CourseFilter {
        name,
        country,
        tee,
        yardage: yardage
            .as_deref()
            .map(YardageRange::parse)
            .unwrap_or(YardageRange::UNBOUNDED),
    };
    let matches = filter.apply(&courses);

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    if matches.is_empty() {
        println!("{} No courses match", style("!").yellow());
        return Ok(());
    }

    let yardage_label = match filter.tee.as_deref().map(str::trim) {
        Some(tee) if !tee.is_empty() => format!("{} yd", tee),
        _ => "Yardage".to_string(),
    };

    println!(
        "\n{:<40} {:<16} {:>5} {:>4} {:>10}",
        style("Course").bold(),
        style("Country").bold(),
        style("Holes").bold(),
        style("Par").bold(),
        style(truncate(&yardage_label, 10)).bold()
    );
    println!("{}", "-".repeat(79));

    for m in &matches {
        println!(
            "{:<40} {:<16} {:>5} {:>4} {:>10}",
            truncate(&m.course.name, 40),
            truncate(m.course.country.as_deref().unwrap_or("-"), 16),
            fmt_opt(m.course.holes),
            fmt_opt(m.course.par),
            format_yards(m.yardage)
        );
    }

    println!(
        "\n{} {} of {} courses (yardage {})",
        style("✓").green(),
        matches.len(),
        courses.len(),
        filter.yardage
    );
    Ok(())
}
