//! Holes command: per-hole detail and tee totals for one course.

use console::style;

use crate::cli::helpers::{fmt_opt, format_yards, load_dataset};
use crate::config::Settings;
use crate::models::Course;
use crate::search::{find_by_name, hole_rows, parse_hole_input, tee_totals_for_holes};

/// Show the selected holes of the course matching `query`.
pub async fn cmd_holes(
    settings: &Settings,
    query: &str,
    pick: Option<usize>,
    holes: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let courses = load_dataset(settings)?;
    let matches = find_by_name(&courses, query);

    let course = match (matches.as_slice(), pick) {
        ([], _) => {
            println!("{} No course matches '{}'", style("!").yellow(), query);
            return Ok(());
        }
        ([only], None) => *only,
        (_, None) => {
            println!(
                "{} {} courses match '{}'; choose one with --pick:",
                style("!").yellow(),
                matches.len(),
                query
            );
            for (i, c) in matches.iter().enumerate() {
                println!("  {:>3}. {}", i + 1, c.name);
            }
            return Ok(());
        }
        (all, Some(n)) => match n.checked_sub(1).and_then(|i| all.get(i)) {
            Some(course) => *course,
            None => anyhow::bail!("--pick {} is out of range (1-{})", n, all.len()),
        },
    };

    let last_hole = course
        .holes
        .or_else(|| course.per_hole.keys().max().copied())
        .unwrap_or(18);
    let default_range = format!("1-{}", last_hole);
    let selected = parse_hole_input(holes.unwrap_or(default_range.as_str()), course.holes);

    if json {
        let rows = hole_rows(course, &selected);
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    print_summary(course);

    for number in &selected {
        let Some(hole) = course.hole(*number) else {
            println!("\n{}", style(format!("Hole {} not found.", number)).dim());
            continue;
        };
        println!(
            "\n{} (Par {})",
            style(format!("Hole {}", number)).bold(),
            fmt_opt(hole.par)
        );
        for tee in &hole.tees {
            println!(
                "  {:<14} {:>6} yd {:>8}",
                tee.tee,
                fmt_opt(tee.distance),
                tee.height
                    .map(|h| format!("elev {:+.1}", h))
                    .unwrap_or_default()
            );
        }
        if let Some(ref video) = hole.video {
            println!("  {} {}", style("video").dim(), video);
        }
    }

    let totals = tee_totals_for_holes(course, &selected);
    if !totals.is_empty() {
        println!("\n{}", style("Tee totals").bold());
        for (tee, total) in &totals {
            println!("  {:<14} {:>8} yd", tee, format_yards(*total));
        }
    }
    Ok(())
}

fn print_summary(course: &Course) {
    println!("\n{}", style(&course.name).bold());
    println!("{}", "-".repeat(40));
    println!(
        "{:<10} {}",
        "Country:",
        course.country.as_deref().unwrap_or("-")
    );
    println!("{:<10} {}", "Holes:", fmt_opt(course.holes));
    println!("{:<10} {}", "Par:", fmt_opt(course.par));
    println!(
        "{:<10} {}",
        "Yardage:",
        fmt_opt(course.yardage.map(|y| format_yards(u64::from(y))))
    );
    println!("{:<10} {}", "URL:", course.url);
}
