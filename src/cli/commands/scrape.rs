//! Scrape command: drive the browser over the listing and every course.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Settings;
use crate::scrapers::{
    scrape_courses, ChromiumBrowser, CourseOutcome, ProgressCallback, ScrapeEvent,
};
use crate::storage::save_courses;

/// Scrape the course listing and save the dataset.
pub async fn cmd_scrape(
    settings: &Settings,
    limit: Option<usize>,
    headed: bool,
    remote_url: Option<String>,
) -> anyhow::Result<()> {
    let mut browser_config = settings.browser.clone();
    if headed {
        browser_config.headless = false;
    }
    if remote_url.is_some() {
        browser_config.remote_url = remote_url;
    }

    println!(
        "{} Scraping {}",
        style("→").cyan(),
        style(&settings.scrape.listing_url).dim()
    );

    let browser = ChromiumBrowser::launch(&browser_config)
        .await
        .context("Failed to start browser")?;

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.store(true, Ordering::Relaxed);
                eprintln!(
                    "\n{} Interrupt received, finishing current course...",
                    style("!").yellow()
                );
            }
        });
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Loading course listing...");
    pb.enable_steady_tick(Duration::from_millis(120));

    let progress: ProgressCallback = {
        let pb = pb.clone();
        Arc::new(move |event: ScrapeEvent| match event {
            ScrapeEvent::ListingLoaded { cards, total } => {
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                        .progress_chars("█▓░"),
                );
                pb.set_length(total as u64);
                pb.println(format!(
                    "{} Found {} courses, visiting {}",
                    style("✓").green(),
                    cards,
                    total
                ));
            }
            ScrapeEvent::CourseDone {
                name, outcome, ..
            } => {
                match outcome {
                    CourseOutcome::Scraped { .. } => {}
                    CourseOutcome::Partial { holes, error } => pb.println(format!(
                        "{} {}: kept {} holes ({})",
                        style("!").yellow(),
                        name,
                        holes,
                        error
                    )),
                    CourseOutcome::Failed { error } => {
                        pb.println(format!("{} {}: {}", style("✗").red(), name, error))
                    }
                }
                pb.inc(1);
                pb.set_message(name);
            }
        })
    };

    let result = run_pages(&browser, settings, limit, &cancel, progress).await;
    pb.finish_and_clear();
    browser.close().await;

    let report = result?;
    if !report.should_save() {
        println!(
            "{} Interrupted before any course was scraped; {} left unchanged",
            style("!").yellow(),
            settings.dataset_path.display()
        );
        return Ok(());
    }
    save_courses(&settings.dataset_path, &report.courses)
        .with_context(|| format!("Failed to save {}", settings.dataset_path.display()))?;

    if report.interrupted {
        println!(
            "{} Interrupted: saved {} partial results to {}",
            style("!").yellow(),
            report.courses.len(),
            settings.dataset_path.display()
        );
    } else {
        println!(
            "{} Saved {} courses to {} in {:.1}s",
            style("✓").green(),
            report.courses.len(),
            settings.dataset_path.display(),
            report.elapsed.as_secs_f64()
        );
    }
    if report.failures > 0 || report.partial > 0 {
        println!(
            "  {} without details, {} with partial holes",
            report.failures, report.partial
        );
    }
    Ok(())
}

/// Open the listing and detail pages, run the pipeline, then close both.
async fn run_pages(
    browser: &ChromiumBrowser,
    settings: &Settings,
    limit: Option<usize>,
    cancel: &AtomicBool,
    progress: ProgressCallback,
) -> anyhow::Result<crate::scrapers::ScrapeReport> {
    let mut listing = browser
        .new_page()
        .await
        .context("Failed to open listing page")?;
    let mut detail = match browser.new_page().await {
        Ok(page) => page,
        Err(e) => {
            listing.close().await;
            return Err(e).context("Failed to open detail page");
        }
    };

    let result = scrape_courses(
        listing.as_mut(),
        detail.as_mut(),
        &settings.scrape,
        limit,
        cancel,
        Some(progress),
    )
    .await;

    detail.close().await;
    listing.close().await;
    Ok(result?)
}
