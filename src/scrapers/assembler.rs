//! Scrape pipeline orchestration.
//!
//! Loads the listing once, then visits every course on a single reused
//! detail page. Per-course failures degrade that record and move on; only
//! a listing that never renders aborts the run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::config::{CompiledSelectors, ScrapeConfig};
use super::detail::{extract_aggregate, extract_per_hole};
use super::listing::{harvest_cards, load_all_courses, ListingCard};
use super::navigator::navigate_with_retry;
use super::session::PageSession;
use super::ScrapeError;
use crate::models::Course;

/// Progress notifications from a scrape run.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeEvent {
    /// Listing harvested; `total` courses will be visited.
    ListingLoaded { cards: usize, total: usize },
    /// A course finished, successfully or not.
    CourseDone {
        index: usize,
        total: usize,
        name: String,
        outcome: CourseOutcome,
    },
}

/// How a single course fared.
#[derive(Debug, Clone, PartialEq)]
pub enum CourseOutcome {
    /// Detail page parsed; `holes` per-hole entries kept.
    Scraped { holes: usize },
    /// Hole iteration stopped early on a browser error.
    Partial { holes: usize, error: String },
    /// Navigation failed; only listing fields were recorded.
    Failed { error: String },
}

pub type ProgressCallback = Arc<dyn Fn(ScrapeEvent) + Send + Sync>;

/// Result of a scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    pub courses: Vec<Course>,
    /// Cards found on the listing before any limit was applied.
    pub cards_found: usize,
    /// The run stopped early on a cancellation request.
    pub interrupted: bool,
    /// Courses whose detail page could not be loaded.
    pub failures: usize,
    /// Courses whose hole iteration was cut short.
    pub partial: usize,
    pub elapsed: Duration,
}

impl ScrapeReport {
    /// False when an interrupt landed before any course was gathered, so an
    /// existing dataset should be left alone.
    pub fn should_save(&self) -> bool {
        !(self.interrupted && self.courses.is_empty())
    }
}

/// Run the whole pipeline.
///
/// `cancel` is checked before every listing round and before each course;
/// when set, the run stops and the courses gathered so far are returned with
/// `interrupted` set.
pub async fn scrape_courses<L, D>(
    listing: &mut L,
    detail: &mut D,
    config: &ScrapeConfig,
    limit: Option<usize>,
    cancel: &AtomicBool,
    progress: Option<ProgressCallback>,
) -> Result<ScrapeReport, ScrapeError>
where
    L: PageSession + ?Sized,
    D: PageSession + ?Sized,
{
    let started = Instant::now();
    let selectors = config.selectors.compile()?;
    let policy = config.retry_policy();
    let emit = |event: ScrapeEvent| {
        if let Some(ref cb) = progress {
            cb(event);
        }
    };

    info!("Loading course listing from {}", config.listing_url);
    navigate_with_retry(listing, &config.listing_url, &policy).await?;

    let container = &config.selectors.listing_container;
    if !listing
        .wait_for_selector(container, config.listing_wait())
        .await?
    {
        return Err(ScrapeError::ListingNotFound {
            selector: container.clone(),
            waited: config.listing_wait(),
        });
    }

    let stats = load_all_courses(listing, config, cancel).await?;
    if stats.interrupted {
        info!("Interrupted while loading the listing; no courses visited");
        return Ok(ScrapeReport {
            courses: Vec::new(),
            cards_found: stats.cards,
            interrupted: true,
            failures: 0,
            partial: 0,
            elapsed: started.elapsed(),
        });
    }
    let html = listing.content().await?;
    let mut cards = harvest_cards(&html, &selectors, &config.base_url);
    let cards_found = cards.len();

    if cards.is_empty() {
        warn!("No course cards found on the listing page");
    } else {
        info!("Found {} course links", cards_found);
    }
    if let Some(limit) = limit {
        cards.truncate(limit);
    }

    let total = cards.len();
    emit(ScrapeEvent::ListingLoaded {
        cards: cards_found,
        total,
    });

    let mut report = ScrapeReport {
        courses: Vec::with_capacity(total),
        cards_found,
        interrupted: false,
        failures: 0,
        partial: 0,
        elapsed: Duration::ZERO,
    };

    for (i, card) in cards.into_iter().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            info!("Interrupted after {} of {} courses", i, total);
            report.interrupted = true;
            break;
        }

        let name = card.name.clone();
        let (course, outcome) = scrape_course(detail, card, config, &selectors).await;
        match outcome {
            CourseOutcome::Failed { .. } => report.failures += 1,
            CourseOutcome::Partial { .. } => report.partial += 1,
            CourseOutcome::Scraped { .. } => {}
        }
        report.courses.push(course);
        emit(ScrapeEvent::CourseDone {
            index: i + 1,
            total,
            name,
            outcome,
        });
    }

    report.elapsed = started.elapsed();
    Ok(report)
}

/// Visit one course and merge its detail fields over the listing fields.
async fn scrape_course<D>(
    page: &mut D,
    card: ListingCard,
    config: &ScrapeConfig,
    selectors: &CompiledSelectors,
) -> (Course, CourseOutcome)
where
    D: PageSession + ?Sized,
{
    let mut course = Course::new(card.name, card.url);
    course.country = card.country;
    course.holes = card.holes;
    course.par = card.par;
    course.yardage = card.yardage;

    if let Err(e) = navigate_with_retry(page, &course.url, &config.retry_policy()).await {
        warn!("Skipping details for {}: {}", course.name, e);
        return (
            course,
            CourseOutcome::Failed {
                error: e.to_string(),
            },
        );
    }
    tokio::time::sleep(config.detail_settle()).await;

    match page.content().await {
        Ok(html) => {
            let aggregate = extract_aggregate(&html, selectors);
            course.holes = aggregate.holes.or(course.holes);
            course.par = aggregate.par.or(course.par);
            course.yardage = aggregate.yardage.or(course.yardage);
        }
        Err(e) => warn!("Could not read detail page for {}: {}", course.name, e),
    }

    let (per_hole, error) = extract_per_hole(page, config, selectors).await;
    course.per_hole = per_hole;
    let dropped = course.clamp_holes();
    if dropped > 0 {
        debug!(
            "Dropped {} hole entries beyond {:?} for {}",
            dropped, course.holes, course.name
        );
    }

    let holes = course.per_hole.len();
    let outcome = match error {
        Some(e) => {
            warn!(
                "Hole iteration for {} stopped after {} holes: {}",
                course.name, holes, e
            );
            CourseOutcome::Partial {
                holes,
                error: e.to_string(),
            }
        }
        None => CourseOutcome::Scraped { holes },
    };
    (course, outcome)
}
