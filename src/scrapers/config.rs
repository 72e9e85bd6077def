//! Scraper configuration types.
//!
//! Timings and selectors for the course listing and detail pages. Every
//! field has a default matching the live site, so a config file only needs
//! to mention what it overrides.

use std::time::Duration;

use scraper::Selector;
use serde::{Deserialize, Serialize};

use super::navigator::RetryPolicy;
use super::ScrapeError;

/// Listing page that holds every course card.
pub const DEFAULT_LISTING_URL: &str = "https://www.global.golfzon.com/courses/about-course";
/// Base URL that relative course links resolve against.
pub const DEFAULT_BASE_URL: &str = "https://www.global.golfzon.com";

/// Scrape pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub listing_url: String,
    pub base_url: String,
    /// Pause after each load-more/scroll round, in milliseconds.
    pub scroll_pause_ms: u64,
    /// Rounds without new cards before the listing counts as fully loaded.
    pub max_stagnant_rounds: u32,
    /// Hard cap on load-more/scroll rounds.
    pub max_rounds: u32,
    /// Seconds to wait for the listing container.
    pub listing_timeout: u64,
    /// Pause after a detail page loads, in milliseconds.
    pub detail_settle_ms: u64,
    /// Pause after clicking a hole tab, in milliseconds.
    pub tab_settle_ms: u64,
    /// Seconds before a direct tab click is abandoned for a script click.
    pub click_timeout: u64,
    /// Per-attempt navigation timeout in seconds.
    pub navigation_timeout: u64,
    /// Retries for transient navigation failures.
    pub max_retries: u32,
    /// Linear backoff unit in seconds.
    pub backoff_unit: u64,
    pub selectors: SiteSelectors,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            scroll_pause_ms: 800,
            max_stagnant_rounds: 3,
            max_rounds: 500,
            listing_timeout: 20,
            detail_settle_ms: 500,
            tab_settle_ms: 500,
            click_timeout: 5,
            navigation_timeout: 30,
            max_retries: 3,
            backoff_unit: 2,
            selectors: SiteSelectors::default(),
        }
    }
}

impl ScrapeConfig {
    pub fn scroll_pause(&self) -> Duration {
        Duration::from_millis(self.scroll_pause_ms)
    }

    pub fn listing_wait(&self) -> Duration {
        Duration::from_secs(self.listing_timeout)
    }

    pub fn detail_settle(&self) -> Duration {
        Duration::from_millis(self.detail_settle_ms)
    }

    pub fn tab_settle(&self) -> Duration {
        Duration::from_millis(self.tab_settle_ms)
    }

    pub fn click_wait(&self) -> Duration {
        Duration::from_secs(self.click_timeout)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            backoff_unit: Duration::from_secs(self.backoff_unit),
            timeout: Duration::from_secs(self.navigation_timeout),
        }
    }
}

/// CSS selectors for the listing and detail markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSelectors {
    /// Container that appears once the listing has rendered.
    pub listing_container: String,
    /// Course card anchors.
    pub course_card: String,
    /// Card title, relative to the card.
    pub card_title: String,
    /// Inline summary spans, relative to the card.
    pub card_subtext: String,
    /// Aggregate summary block on the detail page.
    pub summary: String,
    /// Hole tab strip children.
    pub hole_tabs: String,
    /// Panel for the selected hole.
    pub hole_panel: String,
    pub hole_par: String,
    pub tee_row: String,
    pub tee_name: String,
    pub tee_distance: String,
    pub tee_height: String,
    /// Candidate video selectors with the attribute to read, in priority order.
    pub video: Vec<VideoSource>,
}

/// Where a hole video URL may live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSource {
    pub selector: String,
    pub attr: String,
}

impl VideoSource {
    fn new(selector: &str, attr: &str) -> Self {
        Self {
            selector: selector.to_string(),
            attr: attr.to_string(),
        }
    }
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            listing_container: "#search-course-body".to_string(),
            course_card: "#search-course-body a[href^='/courses/']".to_string(),
            card_title: "h4".to_string(),
            card_subtext: "span".to_string(),
            summary: ".span-space--dot".to_string(),
            hole_tabs: ".tabs-scroll div".to_string(),
            hole_panel: "div.block".to_string(),
            hole_par: "span.gz-text-xsm".to_string(),
            tee_row: "div.flex.items-center.justify-between.border-b".to_string(),
            tee_name: "div.gz-text-md".to_string(),
            tee_distance: "div[class*='w-[78px]']".to_string(),
            tee_height: "div[class*='w-[92px]']".to_string(),
            video: vec![
                VideoSource::new("video[src]", "src"),
                VideoSource::new("video[data-src]", "data-src"),
                VideoSource::new("video source[src]", "src"),
                VideoSource::new("video source[data-src]", "data-src"),
            ],
        }
    }
}

impl SiteSelectors {
    /// Parse every selector used against fetched HTML.
    pub fn compile(&self) -> Result<CompiledSelectors, ScrapeError> {
        let videos = self
            .video
            .iter()
            .map(|v| Ok((parse("video", &v.selector)?, v.attr.clone())))
            .collect::<Result<Vec<_>, ScrapeError>>()?;
        Ok(CompiledSelectors {
            course_card: parse("course_card", &self.course_card)?,
            card_title: parse("card_title", &self.card_title)?,
            card_subtext: parse("card_subtext", &self.card_subtext)?,
            summary: parse("summary", &self.summary)?,
            summary_span: parse("summary", "span")?,
            hole_panel: parse("hole_panel", &self.hole_panel)?,
            hole_par: parse("hole_par", &self.hole_par)?,
            tee_row: parse("tee_row", &self.tee_row)?,
            tee_name: parse("tee_name", &self.tee_name)?,
            tee_distance: parse("tee_distance", &self.tee_distance)?,
            tee_height: parse("tee_height", &self.tee_height)?,
            videos,
        })
    }
}

fn parse(name: &'static str, css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector {
        name,
        css: css.to_string(),
        message: format!("{:?}", e),
    })
}

/// Parsed form of [`SiteSelectors`] for matching against page HTML.
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub course_card: Selector,
    pub card_title: Selector,
    pub card_subtext: Selector,
    pub summary: Selector,
    pub summary_span: Selector,
    pub hole_panel: Selector,
    pub hole_par: Selector,
    pub tee_row: Selector,
    pub tee_name: Selector,
    pub tee_distance: Selector,
    pub tee_height: Selector,
    pub videos: Vec<(Selector, String)>,
}
