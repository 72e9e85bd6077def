//! Golf course scraping pipeline.

pub mod assembler;
pub mod browser;
pub mod config;
pub mod detail;
pub mod listing;
pub mod navigator;
pub mod session;
pub mod strategy;

use std::time::Duration;

use thiserror::Error;

pub use assembler::{scrape_courses, CourseOutcome, ProgressCallback, ScrapeEvent, ScrapeReport};
pub use browser::{BrowserEngineConfig, ChromiumBrowser};
pub use config::{ScrapeConfig, SiteSelectors};
pub use navigator::{NavigationError, NavigationFailure, RetryPolicy};
pub use session::{BrowserError, PageSession};

/// Errors that abort a scrape run before any course is visited.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Invalid {name} selector {css:?}: {message}")]
    Selector {
        name: &'static str,
        css: String,
        message: String,
    },
    #[error("Could not load course listing: {0}")]
    Navigation(#[from] NavigationError),
    #[error("Listing container {selector:?} did not appear within {waited:?}")]
    ListingNotFound { selector: String, waited: Duration },
    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),
}
