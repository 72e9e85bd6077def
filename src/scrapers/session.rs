//! Page session abstraction.
//!
//! The pipeline only needs a handful of page operations. Keeping them behind
//! a trait lets the listing loader, detail extractor and assembler run
//! against a real Chromium tab or a synthetic page in tests.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::navigator::NavigationError;

/// Errors from page operations other than navigation.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Browser not available: {0}")]
    Unavailable(String),
    #[error("No element matches {selector:?} at index {index}")]
    ElementNotFound { selector: String, index: usize },
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
    #[error("Script evaluation failed: {0}")]
    Script(String),
    #[error("DevTools protocol error: {0}")]
    Protocol(String),
}

/// Operations the scraping pipeline performs on a live page.
#[async_trait]
pub trait PageSession: Send {
    /// Navigate to `url` and wait for the document to be ready.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), NavigationError>;

    /// Current rendered HTML of the page.
    async fn content(&mut self) -> Result<String, BrowserError>;

    /// Wait until `selector` matches at least one element.
    /// Returns `false` when the timeout elapses first.
    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<bool, BrowserError>;

    /// Number of elements currently matching `selector`.
    async fn count(&mut self, selector: &str) -> Result<usize, BrowserError>;

    /// Click a visible "load more" style button if one exists.
    /// Returns whether a click happened.
    async fn click_load_more(&mut self) -> Result<bool, BrowserError>;

    /// Scroll to the bottom of the document.
    async fn scroll_to_bottom(&mut self) -> Result<(), BrowserError>;

    /// Trimmed inner text of every element matching `selector`, in document order.
    async fn texts(&mut self, selector: &str) -> Result<Vec<String>, BrowserError>;

    /// Direct (pointer) click on the `index`-th element matching `selector`.
    async fn click(&mut self, selector: &str, index: usize) -> Result<(), BrowserError>;

    /// Programmatic `element.click()` on the `index`-th match.
    async fn script_click(&mut self, selector: &str, index: usize) -> Result<(), BrowserError>;

    /// Close the page. Errors are swallowed.
    async fn close(&mut self);
}

/// Run a UI action whose failure is expected and harmless.
///
/// The listing only shows a "load more" button while more results exist,
/// and it disappears or detaches mid-click routinely; a failed attempt just
/// means the scroll step does the work this round.
pub async fn best_effort<T, F>(action: &str, fut: F) -> Option<T>
where
    F: std::future::Future<Output = Result<T, BrowserError>>,
{
    match fut.await {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("Skipped optional action {}: {}", action, e);
            None
        }
    }
}
