//! `PageSession` over a chromiumoxide page.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::scrapers::navigator::{NavigationError, NavigationFailure};
use crate::scrapers::session::{BrowserError, PageSession};

/// Resolves once the document is interactive, or after 10s regardless.
const WAIT_FOR_READY_SCRIPT: &str = r#"
    new Promise((resolve) => {
        if (document.readyState === 'complete' || document.readyState === 'interactive') {
            resolve(document.readyState);
        } else {
            document.addEventListener('DOMContentLoaded', () => resolve(document.readyState));
            setTimeout(() => resolve('timeout'), 10000);
        }
    })
"#;

/// Clicks the first visible, enabled button labelled like "Load more".
const CLICK_LOAD_MORE_SCRIPT: &str = r#"
    (() => {
        const label = /more|load/i;
        const button = Array.from(document.querySelectorAll('button')).find((b) => {
            const text = (b.innerText || b.getAttribute('aria-label') || '').trim();
            return label.test(text) && !b.disabled && b.offsetParent !== null;
        });
        if (!button) return false;
        button.click();
        return true;
    })()
"#;

const SCROLL_TO_BOTTOM_SCRIPT: &str =
    "window.scrollTo(0, document.body ? document.body.scrollHeight : 0); true";

const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A live Chromium tab.
pub struct ChromePage {
    page: Page,
}

impl ChromePage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    async fn eval<T: DeserializeOwned>(&self, script: String) -> Result<T, BrowserError> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::Script(e.to_string()))?
            .into_value()
            .map_err(|e| BrowserError::Script(e.to_string()))
    }

    async fn wait_until_ready(&self, timeout: Duration) {
        let ready = self.page.evaluate(WAIT_FOR_READY_SCRIPT.to_string());
        match tokio::time::timeout(timeout, ready).await {
            Ok(Ok(result)) => {
                let state: String = result
                    .into_value()
                    .unwrap_or_else(|_| "unknown".to_string());
                debug!("Page ready state: {}", state);
            }
            Ok(Err(e)) => debug!("Could not check ready state: {}", e),
            Err(_) => warn!("Timeout waiting for page ready state"),
        }
    }
}

/// Quote a CSS selector as a JavaScript string literal.
fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

fn protocol(e: CdpError) -> BrowserError {
    BrowserError::Protocol(e.to_string())
}

#[async_trait]
impl PageSession for ChromePage {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), NavigationError> {
        debug!("Navigating to {}", url);
        let params = NavigateParams::builder()
            .url(url)
            .build()
            .map_err(|e| NavigationError::new(url, NavigationFailure::Permanent, e))?;

        match tokio::time::timeout(timeout, self.page.execute(params)).await {
            Err(_) | Ok(Err(CdpError::Timeout)) => {
                return Err(NavigationError::timeout(url, timeout));
            }
            Ok(Err(e)) => {
                return Err(NavigationError::new(
                    url,
                    NavigationFailure::Permanent,
                    e.to_string(),
                ));
            }
            Ok(Ok(response)) => {
                if let Some(code) = response.result.error_text.as_deref() {
                    if !code.is_empty() {
                        return Err(NavigationError::new(
                            url,
                            NavigationFailure::from_net_error(code),
                            code,
                        ));
                    }
                }
            }
        }

        self.wait_until_ready(timeout).await;
        Ok(())
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        self.page.content().await.map_err(protocol)
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<bool, BrowserError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.count(selector).await? > 0 {
                return Ok(true);
            }
            if tokio::time::Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
        }
    }

    async fn count(&mut self, selector: &str) -> Result<usize, BrowserError> {
        self.eval(format!(
            "document.querySelectorAll({}).length",
            js_string(selector)
        ))
        .await
    }

    async fn click_load_more(&mut self) -> Result<bool, BrowserError> {
        self.eval(CLICK_LOAD_MORE_SCRIPT.to_string()).await
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), BrowserError> {
        let _: bool = self.eval(SCROLL_TO_BOTTOM_SCRIPT.to_string()).await?;
        Ok(())
    }

    async fn texts(&mut self, selector: &str) -> Result<Vec<String>, BrowserError> {
        self.eval(format!(
            "Array.from(document.querySelectorAll({})).map((e) => (e.innerText || '').trim())",
            js_string(selector)
        ))
        .await
    }

    async fn click(&mut self, selector: &str, index: usize) -> Result<(), BrowserError> {
        let elements = self.page.find_elements(selector).await.map_err(protocol)?;
        let element = elements
            .get(index)
            .ok_or_else(|| BrowserError::ElementNotFound {
                selector: selector.to_string(),
                index,
            })?;
        element.click().await.map_err(protocol)?;
        Ok(())
    }

    async fn script_click(&mut self, selector: &str, index: usize) -> Result<(), BrowserError> {
        let clicked: bool = self
            .eval(format!(
                "(() => {{ const el = document.querySelectorAll({})[{}]; \
                 if (!el) return false; el.click(); return true; }})()",
                js_string(selector),
                index
            ))
            .await?;
        if clicked {
            Ok(())
        } else {
            Err(BrowserError::ElementNotFound {
                selector: selector.to_string(),
                index,
            })
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.page.clone().close().await {
            debug!("Page close failed: {}", e);
        }
    }
}
