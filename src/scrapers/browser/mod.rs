//! Chromium browser backend for the page session.
//!
//! Uses chromiumoxide (CDP). One browser process serves the whole run; the
//! pipeline opens one page for the listing and one reused page for details.

mod config;
#[cfg(feature = "browser")]
mod page;

pub use config::BrowserEngineConfig;
#[cfg(feature = "browser")]
pub use page::ChromePage;

#[cfg(feature = "browser")]
use std::path::PathBuf;
#[cfg(feature = "browser")]
use std::time::Duration;

#[cfg(feature = "browser")]
use tracing::{debug, info};

#[cfg(feature = "browser")]
use chromiumoxide::{Browser, BrowserConfig};
#[cfg(feature = "browser")]
use futures::StreamExt;

use super::session::{BrowserError, PageSession};

/// A launched or connected Chromium instance.
#[cfg(feature = "browser")]
pub struct ChromiumBrowser {
    browser: Browser,
    handler: tokio::task::JoinHandle<()>,
}

#[cfg(feature = "browser")]
impl ChromiumBrowser {
    /// Common Chrome executable paths to check.
    const CHROME_PATHS: &'static [&'static str] = &[
        // Linux
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
        // macOS
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        // Common install locations
        "/opt/google/chrome/google-chrome",
    ];

    /// Find Chrome executable.
    fn find_chrome() -> Result<PathBuf, BrowserError> {
        for path in Self::CHROME_PATHS {
            let p = std::path::Path::new(path);
            if p.exists() {
                info!("Found Chrome at: {}", path);
                return Ok(p.to_path_buf());
            }
        }

        for cmd in &[
            "google-chrome",
            "google-chrome-stable",
            "chromium",
            "chromium-browser",
        ] {
            if let Ok(path) = which::which(cmd) {
                info!("Found Chrome in PATH: {}", path.display());
                return Ok(path);
            }
        }

        Err(BrowserError::Unavailable(
            "Chrome/Chromium not found. Please install it:\n\
             - Arch/Manjaro: sudo pacman -S chromium\n\
             - Ubuntu/Debian: sudo apt install chromium-browser\n\
             - Fedora: sudo dnf install chromium\n\
             - Or download from: https://www.google.com/chrome/"
                .to_string(),
        ))
    }

    /// Launch a browser, or connect to `config.remote_url` when set.
    pub async fn launch(config: &BrowserEngineConfig) -> Result<Self, BrowserError> {
        if let Some(remote_url) = &config.remote_url {
            return Self::connect_remote(remote_url, config.timeout).await;
        }

        info!("Launching browser (headless={})", config.headless);
        let chrome_path = Self::find_chrome()?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .launch_timeout(Duration::from_secs(config.timeout));

        // with_head means NOT headless
        if !config.headless {
            builder = builder.with_head();
        }

        if let Some(ref proxy) = config.proxy {
            builder = builder.arg(format!("--proxy-server={}", proxy));
        }

        builder = builder
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-infobars")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-sync")
            .arg("--disable-translate")
            .arg("--no-sandbox") // Often needed for headless in containers
            .arg("--disable-gpu");

        for arg in &config.chrome_args {
            builder = builder.arg(arg);
        }

        let browser_config = builder.build().map_err(|e| {
            BrowserError::Unavailable(format!("Failed to build browser config: {}", e))
        })?;

        let (browser, handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| BrowserError::Unavailable(format!("Failed to launch browser: {}", e)))?;

        Ok(Self {
            browser,
            handler: Self::spawn_handler(handler),
        })
    }

    /// Connect to a remote Chrome instance.
    async fn connect_remote(url: &str, timeout_secs: u64) -> Result<Self, BrowserError> {
        info!(
            "Connecting to remote browser at {} (timeout: {}s)",
            url, timeout_secs
        );

        // Get WebSocket URL from the /json/version endpoint
        let http_url = url
            .replace("ws://", "http://")
            .replace("wss://", "https://");
        let version_url = format!("{}/json/version", http_url.trim_end_matches('/'));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| BrowserError::Unavailable(e.to_string()))?;
        let resp: serde_json::Value = client
            .get(&version_url)
            .send()
            .await
            .map_err(|e| {
                BrowserError::Unavailable(format!("Failed to connect to remote browser: {}", e))
            })?
            .json()
            .await
            .map_err(|e| {
                BrowserError::Unavailable(format!("Failed to parse browser version info: {}", e))
            })?;

        let ws_url = resp
            .get("webSocketDebuggerUrl")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                BrowserError::Unavailable("No webSocketDebuggerUrl in response".to_string())
            })?;

        info!("Connecting to WebSocket: {}", ws_url);

        let (browser, handler) = Browser::connect(ws_url).await.map_err(|e| {
            BrowserError::Unavailable(format!("Failed to connect to remote browser: {}", e))
        })?;

        Ok(Self {
            browser,
            handler: Self::spawn_handler(handler),
        })
    }

    fn spawn_handler(mut handler: chromiumoxide::Handler) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        })
    }

    /// Open a blank page.
    pub async fn new_page(&self) -> Result<Box<dyn PageSession>, BrowserError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))?;
        Ok(Box::new(ChromePage::new(page)))
    }

    /// Close the browser. Errors are logged and swallowed.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            debug!("Browser close failed: {}", e);
        }
        let _ = self.browser.wait().await;
        self.handler.abort();
    }
}

// Stub for when browser feature is disabled
#[cfg(not(feature = "browser"))]
pub struct ChromiumBrowser;

#[cfg(not(feature = "browser"))]
impl ChromiumBrowser {
    pub async fn launch(_config: &BrowserEngineConfig) -> Result<Self, BrowserError> {
        Err(BrowserError::Unavailable(
            "Browser support not compiled. Rebuild with: cargo build --features browser"
                .to_string(),
        ))
    }

    pub async fn new_page(&self) -> Result<Box<dyn PageSession>, BrowserError> {
        Err(BrowserError::Unavailable(
            "Browser support not compiled".to_string(),
        ))
    }

    pub async fn close(self) {}
}
