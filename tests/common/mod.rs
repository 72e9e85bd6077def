//! Synthetic page session for driving the scrape pipeline without a browser.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};

use golfacquire::scrapers::{
    BrowserError, NavigationError, NavigationFailure, PageSession, ScrapeConfig,
};

pub const BASE_URL: &str = "https://golf.test";
pub const LISTING_URL: &str = "https://golf.test/courses/about-course";

/// Scrape config pointed at the synthetic site.
pub fn test_config() -> ScrapeConfig {
    ScrapeConfig {
        listing_url: LISTING_URL.to_string(),
        base_url: BASE_URL.to_string(),
        ..ScrapeConfig::default()
    }
}

/// A page the fake site can serve.
#[derive(Debug, Clone)]
pub enum FakeDocument {
    /// Listing that reveals `batch` more cards on every scroll.
    Listing {
        cards: Vec<String>,
        initial: usize,
        batch: usize,
    },
    /// Course page with hole tabs; clicking tab `i` shows `panels[i]`.
    Detail {
        summary: String,
        tabs: Vec<String>,
        panels: Vec<String>,
        /// Reading content fails once this tab index is active.
        break_at_tab: Option<usize>,
    },
}

/// How the listing's "load more" control behaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadMore {
    /// No control on the page.
    #[default]
    Absent,
    /// Clicking reveals another batch while cards remain hidden.
    Reveals,
    /// Every click attempt errors.
    Broken,
}

/// How clicks on a given hole tab misbehave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabFault {
    /// The direct click never completes; the script click works.
    HangClick,
    /// The direct click errors; the script click works.
    FailClick,
    /// Both the direct and the script click error.
    Unclickable,
}

/// Which click path opened a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    Direct,
    Script,
}

/// In-memory page session.
#[derive(Debug, Default)]
pub struct FakePage {
    documents: HashMap<String, FakeDocument>,
    failures: HashMap<String, NavigationFailure>,
    tab_faults: HashMap<usize, TabFault>,
    load_more: LoadMore,
    cancel_on_scroll: Option<(usize, Arc<AtomicBool>)>,
    current: Option<String>,
    visible_cards: usize,
    active_tab: Option<usize>,
    pub navigations: Vec<String>,
    pub scrolls: usize,
    pub load_more_clicks: usize,
    pub clicks: Vec<(ClickKind, usize)>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(mut self, url: &str, document: FakeDocument) -> Self {
        self.documents.insert(url.to_string(), document);
        self
    }

    /// Every navigation to `url` fails with `kind`.
    pub fn fail(mut self, url: &str, kind: NavigationFailure) -> Self {
        self.failures.insert(url.to_string(), kind);
        self
    }

    pub fn with_load_more(mut self, load_more: LoadMore) -> Self {
        self.load_more = load_more;
        self
    }

    /// Clicks on tab `index` misbehave as `fault` describes.
    pub fn tab_fault(mut self, index: usize, fault: TabFault) -> Self {
        self.tab_faults.insert(index, fault);
        self
    }

    /// Set `flag` once the `n`-th scroll happens, like a Ctrl-C mid-load.
    pub fn cancel_on_scroll(mut self, n: usize, flag: Arc<AtomicBool>) -> Self {
        self.cancel_on_scroll = Some((n, flag));
        self
    }

    fn hidden_cards(&self) -> bool {
        matches!(
            self.document(),
            Some(FakeDocument::Listing { cards, .. }) if self.visible_cards < cards.len()
        )
    }

    fn check_tab(&self, selector: &str, index: usize) -> Result<(), BrowserError> {
        if index >= self.select_count(selector)? {
            return Err(BrowserError::ElementNotFound {
                selector: selector.to_string(),
                index,
            });
        }
        Ok(())
    }

    fn document(&self) -> Option<&FakeDocument> {
        self.current.as_ref().and_then(|url| self.documents.get(url))
    }

    fn render(&self) -> Result<String, BrowserError> {
        let body = match self.document() {
            None => String::new(),
            Some(FakeDocument::Listing { cards, .. }) => {
                let shown = self.visible_cards.min(cards.len());
                format!(
                    r#"<div id="search-course-body">{}</div>"#,
                    cards[..shown].concat()
                )
            }
            Some(FakeDocument::Detail {
                summary,
                tabs,
                panels,
                break_at_tab,
            }) => {
                if let (Some(active), Some(limit)) = (self.active_tab, *break_at_tab) {
                    if active >= limit {
                        return Err(BrowserError::Protocol("target closed".into()));
                    }
                }
                let tab_html: String = tabs.iter().map(|t| format!("<div>{}</div>", t)).collect();
                let panel = self
                    .active_tab
                    .and_then(|i| panels.get(i))
                    .cloned()
                    .unwrap_or_default();
                format!(
                    r#"{summary}<div class="tabs-scroll">{tab_html}</div>{panel}"#
                )
            }
        };
        Ok(format!("<html><body>{}</body></html>", body))
    }

    fn select_count(&self, selector: &str) -> Result<usize, BrowserError> {
        let html = self.render()?;
        let selector =
            Selector::parse(selector).map_err(|e| BrowserError::Script(format!("{:?}", e)))?;
        Ok(Html::parse_document(&html).select(&selector).count())
    }

    fn reveal_more(&mut self) {
        let next = match self.document() {
            Some(FakeDocument::Listing { cards, batch, .. }) => {
                (self.visible_cards + batch).min(cards.len())
            }
            _ => return,
        };
        self.visible_cards = next;
    }
}

#[async_trait]
impl PageSession for FakePage {
    async fn navigate(&mut self, url: &str, _timeout: Duration) -> Result<(), NavigationError> {
        self.navigations.push(url.to_string());
        if let Some(kind) = self.failures.get(url) {
            return Err(NavigationError::new(url, *kind, "synthetic failure"));
        }
        if !self.documents.contains_key(url) {
            return Err(NavigationError::new(
                url,
                NavigationFailure::Permanent,
                "net::ERR_ABORTED",
            ));
        }
        self.current = Some(url.to_string());
        self.active_tab = None;
        self.visible_cards = match self.document() {
            Some(FakeDocument::Listing { initial, .. }) => *initial,
            _ => 0,
        };
        Ok(())
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        self.render()
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        _timeout: Duration,
    ) -> Result<bool, BrowserError> {
        Ok(self.select_count(selector)? > 0)
    }

    async fn count(&mut self, selector: &str) -> Result<usize, BrowserError> {
        self.select_count(selector)
    }

    async fn click_load_more(&mut self) -> Result<bool, BrowserError> {
        match self.load_more {
            LoadMore::Absent => Ok(false),
            LoadMore::Broken => Err(BrowserError::Script("element is detached".into())),
            LoadMore::Reveals => {
                if !self.hidden_cards() {
                    return Ok(false);
                }
                self.load_more_clicks += 1;
                self.reveal_more();
                Ok(true)
            }
        }
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), BrowserError> {
        self.scrolls += 1;
        self.reveal_more();
        if let Some((n, ref flag)) = self.cancel_on_scroll {
            if self.scrolls >= n {
                flag.store(true, Ordering::Relaxed);
            }
        }
        Ok(())
    }

    async fn texts(&mut self, selector: &str) -> Result<Vec<String>, BrowserError> {
        let html = self.render()?;
        let selector =
            Selector::parse(selector).map_err(|e| BrowserError::Script(format!("{:?}", e)))?;
        Ok(Html::parse_document(&html)
            .select(&selector)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .collect())
    }

    async fn click(&mut self, selector: &str, index: usize) -> Result<(), BrowserError> {
        self.check_tab(selector, index)?;
        match self.tab_faults.get(&index) {
            Some(TabFault::HangClick) => std::future::pending::<()>().await,
            Some(TabFault::FailClick) | Some(TabFault::Unclickable) => {
                return Err(BrowserError::Protocol("element is not clickable".into()));
            }
            None => {}
        }
        self.clicks.push((ClickKind::Direct, index));
        self.active_tab = Some(index);
        Ok(())
    }

    async fn script_click(&mut self, selector: &str, index: usize) -> Result<(), BrowserError> {
        self.check_tab(selector, index)?;
        if self.tab_faults.get(&index) == Some(&TabFault::Unclickable) {
            return Err(BrowserError::Script("click handler threw".into()));
        }
        self.clicks.push((ClickKind::Script, index));
        self.active_tab = Some(index);
        Ok(())
    }

    async fn close(&mut self) {
        self.current = None;
    }
}

/// Listing card markup.
pub fn card(slug: &str, name: &str, subtext: &str) -> String {
    format!(
        r#"<a href="/courses/{slug}"><h4>{name}</h4><span>{subtext}</span></a>"#
    )
}

/// Hole panel with one row per `(tee, distance)`.
pub fn hole_panel(par: u32, tees: &[(&str, u32)]) -> String {
    let rows: String = tees
        .iter()
        .map(|(tee, distance)| {
            format!(
                r#"<div class="flex items-center justify-between border-b">
                     <div class="gz-text-md">{tee}</div>
                     <div class="w-[78px]">{distance} yd</div>
                     <div class="w-[92px]">0</div>
                   </div>"#
            )
        })
        .collect();
    format!(r#"<div class="block"><span class="gz-text-xsm">PAR {par}</span>{rows}</div>"#)
}

/// Course summary block.
pub fn summary(holes: u32, par: u32, yards: &str) -> String {
    format!(
        r#"<div class="span-space--dot"><span>{holes}H</span><span>Par {par}</span><span>{yards} yd</span></div>"#
    )
}

pub fn course_url(slug: &str) -> String {
    format!("{}/courses/{}", BASE_URL, slug)
}
