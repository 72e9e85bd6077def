//! Course detail page extraction.
//!
//! Aggregate fields come from the rendered page text. Per-hole data needs
//! the live page: each hole tab is clicked in turn and the panel that
//! appears is parsed from a fresh snapshot of the HTML.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::{debug, warn};

use super::config::{CompiledSelectors, ScrapeConfig};
use super::session::{BrowserError, PageSession};
use super::strategy::StrategyChain;
use crate::models::{Hole, TeeEntry};
use crate::utils::{collapse_whitespace, element_text, parse_count, parse_float, resolve_url};

static HOLES_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*H\b").expect("holes pattern should compile"));
static PAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bPar\s*(\d+)").expect("par pattern should compile"));
static YARDAGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([\d,]+)\s*yd\b").expect("yardage pattern should compile"));
static HOLE_TAB_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\s*H\s*$").expect("tab pattern should compile"));

/// Course-level totals from the detail page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aggregate {
    pub holes: Option<u32>,
    pub par: Option<u32>,
    pub yardage: Option<u32>,
}

impl Aggregate {
    fn is_complete(&self) -> bool {
        self.holes.is_some() && self.par.is_some() && self.yardage.is_some()
    }
}

fn capture_count(pattern: &Regex, text: &str) -> Option<u32> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| parse_count(m.as_str()))
}

/// Extract holes, par and yardage.
///
/// The summary block is scanned first, then the whole page text; each field
/// keeps the first value found.
pub fn extract_aggregate(html: &str, selectors: &CompiledSelectors) -> Aggregate {
    let document = Html::parse_document(html);

    let mut candidates = Vec::with_capacity(2);
    if let Some(block) = document.select(&selectors.summary).next() {
        let spans: Vec<String> = block
            .select(&selectors.summary_span)
            .map(|s| element_text(&s))
            .collect();
        candidates.push(spans.join(" "));
    }
    candidates.push(collapse_whitespace(
        &document.root_element().text().collect::<Vec<_>>().join(" "),
    ));

    let mut aggregate = Aggregate::default();
    for text in &candidates {
        aggregate.holes = aggregate.holes.or_else(|| capture_count(&HOLES_PATTERN, text));
        aggregate.par = aggregate.par.or_else(|| capture_count(&PAR_PATTERN, text));
        aggregate.yardage = aggregate
            .yardage
            .or_else(|| capture_count(&YARDAGE_PATTERN, text));
        if aggregate.is_complete() {
            break;
        }
    }
    aggregate
}

/// Hole number for a tab label like "7H".
pub fn hole_tab_number(label: &str) -> Option<u32> {
    HOLE_TAB_LABEL
        .captures(label)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .filter(|n| *n > 0)
}

/// A tee row plus the selectors needed to read it.
pub struct TeeRow<'a> {
    pub row: ElementRef<'a>,
    pub selectors: &'a CompiledSelectors,
}

impl<'a> TeeRow<'a> {
    /// Direct child cells other than the name cell.
    fn value_cells(&self) -> Vec<ElementRef<'a>> {
        self.row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|cell| {
                !self.selectors.tee_name.matches(cell)
                    && cell.select(&self.selectors.tee_name).next().is_none()
            })
            .collect()
    }
}

fn fixed_width_distance(row: &TeeRow<'_>) -> Option<u32> {
    let cell = row.row.select(&row.selectors.tee_distance).next()?;
    parse_count(&element_text(&cell))
}

fn positional_distance(row: &TeeRow<'_>) -> Option<u32> {
    let cells = row.value_cells();
    parse_count(&element_text(cells.first()?))
}

fn fixed_width_height(row: &TeeRow<'_>) -> Option<f64> {
    let cell = row.row.select(&row.selectors.tee_height).next()?;
    parse_float(&element_text(&cell))
}

fn positional_height(row: &TeeRow<'_>) -> Option<f64> {
    let cells = row.value_cells();
    parse_float(&element_text(cells.get(1)?))
}

fn distance_chain<'a>() -> StrategyChain<TeeRow<'a>, u32> {
    StrategyChain::new("tee distance")
        .then("fixed-width cell", fixed_width_distance)
        .then("positional cell", positional_distance)
}

fn height_chain<'a>() -> StrategyChain<TeeRow<'a>, f64> {
    StrategyChain::new("tee height")
        .then("fixed-width cell", fixed_width_height)
        .then("positional cell", positional_height)
}

/// Parse the currently displayed hole panel.
///
/// Returns `None` when the panel is missing.
pub fn parse_hole_panel(html: &str, selectors: &CompiledSelectors, base_url: &str) -> Option<Hole> {
    let document = Html::parse_document(html);
    let panel = document.select(&selectors.hole_panel).next()?;

    let par = panel
        .select(&selectors.hole_par)
        .next()
        .and_then(|span| parse_count(&element_text(&span)));

    let distance = distance_chain();
    let height = height_chain();
    let tees = panel
        .select(&selectors.tee_row)
        .filter_map(|row| {
            let name = element_text(&row.select(&selectors.tee_name).next()?);
            let row = TeeRow { row, selectors };
            Some(TeeEntry::new(
                name,
                distance.resolve(&row),
                height.resolve(&row),
            ))
        })
        .collect();

    let video = selectors.videos.iter().find_map(|(selector, attr)| {
        panel
            .select(selector)
            .find_map(|el| el.value().attr(attr))
            .map(str::trim)
            .filter(|src| !src.is_empty())
            .map(|src| resolve_url(base_url, src))
    });

    Some(Hole { par, tees, video })
}

/// Click every hole tab on the current detail page and parse its panel.
///
/// A browser error mid-iteration stops the walk; holes gathered so far are
/// returned alongside the error.
pub async fn extract_per_hole<P>(
    page: &mut P,
    config: &ScrapeConfig,
    selectors: &CompiledSelectors,
) -> (BTreeMap<u32, Hole>, Option<BrowserError>)
where
    P: PageSession + ?Sized,
{
    let mut holes = BTreeMap::new();
    let tab_selector = &config.selectors.hole_tabs;

    let labels = match page.texts(tab_selector).await {
        Ok(labels) => labels,
        Err(e) => return (holes, Some(e)),
    };
    if labels.is_empty() {
        debug!("No hole tabs found");
    }

    for (index, label) in labels.iter().enumerate() {
        let Some(number) = hole_tab_number(label) else {
            continue;
        };

        if !select_tab(page, tab_selector, index, config).await {
            warn!("Could not open tab for hole {}; skipping", number);
            continue;
        }
        tokio::time::sleep(config.tab_settle()).await;

        let html = match page.content().await {
            Ok(html) => html,
            Err(e) => return (holes, Some(e)),
        };
        match parse_hole_panel(&html, selectors, &config.base_url) {
            Some(hole) => {
                holes.insert(number, hole);
            }
            None => debug!("Hole {} has no panel", number),
        }
    }

    (holes, None)
}

/// Direct click with a timeout, then a script click as fallback.
async fn select_tab<P>(page: &mut P, selector: &str, index: usize, config: &ScrapeConfig) -> bool
where
    P: PageSession + ?Sized,
{
    match tokio::time::timeout(config.click_wait(), page.click(selector, index)).await {
        Ok(Ok(())) => return true,
        Ok(Err(e)) => debug!("Direct click on tab {} failed: {}", index, e),
        Err(_) => debug!("Direct click on tab {} timed out", index),
    }
    match page.script_click(selector, index).await {
        Ok(()) => true,
        Err(e) => {
            debug!("Script click on tab {} failed: {}", index, e);
            false
        }
    }
}
