//! Course listing: incremental loading and card harvesting.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::{debug, info};

use super::config::{CompiledSelectors, ScrapeConfig};
use super::session::{best_effort, BrowserError, PageSession};
use crate::models::normalize_country;
use crate::utils::{element_text, parse_count, resolve_url};

/// Splits a card's inline summary into tokens ("KOR · 18H · Par 72").
static SUBTEXT_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[·|/]").expect("separator pattern should compile"));

/// How the incremental load loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    pub rounds: u32,
    pub cards: usize,
    /// True when the round cap stopped the loop while cards were still appearing.
    pub hit_round_cap: bool,
    /// True when a cancellation request ended the loop.
    pub interrupted: bool,
}

/// One course card from the listing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListingCard {
    pub name: String,
    pub url: String,
    pub country: Option<String>,
    pub holes: Option<u32>,
    pub par: Option<u32>,
    pub yardage: Option<u32>,
}

/// Click "load more" and scroll until the card count stops growing.
///
/// Ends after `max_stagnant_rounds` consecutive rounds without new cards, or
/// after `max_rounds` in total. `cancel` is checked before every round.
pub async fn load_all_courses<P>(
    page: &mut P,
    config: &ScrapeConfig,
    cancel: &AtomicBool,
) -> Result<LoadStats, BrowserError>
where
    P: PageSession + ?Sized,
{
    let card_selector = &config.selectors.course_card;
    let mut last_count: Option<usize> = None;
    let mut stagnant = 0;
    let mut rounds = 0;
    let mut count = 0;

    while rounds < config.max_rounds {
        if cancel.load(Ordering::Relaxed) {
            info!("Listing load interrupted after {} rounds", rounds);
            return Ok(LoadStats {
                rounds,
                cards: count,
                hit_round_cap: false,
                interrupted: true,
            });
        }
        rounds += 1;

        if let Some(true) = best_effort("load more", page.click_load_more()).await {
            debug!("Clicked load more (round {})", rounds);
        }
        page.scroll_to_bottom().await?;
        tokio::time::sleep(config.scroll_pause()).await;

        count = page.count(card_selector).await?;
        if last_count.map_or(true, |last| count > last) {
            last_count = Some(count);
            stagnant = 0;
        } else {
            stagnant += 1;
        }
        debug!("Round {}: {} cards ({} stagnant)", rounds, count, stagnant);

        if stagnant >= config.max_stagnant_rounds {
            info!("Listing fully loaded: {} cards after {} rounds", count, rounds);
            return Ok(LoadStats {
                rounds,
                cards: count,
                hit_round_cap: false,
                interrupted: false,
            });
        }
    }

    info!("Stopped loading after {} rounds with {} cards", rounds, count);
    Ok(LoadStats {
        rounds,
        cards: count,
        hit_round_cap: true,
        interrupted: false,
    })
}

/// Extract every course card from rendered listing HTML.
///
/// Cards without a title or link are skipped.
pub fn harvest_cards(html: &str, selectors: &CompiledSelectors, base_url: &str) -> Vec<ListingCard> {
    let document = Html::parse_document(html);
    let mut cards = Vec::new();

    for anchor in document.select(&selectors.course_card) {
        let Some(title) = anchor.select(&selectors.card_title).next() else {
            continue;
        };
        let name = element_text(&title);
        let href = anchor.value().attr("href").map(str::trim).unwrap_or("");
        if name.is_empty() || href.is_empty() {
            continue;
        }

        let mut card = ListingCard {
            name,
            url: resolve_url(base_url, href),
            ..ListingCard::default()
        };
        apply_subtext(&mut card, &subtext_tokens(&anchor, &title, selectors));
        cards.push(card);
    }

    debug!("Harvested {} cards", cards.len());
    cards
}

fn subtext_tokens(
    anchor: &ElementRef<'_>,
    title: &ElementRef<'_>,
    selectors: &CompiledSelectors,
) -> Vec<String> {
    anchor
        .select(&selectors.card_subtext)
        .filter(|span| !span.ancestors().any(|a| a.id() == title.id()))
        .flat_map(|span| {
            SUBTEXT_SEPARATOR
                .split(&element_text(&span))
                .map(|t| t.trim().to_string())
                .collect::<Vec<_>>()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

/// Fill card fields from inline summary tokens.
fn apply_subtext(card: &mut ListingCard, tokens: &[String]) {
    for (i, token) in tokens.iter().enumerate() {
        let lower = token.to_lowercase();
        let has_digits = token.chars().any(|c| c.is_ascii_digit());

        if lower.contains("yd") {
            card.yardage = card.yardage.or_else(|| parse_count(token));
        } else if lower.contains("par") {
            card.par = card.par.or_else(|| parse_count(token));
        } else if token.contains('H') && has_digits {
            card.holes = card.holes.or_else(|| parse_count(token));
        } else if i == 0 && !has_digits {
            card.country = normalize_country(token);
        }
    }
}
