//! End-to-end scrape pipeline tests over a synthetic page session.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use common::{
    card, course_url, hole_panel, summary, test_config, ClickKind, FakeDocument, FakePage,
    LoadMore, TabFault, LISTING_URL,
};
use golfacquire::scrapers::listing::load_all_courses;
use golfacquire::scrapers::{
    scrape_courses, CourseOutcome, NavigationFailure, PageSession, ProgressCallback, ScrapeError,
    ScrapeEvent,
};
use golfacquire::search::tee_totals;
use golfacquire::storage::{load_courses, save_courses};

fn listing(cards: Vec<String>) -> FakeDocument {
    FakeDocument::Listing {
        initial: 1,
        batch: 1,
        cards,
    }
}

fn numbered_cards(n: usize) -> Vec<String> {
    (0..n).map(|i| card(&i.to_string(), "Course", "KOR")).collect()
}

fn three_hole_course() -> FakeDocument {
    let panel = hole_panel(4, &[("Blue", 300), ("White", 280)]);
    FakeDocument::Detail {
        summary: summary(3, 12, "900"),
        tabs: vec!["1H".into(), "2H".into(), "3H".into()],
        panels: vec![panel.clone(), panel.clone(), panel],
        break_at_tab: None,
    }
}

fn no_tab_course() -> FakeDocument {
    FakeDocument::Detail {
        summary: summary(18, 72, "6,400"),
        tabs: Vec::new(),
        panels: Vec::new(),
        break_at_tab: None,
    }
}

fn two_course_site() -> (FakePage, FakePage) {
    let listing_page = FakePage::new().serve(
        LISTING_URL,
        listing(vec![
            card("a", "Alpha Hills", "KOR · 3H · Par 10"),
            card("b", "Bravo Links", "JPN"),
        ]),
    );
    let detail_page = FakePage::new()
        .serve(&course_url("a"), three_hole_course())
        .serve(&course_url("b"), no_tab_course());
    (listing_page, detail_page)
}

#[tokio::test(start_paused = true)]
async fn test_two_course_scrape_and_save() {
    let (mut listing_page, mut detail_page) = two_course_site();
    let cancel = AtomicBool::new(false);

    let report = scrape_courses(
        &mut listing_page,
        &mut detail_page,
        &test_config(),
        None,
        &cancel,
        None,
    )
    .await
    .unwrap();

    assert!(!report.interrupted);
    assert_eq!(report.cards_found, 2);
    assert_eq!(report.failures, 0);
    assert_eq!(report.courses.len(), 2);

    let a = &report.courses[0];
    assert_eq!(a.name, "Alpha Hills");
    assert_eq!(a.url, course_url("a"));
    assert_eq!(a.country.as_deref(), Some("South Korea"));
    assert_eq!(a.holes, Some(3));
    // Detail values win over the listing's "Par 10".
    assert_eq!(a.par, Some(12));
    assert_eq!(a.yardage, Some(900));
    assert_eq!(a.per_hole.len(), 3);
    assert_eq!(a.hole(2).unwrap().par, Some(4));

    let totals = tee_totals(a);
    assert_eq!(totals.get("Blue"), Some(&900));
    assert_eq!(totals.get("White"), Some(&840));

    let b = &report.courses[1];
    assert_eq!(b.name, "Bravo Links");
    assert_eq!(b.country.as_deref(), Some("Japan"));
    assert_eq!(b.holes, Some(18));
    assert!(b.per_hole.is_empty());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("golf_courses.json");
    save_courses(&path, &report.courses).unwrap();
    assert_eq!(load_courses(&path).unwrap(), report.courses);
}

#[tokio::test(start_paused = true)]
async fn test_loader_stops_after_stagnant_rounds() {
    let cards = numbered_cards(3);
    let mut page = FakePage::new().serve(
        LISTING_URL,
        FakeDocument::Listing {
            cards,
            initial: 3,
            batch: 0,
        },
    );
    let config = test_config();
    page.navigate(LISTING_URL, config.retry_policy().timeout)
        .await
        .unwrap();

    let stats = load_all_courses(&mut page, &config, &AtomicBool::new(false)).await.unwrap();
    assert_eq!(stats.cards, 3);
    assert_eq!(stats.rounds, 1 + config.max_stagnant_rounds);
    assert!(!stats.hit_round_cap);
}

#[tokio::test(start_paused = true)]
async fn test_loader_stops_at_round_cap() {
    let cards = numbered_cards(100);
    let mut page = FakePage::new().serve(
        LISTING_URL,
        FakeDocument::Listing {
            cards,
            initial: 0,
            batch: 1,
        },
    );
    let mut config = test_config();
    config.max_rounds = 5;
    page.navigate(LISTING_URL, config.retry_policy().timeout)
        .await
        .unwrap();

    let stats = load_all_courses(&mut page, &config, &AtomicBool::new(false)).await.unwrap();
    assert_eq!(stats.rounds, 5);
    assert_eq!(stats.cards, 5);
    assert!(stats.hit_round_cap);
    assert_eq!(page.scrolls, 5);
}

#[tokio::test(start_paused = true)]
async fn test_loader_keeps_going_while_load_more_reveals() {
    let mut page = FakePage::new()
        .serve(
            LISTING_URL,
            FakeDocument::Listing {
                cards: numbered_cards(6),
                initial: 0,
                batch: 1,
            },
        )
        .with_load_more(LoadMore::Reveals);
    let config = test_config();
    page.navigate(LISTING_URL, config.retry_policy().timeout)
        .await
        .unwrap();

    let stats = load_all_courses(&mut page, &config, &AtomicBool::new(false)).await.unwrap();

    // Each round reveals one card by click and one by scroll.
    assert_eq!(stats.cards, 6);
    assert_eq!(stats.rounds, 3 + config.max_stagnant_rounds);
    assert_eq!(page.load_more_clicks, 3);
    assert!(!stats.hit_round_cap);
    assert!(!stats.interrupted);
}

#[tokio::test(start_paused = true)]
async fn test_loader_survives_broken_load_more() {
    let mut page = FakePage::new()
        .serve(
            LISTING_URL,
            FakeDocument::Listing {
                cards: numbered_cards(3),
                initial: 0,
                batch: 1,
            },
        )
        .with_load_more(LoadMore::Broken);
    let config = test_config();
    page.navigate(LISTING_URL, config.retry_policy().timeout)
        .await
        .unwrap();

    let stats = load_all_courses(&mut page, &config, &AtomicBool::new(false)).await.unwrap();

    assert_eq!(stats.cards, 3);
    assert_eq!(stats.rounds, 3 + config.max_stagnant_rounds);
    assert_eq!(page.scrolls, stats.rounds as usize);
    assert!(!stats.hit_round_cap);
}

#[tokio::test(start_paused = true)]
async fn test_loader_stops_when_cancelled_mid_load() {
    let cancel = Arc::new(AtomicBool::new(false));
    let mut page = FakePage::new()
        .serve(
            LISTING_URL,
            FakeDocument::Listing {
                cards: numbered_cards(200),
                initial: 0,
                batch: 1,
            },
        )
        .cancel_on_scroll(2, cancel.clone());
    let config = test_config();
    page.navigate(LISTING_URL, config.retry_policy().timeout)
        .await
        .unwrap();

    let stats = load_all_courses(&mut page, &config, &cancel).await.unwrap();

    assert!(stats.interrupted);
    assert!(!stats.hit_round_cap);
    assert_eq!(stats.rounds, 2);
    assert_eq!(stats.cards, 2);
    assert_eq!(page.scrolls, 2);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_before_listing_load_visits_nothing() {
    let mut listing_page = FakePage::new().serve(
        LISTING_URL,
        FakeDocument::Listing {
            cards: numbered_cards(200),
            initial: 0,
            batch: 1,
        },
    );
    let mut detail_page = FakePage::new();
    let cancel = AtomicBool::new(true);

    let report = scrape_courses(
        &mut listing_page,
        &mut detail_page,
        &test_config(),
        None,
        &cancel,
        None,
    )
    .await
    .unwrap();

    assert!(report.interrupted);
    assert!(report.courses.is_empty());
    assert!(!report.should_save());
    assert!(listing_page.scrolls < 5, "ran {} scroll rounds", listing_page.scrolls);
    assert!(detail_page.navigations.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_tab_click_falls_back_and_skips_dead_tabs() {
    let mut listing_page =
        FakePage::new().serve(LISTING_URL, listing(vec![card("a", "Alpha Hills", "KOR")]));
    let mut detail_page = FakePage::new()
        .serve(&course_url("a"), three_hole_course())
        .tab_fault(0, TabFault::HangClick)
        .tab_fault(1, TabFault::Unclickable);
    let config = test_config();
    let cancel = AtomicBool::new(false);
    let events = Arc::new(Mutex::new(Vec::new()));
    let progress: ProgressCallback = {
        let events = events.clone();
        Arc::new(move |event: ScrapeEvent| events.lock().unwrap().push(event))
    };

    let started = tokio::time::Instant::now();
    let report = scrape_courses(
        &mut listing_page,
        &mut detail_page,
        &config,
        None,
        &cancel,
        Some(progress),
    )
    .await
    .unwrap();

    // The hung click only gives way once the click timeout elapses.
    assert!(started.elapsed() >= config.click_wait());
    assert_eq!(
        detail_page.clicks,
        vec![(ClickKind::Script, 0), (ClickKind::Direct, 2)]
    );

    assert_eq!(report.courses.len(), 1);
    assert_eq!(report.failures, 0);
    assert_eq!(report.partial, 0);
    let course = &report.courses[0];
    assert_eq!(course.name, "Alpha Hills");
    assert_eq!(course.per_hole.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(tee_totals(course).get("Blue"), Some(&600));

    let events = events.lock().unwrap();
    assert!(matches!(
        events.last(),
        Some(ScrapeEvent::CourseDone {
            outcome: CourseOutcome::Scraped { holes: 2 },
            ..
        })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_failed_direct_click_uses_script_click() {
    let mut listing_page =
        FakePage::new().serve(LISTING_URL, listing(vec![card("a", "Alpha Hills", "KOR")]));
    let mut detail_page = FakePage::new()
        .serve(&course_url("a"), three_hole_course())
        .tab_fault(1, TabFault::FailClick);
    let cancel = AtomicBool::new(false);

    let report = scrape_courses(
        &mut listing_page,
        &mut detail_page,
        &test_config(),
        None,
        &cancel,
        None,
    )
    .await
    .unwrap();

    assert_eq!(
        detail_page.clicks,
        vec![
            (ClickKind::Direct, 0),
            (ClickKind::Script, 1),
            (ClickKind::Direct, 2)
        ]
    );
    assert_eq!(report.courses[0].per_hole.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_limit_truncates_card_list() {
    let (mut listing_page, mut detail_page) = two_course_site();
    let cancel = AtomicBool::new(false);

    let report = scrape_courses(
        &mut listing_page,
        &mut detail_page,
        &test_config(),
        Some(1),
        &cancel,
        None,
    )
    .await
    .unwrap();

    assert_eq!(report.cards_found, 2);
    assert_eq!(report.courses.len(), 1);
    assert_eq!(detail_page.navigations, vec![course_url("a")]);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_before_next_course() {
    let (mut listing_page, mut detail_page) = two_course_site();
    let cancel = Arc::new(AtomicBool::new(false));
    let events = Arc::new(Mutex::new(Vec::new()));

    let progress: ProgressCallback = {
        let cancel = cancel.clone();
        let events = events.clone();
        Arc::new(move |event: ScrapeEvent| {
            if matches!(event, ScrapeEvent::CourseDone { index: 1, .. }) {
                cancel.store(true, Ordering::Relaxed);
            }
            events.lock().unwrap().push(event);
        })
    };

    let report = scrape_courses(
        &mut listing_page,
        &mut detail_page,
        &test_config(),
        None,
        &cancel,
        Some(progress),
    )
    .await
    .unwrap();

    assert!(report.interrupted);
    assert!(report.should_save());
    assert_eq!(report.courses.len(), 1);
    assert_eq!(report.courses[0].name, "Alpha Hills");

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0], ScrapeEvent::ListingLoaded { cards: 2, total: 2 });
    assert!(matches!(
        events[1],
        ScrapeEvent::CourseDone {
            index: 1,
            total: 2,
            outcome: CourseOutcome::Scraped { holes: 3 },
            ..
        }
    ));
}

#[tokio::test(start_paused = true)]
async fn test_navigation_failure_keeps_listing_fields() {
    let mut listing_page = FakePage::new().serve(
        LISTING_URL,
        listing(vec![
            card("a", "Alpha Hills", "KOR · 3H"),
            card("b", "Bravo Links", "JPN · 18H · Par 72 · 6,400 yd"),
        ]),
    );
    let mut detail_page = FakePage::new()
        .serve(&course_url("a"), three_hole_course())
        .fail(&course_url("b"), NavigationFailure::DnsFailure);
    let config = test_config();
    let cancel = AtomicBool::new(false);

    let report = scrape_courses(&mut listing_page, &mut detail_page, &config, None, &cancel, None)
        .await
        .unwrap();

    assert_eq!(report.courses.len(), 2);
    assert_eq!(report.failures, 1);

    let b = &report.courses[1];
    assert_eq!(b.country.as_deref(), Some("Japan"));
    assert_eq!(b.holes, Some(18));
    assert_eq!(b.par, Some(72));
    assert_eq!(b.yardage, Some(6400));
    assert!(b.per_hole.is_empty());

    let attempts = detail_page
        .navigations
        .iter()
        .filter(|url| **url == course_url("b"))
        .count();
    assert_eq!(attempts, 1 + config.max_retries as usize);
}

#[tokio::test(start_paused = true)]
async fn test_permanent_failure_is_not_retried() {
    let mut listing_page = FakePage::new().serve(
        LISTING_URL,
        listing(vec![card("gone", "Gone Course", "KOR")]),
    );
    let mut detail_page =
        FakePage::new().fail(&course_url("gone"), NavigationFailure::Permanent);
    let cancel = AtomicBool::new(false);

    let report = scrape_courses(
        &mut listing_page,
        &mut detail_page,
        &test_config(),
        None,
        &cancel,
        None,
    )
    .await
    .unwrap();

    assert_eq!(report.failures, 1);
    assert_eq!(detail_page.navigations.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_browser_error_keeps_partial_holes() {
    let mut listing_page =
        FakePage::new().serve(LISTING_URL, listing(vec![card("a", "Alpha Hills", "KOR")]));
    let panel = hole_panel(4, &[("Blue", 300)]);
    let mut detail_page = FakePage::new().serve(
        &course_url("a"),
        FakeDocument::Detail {
            summary: summary(3, 12, "900"),
            tabs: vec!["1H".into(), "2H".into(), "3H".into()],
            panels: vec![panel.clone(), panel.clone(), panel],
            break_at_tab: Some(2),
        },
    );
    let cancel = AtomicBool::new(false);

    let report = scrape_courses(
        &mut listing_page,
        &mut detail_page,
        &test_config(),
        None,
        &cancel,
        None,
    )
    .await
    .unwrap();

    assert_eq!(report.partial, 1);
    let course = &report.courses[0];
    assert_eq!(course.per_hole.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(tee_totals(course).get("Blue"), Some(&600));
}

#[tokio::test(start_paused = true)]
async fn test_holes_beyond_count_are_dropped() {
    let mut listing_page =
        FakePage::new().serve(LISTING_URL, listing(vec![card("a", "Alpha Hills", "KOR")]));
    let panel = hole_panel(3, &[("Red", 120)]);
    let mut detail_page = FakePage::new().serve(
        &course_url("a"),
        FakeDocument::Detail {
            summary: summary(2, 6, "240"),
            tabs: vec!["1H".into(), "2H".into(), "OUT".into(), "3H".into()],
            panels: vec![panel.clone(), panel.clone(), String::new(), panel],
            break_at_tab: None,
        },
    );
    let cancel = AtomicBool::new(false);

    let report = scrape_courses(
        &mut listing_page,
        &mut detail_page,
        &test_config(),
        None,
        &cancel,
        None,
    )
    .await
    .unwrap();

    let course = &report.courses[0];
    assert_eq!(course.holes, Some(2));
    assert_eq!(course.per_hole.len(), 2);
    assert!(course.hole(3).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_missing_listing_container_aborts() {
    let mut listing_page = FakePage::new().serve(LISTING_URL, no_tab_course());
    let mut detail_page = FakePage::new();
    let cancel = AtomicBool::new(false);

    let err = scrape_courses(
        &mut listing_page,
        &mut detail_page,
        &test_config(),
        None,
        &cancel,
        None,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ScrapeError::ListingNotFound { .. }));
    assert!(detail_page.navigations.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_unreachable_listing_aborts() {
    let mut listing_page = FakePage::new().fail(LISTING_URL, NavigationFailure::Permanent);
    let mut detail_page = FakePage::new();
    let cancel = AtomicBool::new(false);

    let err = scrape_courses(
        &mut listing_page,
        &mut detail_page,
        &test_config(),
        None,
        &cancel,
        None,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ScrapeError::Navigation(_)));
}

#[tokio::test(start_paused = true)]
async fn test_empty_listing_yields_empty_dataset() {
    let mut listing_page = FakePage::new().serve(LISTING_URL, listing(Vec::new()));
    let mut detail_page = FakePage::new();
    let cancel = AtomicBool::new(false);

    // An empty container still renders, so the run continues with no cards.
    let report = scrape_courses(
        &mut listing_page,
        &mut detail_page,
        &test_config(),
        None,
        &cancel,
        None,
    )
    .await
    .unwrap();

    assert_eq!(report.cards_found, 0);
    assert!(report.courses.is_empty());
}
