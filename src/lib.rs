//! golfacquire - golf course metadata acquisition and search.
//!
//! Scrapes course, hole and tee data from the Golfzon course listing with a
//! headless Chromium session, stores it as a JSON dataset, and provides
//! filtering and tee-total tools over that dataset.

pub mod cli;
pub mod config;
pub mod models;
pub mod scrapers;
pub mod search;
pub mod storage;
pub mod utils;
