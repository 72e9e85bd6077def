//! Command implementations.

pub mod holes;
pub mod scrape;
pub mod search;
pub mod tees;
