//! Data models for scraped golf courses.

mod country;
mod course;

pub use country::{country_name, normalize_country, COUNTRY_CODES};
pub use course::{Course, Hole, TeeEntry};
