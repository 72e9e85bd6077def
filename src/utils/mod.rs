//! Utility functions shared across modules.

pub mod html;
pub mod numeric;

pub use html::{collapse_whitespace, element_text, resolve_url};
pub use numeric::{parse_count, parse_float, parse_int};
