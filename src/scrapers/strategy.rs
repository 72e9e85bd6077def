//! Ordered fallback strategies for selector-based extraction.
//!
//! Scraped markup is not stable, so most fields have a primary selector and
//! one or more heuristic fallbacks. A chain tries each named strategy in
//! order and keeps the first hit.

use tracing::trace;

/// A named extraction attempt.
pub type StrategyFn<I, T> = fn(&I) -> Option<T>;

/// Ordered list of extraction strategies for one field.
pub struct StrategyChain<I, T> {
    field: &'static str,
    strategies: Vec<(&'static str, StrategyFn<I, T>)>,
}

impl<I, T> StrategyChain<I, T> {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            strategies: Vec::new(),
        }
    }

    /// Append a strategy; earlier strategies take priority.
    pub fn then(mut self, name: &'static str, strategy: StrategyFn<I, T>) -> Self {
        self.strategies.push((name, strategy));
        self
    }

    /// Value and strategy name of the first success.
    pub fn resolve_named(&self, input: &I) -> Option<(&'static str, T)> {
        for (name, strategy) in &self.strategies {
            if let Some(value) = strategy(input) {
                trace!("{}: resolved by {}", self.field, name);
                return Some((name, value));
            }
        }
        trace!("{}: no strategy matched", self.field);
        None
    }

    /// Value of the first success.
    pub fn resolve(&self, input: &I) -> Option<T> {
        self.resolve_named(input).map(|(_, value)| value)
    }
}
