//! Navigation with bounded retry on transient network failures.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use super::session::PageSession;

/// Why a navigation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationFailure {
    /// Host name could not be resolved.
    DnsFailure,
    /// Connection reset by peer.
    ConnectionReset,
    /// Connection closed before a response.
    ConnectionClosed,
    /// Network or address unreachable.
    AddressUnreachable,
    /// Navigation or connection timed out.
    Timeout,
    /// Anything else: bad URL, TLS, HTTP-level aborts, browser gone.
    Permanent,
}

impl NavigationFailure {
    /// Whether a retry can reasonably succeed.
    pub fn is_transient(self) -> bool {
        !matches!(self, NavigationFailure::Permanent)
    }

    /// Classify a Chromium network error code such as `net::ERR_NAME_NOT_RESOLVED`.
    pub fn from_net_error(code: &str) -> Self {
        let code = code.trim();
        let code = code.strip_prefix("net::").unwrap_or(code);
        match code {
            "ERR_NAME_NOT_RESOLVED" | "ERR_NAME_RESOLUTION_FAILED" => Self::DnsFailure,
            "ERR_CONNECTION_RESET" | "ERR_NETWORK_CHANGED" => Self::ConnectionReset,
            "ERR_CONNECTION_CLOSED" | "ERR_EMPTY_RESPONSE" => Self::ConnectionClosed,
            "ERR_ADDRESS_UNREACHABLE" | "ERR_NETWORK_UNREACHABLE" | "ERR_INTERNET_DISCONNECTED" => {
                Self::AddressUnreachable
            }
            "ERR_TIMED_OUT" | "ERR_CONNECTION_TIMED_OUT" => Self::Timeout,
            _ => Self::Permanent,
        }
    }
}

impl fmt::Display for NavigationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NavigationFailure::DnsFailure => "DNS resolution failed",
            NavigationFailure::ConnectionReset => "connection reset",
            NavigationFailure::ConnectionClosed => "connection closed",
            NavigationFailure::AddressUnreachable => "address unreachable",
            NavigationFailure::Timeout => "timed out",
            NavigationFailure::Permanent => "navigation failed",
        };
        f.write_str(label)
    }
}

/// A failed navigation to `url`.
#[derive(Debug, Clone, Error)]
#[error("{kind} for {url}: {detail}")]
pub struct NavigationError {
    pub url: String,
    pub kind: NavigationFailure,
    pub detail: String,
}

impl NavigationError {
    pub fn new(url: &str, kind: NavigationFailure, detail: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            kind,
            detail: detail.into(),
        }
    }

    pub fn timeout(url: &str, after: Duration) -> Self {
        Self::new(
            url,
            NavigationFailure::Timeout,
            format!("no response after {}s", after.as_secs()),
        )
    }

    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }
}

/// Retry policy for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Backoff before retry `n` is `n * backoff_unit`.
    pub backoff_unit: Duration,
    /// Per-attempt navigation timeout.
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_unit: Duration::from_secs(2),
            timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Delay before the given retry (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_unit.saturating_mul(attempt)
    }
}

/// Navigate `page` to `url`, retrying transient failures with linear backoff.
pub async fn navigate_with_retry<P>(
    page: &mut P,
    url: &str,
    policy: &RetryPolicy,
) -> Result<(), NavigationError>
where
    P: PageSession + ?Sized,
{
    let mut attempt: u32 = 0;
    loop {
        match page.navigate(url, policy.timeout).await {
            Ok(()) => return Ok(()),
            Err(e) if e.is_transient() && attempt < policy.max_retries => {
                attempt += 1;
                let delay = policy.backoff(attempt);
                warn!(
                    "{} (retry {}/{} in {:?})",
                    e, attempt, policy.max_retries, delay
                );
                tokio::time::sleep(delay).await;
                info!("Retrying {}", url);
            }
            Err(e) => return Err(e),
        }
    }
}
