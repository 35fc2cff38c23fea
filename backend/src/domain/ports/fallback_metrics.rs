//! Port for counting upstream fallbacks.
//!
//! Each time the domain substitutes backup data or canned text for a failed
//! upstream, it records one event here. Implementations may export to
//! Prometheus or discard the events.

use std::fmt;

/// Upstream dependency that was substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Upstream {
    /// Current price from the live feed.
    PriceQuote,
    /// Price history from the live feed.
    PriceHistory,
    /// Language model completion.
    LanguageModel,
}

impl Upstream {
    /// Metric label value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceQuote => "price_quote",
            Self::PriceHistory => "price_history",
            Self::LanguageModel => "language_model",
        }
    }
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What replaced the failed upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackOutcome {
    /// Backup data or canned text was served.
    Substituted,
    /// Nothing could be substituted.
    Exhausted,
}

impl FallbackOutcome {
    /// Metric label value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Substituted => "substituted",
            Self::Exhausted => "exhausted",
        }
    }
}

/// Recorder for fallback events.
#[cfg_attr(test, mockall::automock)]
pub trait FallbackMetrics: Send + Sync {
    /// Record one fallback.
    fn record_fallback(&self, upstream: Upstream, outcome: FallbackOutcome);
}

/// No-op implementation for when metrics are disabled or in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpFallbackMetrics;

impl FallbackMetrics for NoOpFallbackMetrics {
    fn record_fallback(&self, _upstream: Upstream, _outcome: FallbackOutcome) {}
}
