//! Prometheus adapter for upstream fallback metrics.
//!
//! Registers one counter with the server's registry so it is exposed on the
//! `/metrics` endpoint next to the request metrics.

use prometheus::{IntCounterVec, Opts, Registry};

use crate::domain::ports::{FallbackMetrics, FallbackOutcome, Upstream};

/// Prometheus-backed fallback recorder.
///
/// # Exported metric
///
/// - **Name**: `kuber_upstream_fallbacks_total`
/// - **Type**: Counter
/// - **Labels**:
///   - `upstream`: `price_quote`, `price_history` or `language_model`
///   - `outcome`: `substituted` or `exhausted`
pub struct PrometheusFallbackMetrics {
    fallbacks_total: IntCounterVec,
}

impl PrometheusFallbackMetrics {
    /// Create and register the counter with the given registry.
    ///
    /// # Errors
    ///
    /// Returns an error if a metric with the same name is already registered.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let fallbacks_total = IntCounterVec::new(
            Opts::new(
                "kuber_upstream_fallbacks_total",
                "Upstream calls answered from backup data or canned text",
            ),
            &["upstream", "outcome"],
        )?;
        registry.register(Box::new(fallbacks_total.clone()))?;
        Ok(Self { fallbacks_total })
    }
}

impl FallbackMetrics for PrometheusFallbackMetrics {
    fn record_fallback(&self, upstream: Upstream, outcome: FallbackOutcome) {
        self.fallbacks_total
            .with_label_values(&[upstream.as_str(), outcome.as_str()])
            .inc();
    }
}
