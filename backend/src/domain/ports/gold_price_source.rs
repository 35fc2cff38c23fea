//! Driven port for the live gold price feed.
//!
//! Every error variant means "live data unavailable" to the domain; the
//! distinction only matters for logs and metrics.

use async_trait::async_trait;

use crate::domain::PriceSnapshot;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while calling the live price feed.
    pub enum GoldPriceSourceError {
        /// No API credentials were configured.
        NotConfigured => "gold price feed is not configured",
        /// Network transport failed before receiving a response.
        Transport { message: String } => "gold price transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } => "gold price request timed out: {message}",
        /// The provider rate-limited the request.
        RateLimited { message: String } => "gold price feed rate limited request: {message}",
        /// The provider refused the request (bad token, bad symbol).
        Rejected { message: String } => "gold price feed rejected request: {message}",
        /// The response body could not be decoded into prices.
        Decode { message: String } => "gold price response could not be decoded: {message}",
    }
}

/// Live INR-per-gram price feed for 24k gold.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GoldPriceSource: Send + Sync {
    /// Current price per gram.
    async fn current_price(&self) -> Result<f64, GoldPriceSourceError>;

    /// Daily prices over the last `days` days, in any order.
    async fn price_history(&self, days: u32) -> Result<Vec<PriceSnapshot>, GoldPriceSourceError>;
}

/// Source used when no API key is configured; every call reports
/// [`GoldPriceSourceError::NotConfigured`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledGoldPriceSource;

#[async_trait]
impl GoldPriceSource for DisabledGoldPriceSource {
    async fn current_price(&self) -> Result<f64, GoldPriceSourceError> {
        Err(GoldPriceSourceError::not_configured())
    }

    async fn price_history(&self, _days: u32) -> Result<Vec<PriceSnapshot>, GoldPriceSourceError> {
        Err(GoldPriceSourceError::not_configured())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn disabled_source_never_returns_prices() {
        let source = DisabledGoldPriceSource;

        assert_eq!(
            source.current_price().await,
            Err(GoldPriceSourceError::NotConfigured)
        );
        assert_eq!(
            source.price_history(30).await,
            Err(GoldPriceSourceError::NotConfigured)
        );
    }

    #[rstest]
    fn error_messages_name_the_failure() {
        let err = GoldPriceSourceError::rate_limited("status 429");
        assert_eq!(
            err.to_string(),
            "gold price feed rate limited request: status 429"
        );
    }
}
