//! Gold price lookups with backup fallback.
//!
//! The live feed is always tried first. When it fails (or returns nothing
//! usable) the static backup snapshot answers instead, and the result is
//! tagged [`PriceSource::Backup`] so callers can surface the substitution.

use std::sync::Arc;

use tracing::warn;

use crate::domain::Error;
use crate::domain::ports::{
    BackupPriceStore, FallbackMetrics, FallbackOutcome, GoldPriceSource, Upstream,
};
use crate::domain::{PriceHistory, PriceQuote, PriceSource};

/// Composes the live feed, the backup store and fallback accounting.
#[derive(Clone)]
pub struct GoldPriceService {
    live: Arc<dyn GoldPriceSource>,
    backup: Arc<dyn BackupPriceStore>,
    metrics: Arc<dyn FallbackMetrics>,
}

impl GoldPriceService {
    /// Create a price service over the given adapters.
    pub fn new(
        live: Arc<dyn GoldPriceSource>,
        backup: Arc<dyn BackupPriceStore>,
        metrics: Arc<dyn FallbackMetrics>,
    ) -> Self {
        Self {
            live,
            backup,
            metrics,
        }
    }

    /// Current price: live if possible, else the latest backup price.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::ServiceUnavailable`] when neither source
    /// has a price.
    pub async fn current_quote(&self) -> Result<PriceQuote, Error> {
        let live_failure = match self.live.current_price().await {
            Ok(price) => match PriceQuote::try_new(price, PriceSource::Live) {
                Ok(quote) => return Ok(quote),
                Err(err) => err.to_string(),
            },
            Err(err) => err.to_string(),
        };

        let fallback = self
            .backup
            .latest()
            .and_then(|snapshot| PriceQuote::try_new(snapshot.price(), PriceSource::Backup).ok());

        match fallback {
            Some(quote) => {
                warn!(
                    error = %live_failure,
                    price = quote.price_per_gram(),
                    "live gold price unavailable; using backup price"
                );
                self.metrics
                    .record_fallback(Upstream::PriceQuote, FallbackOutcome::Substituted);
                Ok(quote)
            }
            None => {
                warn!(error = %live_failure, "live gold price unavailable and backup is empty");
                self.metrics
                    .record_fallback(Upstream::PriceQuote, FallbackOutcome::Exhausted);
                Err(Error::service_unavailable(
                    "failed to fetch live gold price and backup is unavailable",
                ))
            }
        }
    }

    /// Daily history covering `days`: live if non-empty, else backup.
    ///
    /// Never fails; an empty backup yields an empty history tagged
    /// [`PriceSource::Backup`].
    pub async fn history(&self, days: u32) -> PriceHistory {
        let live_failure = match self.live.price_history(days).await {
            Ok(snapshots) if !snapshots.is_empty() => {
                return PriceHistory::new(snapshots, PriceSource::Live);
            }
            Ok(_) => "live history was empty".to_owned(),
            Err(err) => err.to_string(),
        };

        let count = usize::try_from(days).unwrap_or(usize::MAX);
        let history = PriceHistory::new(self.backup.recent(count), PriceSource::Backup);
        let outcome = if history.is_empty() {
            FallbackOutcome::Exhausted
        } else {
            FallbackOutcome::Substituted
        };
        warn!(
            error = %live_failure,
            days,
            backup_points = history.snapshots().len(),
            "live gold price history unavailable; using backup history"
        );
        self.metrics.record_fallback(Upstream::PriceHistory, outcome);
        history
    }

    /// The full backup series, used for trend figures when nothing was
    /// fetched for the question.
    pub fn backup_history(&self) -> PriceHistory {
        PriceHistory::new(self.backup.all(), PriceSource::Backup)
    }
}
