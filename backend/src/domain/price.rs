//! Gold price primitives shared by the price service, trend calculator and
//! purchase flow.
//!
//! Prices are INR per gram of 24k gold. Every value entering the domain is
//! validated as finite and strictly positive.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Where a price figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    /// Fetched from the live price API during this request.
    Live,
    /// Read from the static backup snapshot.
    Backup,
    /// Supplied by the caller alongside a purchase.
    Quoted,
}

impl PriceSource {
    /// Stable lowercase label used in payloads and persistence.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Backup => "backup",
            Self::Quoted => "quoted",
        }
    }
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown price source label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown price source: {0}")]
pub struct ParsePriceSourceError(String);

impl FromStr for PriceSource {
    type Err = ParsePriceSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "live" => Ok(Self::Live),
            "backup" => Ok(Self::Backup),
            "quoted" => Ok(Self::Quoted),
            other => Err(ParsePriceSourceError(other.to_owned())),
        }
    }
}

/// Validation failures for price values.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum PriceValidationError {
    /// NaN or infinite.
    #[error("price must be a finite number")]
    NonFinite,
    /// Zero or negative.
    #[error("price must be greater than zero, got {0}")]
    NonPositive(f64),
}

/// Validate a raw price per gram.
pub fn validate_price(value: f64) -> Result<f64, PriceValidationError> {
    if !value.is_finite() {
        return Err(PriceValidationError::NonFinite);
    }
    if value <= 0.0 {
        return Err(PriceValidationError::NonPositive(value));
    }
    Ok(value)
}

/// Round `value` to `places` decimal places, half away from zero.
///
/// # Examples
/// ```
/// use kuber::domain::round_to;
///
/// assert_eq!(round_to(6512.456, 2), 6512.46);
/// assert_eq!(round_to(0.123456, 4), 0.1235);
/// ```
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

/// A dated price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceSnapshot {
    date: NaiveDate,
    price: f64,
}

impl PriceSnapshot {
    /// Build a snapshot after validating the price.
    pub fn try_new(date: NaiveDate, price: f64) -> Result<Self, PriceValidationError> {
        Ok(Self {
            date,
            price: validate_price(price)?,
        })
    }

    /// Calendar date of the observation.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// INR per gram.
    pub fn price(&self) -> f64 {
        self.price
    }
}

/// A single current price with its provenance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote {
    price_per_gram: f64,
    source: PriceSource,
}

impl PriceQuote {
    /// Build a quote, rounding the price to two decimal places.
    pub fn try_new(price_per_gram: f64, source: PriceSource) -> Result<Self, PriceValidationError> {
        let price = validate_price(price_per_gram)?;
        Ok(Self {
            price_per_gram: round_to(price, 2),
            source,
        })
    }

    /// INR per gram, two decimal places.
    pub fn price_per_gram(&self) -> f64 {
        self.price_per_gram
    }

    /// Provenance of the figure.
    pub fn source(&self) -> PriceSource {
        self.source
    }
}

/// Date-ordered price history with its provenance.
///
/// ## Invariants
/// - Snapshots are sorted ascending by date.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceHistory {
    snapshots: Vec<PriceSnapshot>,
    source: PriceSource,
}

impl PriceHistory {
    /// Build a history, sorting the snapshots by date.
    pub fn new(mut snapshots: Vec<PriceSnapshot>, source: PriceSource) -> Self {
        snapshots.sort_by_key(PriceSnapshot::date);
        Self { snapshots, source }
    }

    /// Snapshots in ascending date order.
    pub fn snapshots(&self) -> &[PriceSnapshot] {
        &self.snapshots
    }

    /// Provenance of the series.
    pub fn source(&self) -> PriceSource {
        self.source
    }

    /// Whether the series holds no observations.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Most recent observation.
    pub fn latest(&self) -> Option<&PriceSnapshot> {
        self.snapshots.last()
    }
}
