//! Wire form of a dated price, shared by the live feed and the backup file.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::domain::PriceSnapshot;

/// `{ "date": "...", "price": ... }` as sent by GoldAPI and stored in the
/// backup file.
#[derive(Debug, Deserialize)]
pub(crate) struct PricePointDto {
    pub(crate) date: String,
    pub(crate) price: f64,
}

impl PricePointDto {
    pub(crate) fn into_snapshot(self) -> Result<PriceSnapshot, String> {
        let date = parse_price_date(&self.date)
            .ok_or_else(|| format!("unrecognised price date {:?}", self.date))?;
        PriceSnapshot::try_new(date, self.price)
            .map_err(|err| format!("invalid price on {date}: {err}"))
    }
}

/// Accepts `YYYY-MM-DD`, RFC 3339 and naive ISO timestamps; timestamps keep
/// their calendar date.
pub(crate) fn parse_price_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|ts| ts.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|ts| ts.date())
        })
}
