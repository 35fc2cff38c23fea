//! DTOs for decoding GoldAPI.io responses.

use serde::Deserialize;

use crate::domain::{PriceSnapshot, round_to};
use crate::outbound::price_point::PricePointDto;

/// Spot quote for one metal/currency pair; only the per-gram 24k price is
/// used.
#[derive(Debug, Deserialize)]
pub(super) struct SpotQuoteDto {
    pub(super) price_gram_24k: Option<f64>,
}

impl SpotQuoteDto {
    pub(super) fn into_price(self) -> Result<f64, String> {
        match self.price_gram_24k {
            Some(price) if price.is_finite() && price > 0.0 => Ok(round_to(price, 2)),
            Some(price) => Err(format!("price_gram_24k must be positive, got {price}")),
            None => Err("response has no price_gram_24k".to_owned()),
        }
    }
}

pub(super) fn into_snapshots(points: Vec<PricePointDto>) -> Result<Vec<PriceSnapshot>, String> {
    points
        .into_iter()
        .map(|point| {
            PricePointDto {
                date: point.date,
                price: round_to(point.price, 2),
            }
            .into_snapshot()
        })
        .collect()
}
