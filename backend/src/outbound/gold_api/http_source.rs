//! Reqwest-backed GoldAPI.io price source.
//!
//! This adapter owns transport details only: authentication header, timeout
//! and HTTP error mapping, and JSON decoding into domain snapshots.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use super::dto::{SpotQuoteDto, into_snapshots};
use crate::domain::PriceSnapshot;
use crate::domain::ports::{GoldPriceSource, GoldPriceSourceError};
use crate::outbound::http_status::UpstreamFailure;
use crate::outbound::price_point::PricePointDto;

/// Public GoldAPI.io endpoint.
pub const DEFAULT_GOLD_API_BASE_URL: &str = "https://www.goldapi.io/api";
const ACCESS_TOKEN_HEADER: &str = "x-access-token";
const PAIR_PATH: &str = "XAU/INR";

/// GoldAPI.io source for INR-per-gram 24k prices.
pub struct GoldApiHttpSource {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GoldApiHttpSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
        })
    }

    fn current_url(&self) -> String {
        format!("{}/{PAIR_PATH}", self.base_url)
    }

    fn history_url(&self, days: u32) -> String {
        format!("{}/{PAIR_PATH}/history?period={days}d", self.base_url)
    }

    async fn get_json<T>(&self, url: &str) -> Result<T, GoldPriceSourceError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .client
            .get(url)
            .header(ACCESS_TOKEN_HEADER, self.api_key.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| map_failure(UpstreamFailure::from_reqwest(&err)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| map_failure(UpstreamFailure::from_reqwest(&err)))?;
        if !status.is_success() {
            return Err(map_failure(UpstreamFailure::from_status(
                status,
                body.as_ref(),
            )));
        }
        decode(body.as_ref())
    }
}

#[async_trait]
impl GoldPriceSource for GoldApiHttpSource {
    async fn current_price(&self) -> Result<f64, GoldPriceSourceError> {
        let quote: SpotQuoteDto = self.get_json(&self.current_url()).await?;
        quote.into_price().map_err(GoldPriceSourceError::decode)
    }

    async fn price_history(&self, days: u32) -> Result<Vec<PriceSnapshot>, GoldPriceSourceError> {
        let points: Vec<PricePointDto> = self.get_json(&self.history_url(days)).await?;
        into_snapshots(points).map_err(GoldPriceSourceError::decode)
    }
}

fn decode<T>(body: &[u8]) -> Result<T, GoldPriceSourceError>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(body).map_err(|error| {
        GoldPriceSourceError::decode(format!("invalid GoldAPI JSON payload: {error}"))
    })
}

fn map_failure(failure: UpstreamFailure) -> GoldPriceSourceError {
    match failure {
        UpstreamFailure::Transport(message) => GoldPriceSourceError::transport(message),
        UpstreamFailure::Timeout(message) => GoldPriceSourceError::timeout(message),
        UpstreamFailure::RateLimited(message) => GoldPriceSourceError::rate_limited(message),
        UpstreamFailure::Rejected(message) => GoldPriceSourceError::rejected(message),
    }
}
