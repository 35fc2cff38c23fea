//! Reqwest-backed Gemini client.
//!
//! This adapter owns transport details only: the API key header, timeout and
//! HTTP error mapping, and extracting the reply text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::dto::{GenerateContentRequest, GenerateContentResponse};
use crate::domain::ports::{LanguageModel, LanguageModelError};
use crate::outbound::http_status::UpstreamFailure;

/// Public Gemini REST endpoint.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Model used when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Single-turn Gemini text completion client.
pub struct GeminiHttpClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GeminiHttpClient {
    /// Build a client for `model` using an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        model: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: generate_content_url(&base_url, model),
            api_key: api_key.into(),
        })
    }
}

fn generate_content_url(base_url: &Url, model: &str) -> String {
    format!(
        "{}/models/{model}:generateContent",
        base_url.as_str().trim_end_matches('/')
    )
}

#[async_trait]
impl LanguageModel for GeminiHttpClient {
    async fn complete(&self, prompt: &str) -> Result<String, LanguageModelError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&GenerateContentRequest::user_prompt(prompt))
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
        parse_reply(body.as_ref())
    }
}

fn parse_reply(body: &[u8]) -> Result<String, LanguageModelError> {
    let decoded: GenerateContentResponse = serde_json::from_slice(body).map_err(|error| {
        LanguageModelError::decode(format!("invalid Gemini JSON payload: {error}"))
    })?;
    decoded.into_text().map_err(LanguageModelError::decode)
}

fn map_failure(failure: UpstreamFailure) -> LanguageModelError {
    match failure {
        UpstreamFailure::Transport(message) => LanguageModelError::transport(message),
        UpstreamFailure::Timeout(message) => LanguageModelError::timeout(message),
        UpstreamFailure::RateLimited(message) => LanguageModelError::rate_limited(message),
        UpstreamFailure::Rejected(message) => LanguageModelError::rejected(message),
    }
}
