//! Google Gemini outbound adapter.
//!
//! Provides the reqwest implementation of the `LanguageModel` port against
//! the `generateContent` REST endpoint.

mod dto;
mod http_client;

pub use http_client::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, GeminiHttpClient};
