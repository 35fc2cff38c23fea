//! GoldAPI.io outbound adapter.
//!
//! Provides the reqwest implementation of the `GoldPriceSource` port for the
//! XAU/INR pair.

mod dto;
mod http_source;

pub use http_source::{DEFAULT_GOLD_API_BASE_URL, GoldApiHttpSource};
