//! HTTP inbound adapter exposing REST endpoints.

pub mod ask;
pub mod error;
pub mod health;
pub mod holdings;
pub mod purchase;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod validation;

pub use error::ApiResult;
