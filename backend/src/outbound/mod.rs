//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **gold_api**: live XAU/INR prices from GoldAPI.io
//! - **gemini**: Google Gemini text completion
//! - **backup_file**: the JSON backup price snapshot
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **in_memory_ledger**: process-local repositories for development and tests
//! - **metrics**: Prometheus-backed metrics exporters (feature-gated)
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod backup_file;
pub mod gemini;
pub mod gold_api;
pub(crate) mod http_status;
pub mod in_memory_ledger;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod persistence;
pub(crate) mod price_point;
