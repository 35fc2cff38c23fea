//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`AskKuber`, `GoldPurchase`, `HoldingsQuery`) are what the
//! HTTP adapter calls. Driven ports are what the domain services call out to.

mod macros;
pub(crate) use macros::define_port_error;

mod ask_kuber;
mod backup_price_store;
mod fallback_metrics;
mod gold_price_source;
mod gold_purchase;
mod language_model;
mod transaction_repository;
mod user_repository;

#[cfg(test)]
pub use ask_kuber::MockAskKuber;
pub use ask_kuber::{AdvisorAnswer, AskKuber};
#[cfg(test)]
pub use backup_price_store::MockBackupPriceStore;
pub use backup_price_store::{BackupPriceStore, EmptyBackupPriceStore};
#[cfg(test)]
pub use fallback_metrics::MockFallbackMetrics;
pub use fallback_metrics::{FallbackMetrics, FallbackOutcome, NoOpFallbackMetrics, Upstream};
#[cfg(test)]
pub use gold_price_source::MockGoldPriceSource;
pub use gold_price_source::{DisabledGoldPriceSource, GoldPriceSource, GoldPriceSourceError};
pub use gold_purchase::{GoldPurchase, HoldingsQuery};
#[cfg(test)]
pub use gold_purchase::{MockGoldPurchase, MockHoldingsQuery};
#[cfg(test)]
pub use language_model::MockLanguageModel;
pub use language_model::{DisabledLanguageModel, LanguageModel, LanguageModelError};
#[cfg(test)]
pub use transaction_repository::MockTransactionRepository;
pub use transaction_repository::{TransactionRepository, TransactionRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
