//! Port for recording gold purchases and aggregating holdings.

use async_trait::async_trait;

use crate::domain::{HoldingsTotals, Transaction, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by transaction repository adapters.
    pub enum TransactionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "transaction repository connection failed: {message}",
        /// The referenced user does not exist.
        UnknownUser { user_id: String } =>
            "transaction references unknown user {user_id}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "transaction repository query failed: {message}",
    }
}

/// Append-only purchase ledger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Persist a new transaction.
    async fn insert(&self, transaction: &Transaction) -> Result<(), TransactionRepositoryError>;

    /// Sum the user's transactions. Users without purchases get zeroed totals.
    async fn totals_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<HoldingsTotals, TransactionRepositoryError>;
}
