//! Process-local user and transaction store.
//!
//! Backs the purchase endpoints in debug builds started without
//! `DATABASE_URL`, and in the integration tests. Data lives only as long as
//! the process.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    TransactionRepository, TransactionRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{Email, HoldingsTotals, Transaction, User, UserDraft, UserId};

#[derive(Debug, Default)]
struct LedgerState {
    users: HashMap<Email, User>,
    transactions: Vec<Transaction>,
}

/// In-memory implementation of both repository ports.
///
/// Clones share the same state.
#[derive(Debug, Default, Clone)]
pub struct InMemoryLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        // Poisoning leaves the maps structurally valid.
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Every recorded transaction, oldest first.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.lock().transactions.clone()
    }
}

#[async_trait]
impl UserRepository for InMemoryLedger {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.lock().users.get(email).cloned())
    }

    async fn find_or_create(&self, draft: &UserDraft) -> Result<User, UserRepositoryError> {
        let mut state = self.lock();
        let user = state
            .users
            .entry(draft.email.clone())
            .or_insert_with(|| {
                User::new(UserId::random(), draft.name.clone(), draft.email.clone())
            });
        Ok(user.clone())
    }
}

#[async_trait]
impl TransactionRepository for InMemoryLedger {
    async fn insert(&self, transaction: &Transaction) -> Result<(), TransactionRepositoryError> {
        let mut state = self.lock();
        let known = state
            .users
            .values()
            .any(|user| user.id() == transaction.user_id());
        if !known {
            return Err(TransactionRepositoryError::unknown_user(
                transaction.user_id().as_uuid().to_string(),
            ));
        }
        state.transactions.push(transaction.clone());
        Ok(())
    }

    async fn totals_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<HoldingsTotals, TransactionRepositoryError> {
        let state = self.lock();
        let totals = state
            .transactions
            .iter()
            .filter(|transaction| transaction.user_id() == *user_id)
            .fold(HoldingsTotals::default(), |mut totals, transaction| {
                totals.total_grams += transaction.grams_purchased();
                totals.total_invested_inr += transaction.amount_inr();
                totals.transaction_count += 1;
                totals.last_purchase_at = totals.last_purchase_at.max(Some(transaction.created_at()));
                totals
            });
        Ok(totals)
    }
}
