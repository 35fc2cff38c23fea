//! PostgreSQL-backed `TransactionRepository` implementation using Diesel ORM.
//!
//! Rows are append-only; holdings are aggregated in SQL rather than summed in
//! the application.

use async_trait::async_trait;
use diesel::dsl::{count_star, max, sum};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TransactionRepository, TransactionRepositoryError};
use crate::domain::{HoldingsTotals, Transaction, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewTransactionRow, TotalsRow};
use super::pool::{DbPool, PoolError};
use super::schema::transactions;

/// Diesel-backed implementation of the transaction repository port.
#[derive(Clone)]
pub struct DieselTransactionRepository {
    pool: DbPool,
}

impl DieselTransactionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TransactionRepositoryError {
    map_basic_pool_error(error, TransactionRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> TransactionRepositoryError {
    map_basic_diesel_error(
        error,
        TransactionRepositoryError::query,
        TransactionRepositoryError::connection,
    )
}

fn map_insert_error(error: DieselError, user_id: &UserId) -> TransactionRepositoryError {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            TransactionRepositoryError::unknown_user(user_id.as_uuid().to_string())
        }
        other => map_diesel_error(other),
    }
}

fn totals_from_row(row: TotalsRow) -> Result<HoldingsTotals, TransactionRepositoryError> {
    let (total_grams, total_invested_inr, count, last_purchase_at) = row;
    let transaction_count = u64::try_from(count).map_err(|_| {
        TransactionRepositoryError::query(format!("negative transaction count {count}"))
    })?;
    Ok(HoldingsTotals {
        total_grams: total_grams.unwrap_or_default(),
        total_invested_inr: total_invested_inr.unwrap_or_default(),
        transaction_count,
        last_purchase_at,
    })
}

#[async_trait]
impl TransactionRepository for DieselTransactionRepository {
    async fn insert(&self, transaction: &Transaction) -> Result<(), TransactionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = transaction.user_id();

        let row = NewTransactionRow {
            id: *transaction.id().as_uuid(),
            user_id: *user_id.as_uuid(),
            grams_purchased: transaction.grams_purchased(),
            price_per_gram: transaction.price_per_gram(),
            amount_inr: transaction.amount_inr(),
            price_source: transaction.price_source().as_str(),
            created_at: transaction.created_at(),
        };

        diesel::insert_into(transactions::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_insert_error(err, &user_id))
    }

    async fn totals_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<HoldingsTotals, TransactionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = transactions::table
            .filter(transactions::user_id.eq(user_id.as_uuid()))
            .select((
                sum(transactions::grams_purchased),
                sum(transactions::amount_inr),
                count_star(),
                max(transactions::created_at),
            ))
            .first::<TotalsRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        totals_from_row(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn empty_aggregate_is_zero_totals() {
        let totals = totals_from_row((None, None, 0, None)).expect("valid totals");

        assert_eq!(totals, HoldingsTotals::default());
    }

    #[rstest]
    fn aggregate_row_maps_to_totals() {
        let totals = totals_from_row((Some(1.25), Some(8_000.0), 2, None)).expect("valid totals");

        assert_eq!(totals.total_grams, 1.25);
        assert_eq!(totals.total_invested_inr, 8_000.0);
        assert_eq!(totals.transaction_count, 2);
    }

    #[rstest]
    fn negative_count_is_query_error() {
        let error = totals_from_row((None, None, -1, None)).expect_err("corrupt count");

        assert!(matches!(error, TransactionRepositoryError::Query { .. }));
    }

    #[rstest]
    fn not_found_maps_to_query_error() {
        let error = map_insert_error(DieselError::NotFound, &UserId::random());

        assert!(matches!(error, TransactionRepositoryError::Query { .. }));
    }
}
