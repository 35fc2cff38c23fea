//! Gold purchase and holdings services.
//!
//! These services implement the [`GoldPurchase`] and [`HoldingsQuery`]
//! driving ports over the user and transaction repositories.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::gold_price_service::GoldPriceService;
use crate::domain::ports::{
    GoldPurchase, HoldingsQuery, TransactionRepository, TransactionRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::{
    Email, Error, GRAMS_DECIMAL_PLACES, HoldingsSummary, PriceQuote, PriceSource, PurchaseAmount,
    PurchaseOrder, PurchaseReceipt, Transaction, TransactionDraft, TransactionId, round_to,
};

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn map_transaction_error(error: TransactionRepositoryError) -> Error {
    match error {
        TransactionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("transaction repository unavailable: {message}"))
        }
        TransactionRepositoryError::UnknownUser { user_id } => {
            Error::internal(format!("transaction references unknown user {user_id}"))
        }
        TransactionRepositoryError::Query { message } => {
            Error::internal(format!("transaction repository error: {message}"))
        }
    }
}

fn invalid_field(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

/// Purchase recorder implementing [`GoldPurchase`] and [`HoldingsQuery`].
#[derive(Clone)]
pub struct PurchaseService<U, T> {
    users: Arc<U>,
    transactions: Arc<T>,
    prices: GoldPriceService,
    clock: Arc<dyn Clock>,
}

impl<U, T> PurchaseService<U, T> {
    /// Create a purchase service over the repositories and price service.
    pub fn new(
        users: Arc<U>,
        transactions: Arc<T>,
        prices: GoldPriceService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            transactions,
            prices,
            clock,
        }
    }

    async fn resolve_price(&self, quoted: Option<f64>) -> Result<PriceQuote, Error> {
        match quoted {
            Some(price) => PriceQuote::try_new(price, PriceSource::Quoted).map_err(|err| {
                invalid_field(
                    "quotedPriceInrPerGram",
                    "invalid_price",
                    format!("invalid quoted price: {err}"),
                )
            }),
            None => self.prices.current_quote().await,
        }
    }
}

#[async_trait]
impl<U, T> GoldPurchase for PurchaseService<U, T>
where
    U: UserRepository,
    T: TransactionRepository,
{
    async fn buy(&self, order: PurchaseOrder) -> Result<PurchaseReceipt, Error> {
        let quote = self.resolve_price(order.quoted_price_per_gram).await?;
        let grams = order
            .amount
            .grams_at(quote.price_per_gram())
            .map_err(|err| {
                let field = match order.amount {
                    PurchaseAmount::Grams(_) => "grams",
                    PurchaseAmount::Rupees(_) => "amountInr",
                };
                invalid_field(field, "invalid_amount", err.to_string())
            })?;

        let user = self
            .users
            .find_or_create(&order.buyer)
            .await
            .map_err(map_user_error)?;

        let transaction = Transaction::try_new(TransactionDraft {
            id: TransactionId::random(),
            user_id: user.id(),
            grams_purchased: grams,
            price_per_gram: quote.price_per_gram(),
            price_source: quote.source(),
            created_at: self.clock.utc(),
        })
        .map_err(|err| invalid_field("grams", "invalid_amount", err.to_string()))?;

        self.transactions
            .insert(&transaction)
            .await
            .map_err(map_transaction_error)?;
        let totals = self
            .transactions
            .totals_for_user(&user.id())
            .await
            .map_err(map_transaction_error)?;

        info!(
            transaction_id = %transaction.id(),
            grams = transaction.grams_purchased(),
            price_per_gram = transaction.price_per_gram(),
            price_source = %transaction.price_source(),
            "recorded gold purchase"
        );

        Ok(PurchaseReceipt {
            transaction,
            total_grams_owned: round_to(totals.total_grams, GRAMS_DECIMAL_PLACES),
        })
    }
}

#[async_trait]
impl<U, T> HoldingsQuery for PurchaseService<U, T>
where
    U: UserRepository,
    T: TransactionRepository,
{
    async fn holdings(&self, email: &Email) -> Result<HoldingsSummary, Error> {
        let user = self
            .users
            .find_by_email(email)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("no investor with email {email}")))?;
        let totals = self
            .transactions
            .totals_for_user(&user.id())
            .await
            .map_err(map_transaction_error)?;
        Ok(HoldingsSummary { user, totals })
    }
}

#[cfg(test)]
#[path = "purchase_service_tests.rs"]
mod tests;
