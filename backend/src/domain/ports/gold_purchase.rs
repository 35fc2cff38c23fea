//! Driving ports for buying gold and reading holdings.

use async_trait::async_trait;

use crate::domain::{Email, Error, HoldingsSummary, PurchaseOrder, PurchaseReceipt};

/// Record digital gold purchases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GoldPurchase: Send + Sync {
    /// Price, validate and persist one purchase.
    async fn buy(&self, order: PurchaseOrder) -> Result<PurchaseReceipt, Error>;
}

/// Read a user's accumulated holdings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HoldingsQuery: Send + Sync {
    /// Summary for the user with `email`; `not_found` when unknown.
    async fn holdings(&self, email: &Email) -> Result<HoldingsSummary, Error>;
}
