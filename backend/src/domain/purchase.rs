//! Digital gold purchase model: orders, recorded transactions and holdings.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::price::{PriceSource, round_to, validate_price};
use super::user::{User, UserDraft, UserId};

/// Smallest rupee amount accepted for an amount-based order.
pub const MIN_PURCHASE_INR: f64 = 10.0;
/// Decimal places kept for gram quantities.
pub const GRAMS_DECIMAL_PLACES: i32 = 4;
/// Decimal places kept for per-gram prices.
pub const PRICE_DECIMAL_PLACES: i32 = 2;

/// Reasons an order amount is refused.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum PurchaseAmountError {
    /// Neither grams nor rupees were given.
    #[error("either grams or amountInr must be provided")]
    Missing,
    /// Both grams and rupees were given.
    #[error("provide only one of grams or amountInr")]
    Ambiguous,
    /// Grams were zero, negative, non-finite or vanish at four decimals.
    #[error("grams must be a positive number, got {0}")]
    InvalidGrams(f64),
    /// Rupee amount was non-finite or under the minimum.
    #[error("amountInr must be at least 10 INR, got {0}")]
    BelowMinimum(f64),
}

/// How much gold the buyer asked for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PurchaseAmount {
    /// A gram quantity.
    Grams(f64),
    /// A rupee budget converted at the purchase price.
    Rupees(f64),
}

impl PurchaseAmount {
    /// Build from the two optional request fields; exactly one must be set.
    ///
    /// # Examples
    /// ```
    /// use kuber::domain::{PurchaseAmount, PurchaseAmountError};
    ///
    /// assert_eq!(PurchaseAmount::try_from_parts(Some(1.5), None), Ok(PurchaseAmount::Grams(1.5)));
    /// assert_eq!(
    ///     PurchaseAmount::try_from_parts(Some(-1.0), None),
    ///     Err(PurchaseAmountError::InvalidGrams(-1.0)),
    /// );
    /// ```
    pub fn try_from_parts(
        grams: Option<f64>,
        amount_inr: Option<f64>,
    ) -> Result<Self, PurchaseAmountError> {
        match (grams, amount_inr) {
            (None, None) => Err(PurchaseAmountError::Missing),
            (Some(_), Some(_)) => Err(PurchaseAmountError::Ambiguous),
            (Some(grams), None) => {
                if grams.is_finite() && round_to(grams, GRAMS_DECIMAL_PLACES) > 0.0 {
                    Ok(Self::Grams(grams))
                } else {
                    Err(PurchaseAmountError::InvalidGrams(grams))
                }
            }
            (None, Some(amount)) => {
                if amount.is_finite() && amount >= MIN_PURCHASE_INR {
                    Ok(Self::Rupees(amount))
                } else {
                    Err(PurchaseAmountError::BelowMinimum(amount))
                }
            }
        }
    }

    /// Grams bought at `price_per_gram`, rounded to four decimal places.
    pub fn grams_at(self, price_per_gram: f64) -> Result<f64, PurchaseAmountError> {
        let grams = match self {
            Self::Grams(grams) => round_to(grams, GRAMS_DECIMAL_PLACES),
            Self::Rupees(amount) => round_to(amount / price_per_gram, GRAMS_DECIMAL_PLACES),
        };
        if grams.is_finite() && grams > 0.0 {
            Ok(grams)
        } else {
            Err(PurchaseAmountError::InvalidGrams(grams))
        }
    }
}

/// A validated request to buy gold.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseOrder {
    pub buyer: UserDraft,
    pub amount: PurchaseAmount,
    /// Caller-supplied price that overrides the market quote.
    pub quoted_price_per_gram: Option<f64>,
}

/// Stable transaction identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap a stored UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validation failures for [`Transaction`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransactionValidationError {
    /// Gram quantity was not strictly positive.
    #[error("grams purchased must be positive, got {0}")]
    NonPositiveGrams(f64),
    /// Price was not a finite positive number.
    #[error("price per gram is invalid: {0}")]
    InvalidPrice(#[from] super::price::PriceValidationError),
    /// Grams times price did not fit in a finite amount.
    #[error("purchase cost overflows: {grams} g at {price_per_gram} INR/g")]
    CostOverflow { grams: f64, price_per_gram: f64 },
}

/// Raw parts of a transaction prior to validation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub id: TransactionId,
    pub user_id: UserId,
    pub grams_purchased: f64,
    pub price_per_gram: f64,
    pub price_source: PriceSource,
    pub created_at: DateTime<Utc>,
}

/// One recorded purchase. Immutable once created.
///
/// ## Invariants
/// - `grams_purchased > 0`.
/// - `price_per_gram > 0`.
/// - `amount_inr == grams_purchased * price_per_gram`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    id: TransactionId,
    user_id: UserId,
    grams_purchased: f64,
    price_per_gram: f64,
    amount_inr: f64,
    price_source: PriceSource,
    created_at: DateTime<Utc>,
}

impl Transaction {
    /// Validate a draft and derive the cost.
    pub fn try_new(draft: TransactionDraft) -> Result<Self, TransactionValidationError> {
        let TransactionDraft {
            id,
            user_id,
            grams_purchased,
            price_per_gram,
            price_source,
            created_at,
        } = draft;

        if !(grams_purchased.is_finite() && grams_purchased > 0.0) {
            return Err(TransactionValidationError::NonPositiveGrams(grams_purchased));
        }
        let price_per_gram = validate_price(price_per_gram)?;
        let amount_inr = grams_purchased * price_per_gram;
        if !amount_inr.is_finite() {
            return Err(TransactionValidationError::CostOverflow {
                grams: grams_purchased,
                price_per_gram,
            });
        }

        Ok(Self {
            id,
            user_id,
            grams_purchased,
            price_per_gram,
            amount_inr,
            price_source,
            created_at,
        })
    }

    /// Stable identifier.
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Owner of the purchase.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Grams bought, four decimal places.
    pub fn grams_purchased(&self) -> f64 {
        self.grams_purchased
    }

    /// INR per gram used for this purchase.
    pub fn price_per_gram(&self) -> f64 {
        self.price_per_gram
    }

    /// Total cost in INR.
    pub fn amount_inr(&self) -> f64 {
        self.amount_inr
    }

    /// Where the price came from.
    pub fn price_source(&self) -> PriceSource {
        self.price_source
    }

    /// When the purchase was recorded.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Result of a successful purchase.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseReceipt {
    pub transaction: Transaction,
    /// Grams owned by the buyer across all purchases, this one included.
    pub total_grams_owned: f64,
}

/// Aggregates over one user's transactions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HoldingsTotals {
    pub total_grams: f64,
    pub total_invested_inr: f64,
    pub transaction_count: u64,
    pub last_purchase_at: Option<DateTime<Utc>>,
}

/// A user's holdings as reported by `GET /holdings/{email}`.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingsSummary {
    pub user: User,
    pub totals: HoldingsTotals,
}
