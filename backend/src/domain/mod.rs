//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, and the services that implement the driving ports.
//! Keep types immutable and document invariants and serialisation contracts
//! (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - PriceQuote / PriceHistory: prices tagged with their provenance.
//! - TrendSummary: 7- and 30-day percentage changes.
//! - Question / QueryIntent: validated advisor input and its classification.
//! - Transaction / HoldingsSummary: recorded purchases and their totals.
//! - AdvisorService, GoldPriceService, PurchaseService: port implementations.

pub mod advisor;
pub mod error;
pub mod gold_price_service;
pub mod ports;
pub mod price;
pub mod purchase;
pub mod purchase_service;
pub mod query;
pub mod trace_id;
pub mod trend;
pub mod user;

pub use self::advisor::AdvisorService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::gold_price_service::GoldPriceService;
pub use self::price::{
    ParsePriceSourceError, PriceHistory, PriceQuote, PriceSnapshot, PriceSource,
    PriceValidationError, round_to, validate_price,
};
pub use self::purchase::{
    GRAMS_DECIMAL_PLACES, HoldingsSummary, HoldingsTotals, MIN_PURCHASE_INR,
    PRICE_DECIMAL_PLACES, PurchaseAmount, PurchaseAmountError, PurchaseOrder, PurchaseReceipt,
    Transaction, TransactionDraft, TransactionId, TransactionValidationError,
};
pub use self::purchase_service::PurchaseService;
pub use self::query::{
    QUESTION_MAX_CHARS, QueryIntent, Question, QuestionValidationError, classify_by_keyword,
    is_gold_by_keyword, parse_yes_no,
};
pub use self::trace_id::TraceId;
pub use self::trend::{
    LONG_WINDOW_DAYS, SHORT_WINDOW_DAYS, TrendSummary, describe_change, window_change,
};
pub use self::user::{
    EMAIL_MAX, Email, USER_NAME_MAX, User, UserDraft, UserId, UserName, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use kuber::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("no such investor"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
