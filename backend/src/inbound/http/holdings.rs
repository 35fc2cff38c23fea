//! Holdings HTTP handler.
//!
//! ```text
//! GET /holdings/asha@example.com
//! ```

use actix_web::{get, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    Error, GRAMS_DECIMAL_PLACES, HoldingsSummary, PRICE_DECIMAL_PLACES, UserId, round_to,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{EMAIL, parse_email};

/// Accumulated holdings for one user.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HoldingsResponse {
    pub user_id: UserId,
    #[schema(example = "Asha Rao")]
    pub user_name: String,
    #[schema(example = "asha@example.com")]
    pub user_email: String,
    pub total_grams: f64,
    pub total_invested_inr: f64,
    pub transaction_count: u64,
    #[schema(format = "date-time")]
    pub last_purchase_at: Option<DateTime<Utc>>,
}

impl From<HoldingsSummary> for HoldingsResponse {
    fn from(summary: HoldingsSummary) -> Self {
        let HoldingsSummary { user, totals } = summary;
        Self {
            user_id: user.id(),
            user_name: user.name().as_ref().to_owned(),
            user_email: user.email().as_ref().to_owned(),
            total_grams: round_to(totals.total_grams, GRAMS_DECIMAL_PLACES),
            total_invested_inr: round_to(totals.total_invested_inr, PRICE_DECIMAL_PLACES),
            transaction_count: totals.transaction_count,
            last_purchase_at: totals.last_purchase_at,
        }
    }
}

/// Summarise a user's purchases by email.
#[utoipa::path(
    get,
    path = "/holdings/{email}",
    params(("email" = String, Path, description = "Investor email address")),
    responses(
        (status = 200, description = "Holdings summary", body = HoldingsResponse),
        (status = 400, description = "Malformed email", body = Error),
        (status = 404, description = "Unknown investor", body = Error),
        (status = 503, description = "Database unavailable", body = Error)
    ),
    tags = ["purchases"],
    operation_id = "getHoldings"
)]
#[get("/holdings/{email}")]
pub async fn holdings(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<HoldingsResponse>> {
    let email = parse_email(Some(path.into_inner()), EMAIL)?;
    let summary = state.holdings.holdings(&email).await?;
    Ok(web::Json(summary.into()))
}
