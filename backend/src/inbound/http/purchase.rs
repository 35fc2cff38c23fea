//! Gold purchase HTTP handler.
//!
//! ```text
//! POST /buy-gold {"userName":"Asha","userEmail":"asha@example.com","grams":1.5}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, PriceSource, PurchaseOrder, PurchaseReceipt, UserDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    USER_EMAIL, parse_email, parse_purchase_amount, parse_user_name, require_consent,
};

/// Request payload for `/buy-gold`. Supply exactly one of `grams` or
/// `amountInr`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuyGoldRequest {
    #[schema(example = "Asha Rao")]
    pub user_name: Option<String>,
    #[schema(example = "asha@example.com")]
    pub user_email: Option<String>,
    #[schema(example = 1.5)]
    pub grams: Option<f64>,
    #[schema(example = 1000.0)]
    pub amount_inr: Option<f64>,
    /// Price to transact at instead of the market quote.
    pub quoted_price_inr_per_gram: Option<f64>,
    /// `false` refuses the purchase; absent means consent.
    pub nudge_to_invest: Option<bool>,
}

impl BuyGoldRequest {
    fn into_order(self) -> Result<PurchaseOrder, Error> {
        require_consent(self.nudge_to_invest)?;
        let name = parse_user_name(self.user_name)?;
        let email = parse_email(self.user_email, USER_EMAIL)?;
        let amount = parse_purchase_amount(self.grams, self.amount_inr)?;
        Ok(PurchaseOrder {
            buyer: UserDraft { name, email },
            amount,
            quoted_price_per_gram: self.quoted_price_inr_per_gram,
        })
    }
}

/// Response payload for a recorded purchase.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuyGoldResponse {
    pub success: bool,
    #[schema(example = "Purchase of 1.5g gold successful.")]
    pub message: String,
    #[schema(format = "uuid")]
    pub transaction_id: String,
    pub grams_purchased: f64,
    pub price_per_gram: f64,
    /// Cost of the purchase: grams multiplied by the price per gram.
    pub amount_inr: f64,
    pub price_source: PriceSource,
    pub total_grams_owned: f64,
}

impl From<PurchaseReceipt> for BuyGoldResponse {
    fn from(receipt: PurchaseReceipt) -> Self {
        let tx = receipt.transaction;
        Self {
            success: true,
            message: format!("Purchase of {}g gold successful.", tx.grams_purchased()),
            transaction_id: tx.id().to_string(),
            grams_purchased: tx.grams_purchased(),
            price_per_gram: tx.price_per_gram(),
            amount_inr: tx.amount_inr(),
            price_source: tx.price_source(),
            total_grams_owned: receipt.total_grams_owned,
        }
    }
}

/// Buy digital gold for a user, creating the user on first purchase.
#[utoipa::path(
    post,
    path = "/buy-gold",
    request_body = BuyGoldRequest,
    responses(
        (status = 200, description = "Purchase recorded", body = BuyGoldResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "No gold price or database available", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["purchases"],
    operation_id = "buyGold"
)]
#[post("/buy-gold")]
pub async fn buy_gold(
    state: web::Data<HttpState>,
    payload: web::Json<BuyGoldRequest>,
) -> ApiResult<web::Json<BuyGoldResponse>> {
    let order = payload.into_inner().into_order()?;
    let receipt = state.purchases.buy(order).await?;
    Ok(web::Json(receipt.into()))
}

#[cfg(test)]
#[path = "purchase_tests.rs"]
mod tests;
