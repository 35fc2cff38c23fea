//! Advisor HTTP handler.
//!
//! ```text
//! POST /ask-kuber {"question":"Is now a good time to buy gold?"}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::AdvisorAnswer;
use crate::domain::{Error, PriceQuote, PriceSource, QueryIntent, TrendSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_question;

/// Request payload for `/ask-kuber`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AskKuberRequest {
    #[schema(example = "Should I invest in gold this month?")]
    pub question: Option<String>,
}

/// Price used to answer a question.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceBody {
    #[schema(example = 6543.21)]
    pub price_per_gram: f64,
    pub source: PriceSource,
}

impl From<PriceQuote> for PriceBody {
    fn from(quote: PriceQuote) -> Self {
        Self {
            price_per_gram: quote.price_per_gram(),
            source: quote.source(),
        }
    }
}

/// Percentage changes over the trend windows; `null` when unavailable.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendBody {
    #[schema(example = 1.25)]
    pub seven_day_pct: Option<f64>,
    #[schema(example = -0.4)]
    pub thirty_day_pct: Option<f64>,
}

impl From<TrendSummary> for TrendBody {
    fn from(trend: TrendSummary) -> Self {
        Self {
            seven_day_pct: trend.seven_day_pct(),
            thirty_day_pct: trend.thirty_day_pct(),
        }
    }
}

/// Response payload for `/ask-kuber`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AskKuberResponse {
    pub is_gold_query: bool,
    pub intent: Option<QueryIntent>,
    pub answer: String,
    pub extra_insights: String,
    pub simplify_suggestion: String,
    pub nudge_text: String,
    pub price: Option<PriceBody>,
    pub trend: Option<TrendBody>,
    /// True when a backup price or canned text stood in for an upstream.
    pub fallback: bool,
}

impl From<AdvisorAnswer> for AskKuberResponse {
    fn from(answer: AdvisorAnswer) -> Self {
        Self {
            is_gold_query: answer.is_gold_query,
            intent: answer.intent,
            answer: answer.answer,
            extra_insights: answer.extra_insights,
            simplify_suggestion: answer.simplify_suggestion,
            nudge_text: answer.nudge_text,
            price: answer.price.map(PriceBody::from),
            trend: answer.trend.map(TrendBody::from),
            fallback: answer.fallback,
        }
    }
}

/// Answer a gold-investment question.
///
/// Upstream outages degrade the answer and set `fallback`; only an invalid
/// question is rejected.
#[utoipa::path(
    post,
    path = "/ask-kuber",
    request_body = AskKuberRequest,
    responses(
        (status = 200, description = "Advisor answer", body = AskKuberResponse),
        (status = 400, description = "Missing or invalid question", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["advisor"],
    operation_id = "askKuber"
)]
#[post("/ask-kuber")]
pub async fn ask_kuber(
    state: web::Data<HttpState>,
    payload: web::Json<AskKuberRequest>,
) -> ApiResult<web::Json<AskKuberResponse>> {
    let question = parse_question(payload.into_inner().question)?;
    let answer = state.advisor.ask(question).await?;
    Ok(web::Json(answer.into()))
}
