//! Driving port for the conversational gold advisor.

use async_trait::async_trait;

use crate::domain::{Error, PriceQuote, QueryIntent, Question, TrendSummary};

/// Structured answer to one `/ask-kuber` question.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisorAnswer {
    /// Whether the question was judged to be about gold.
    pub is_gold_query: bool,
    /// Classified intent; `None` for non-gold questions.
    pub intent: Option<QueryIntent>,
    /// Headline answer.
    pub answer: String,
    /// Supporting insights, with the trend insight appended when known.
    pub extra_insights: String,
    /// Product pitch shown under the answer.
    pub simplify_suggestion: String,
    /// Closing invitation to invest.
    pub nudge_text: String,
    /// Price used as context, when one was fetched.
    pub price: Option<PriceQuote>,
    /// Trend figures, when any history was available.
    pub trend: Option<TrendSummary>,
    /// True when any upstream (price feed or model) was substituted.
    pub fallback: bool,
}

/// Answer gold-investment questions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AskKuber: Send + Sync {
    /// Answer a validated question. Upstream failures degrade the answer
    /// rather than fail it.
    async fn ask(&self, question: Question) -> Result<AdvisorAnswer, Error>;
}
