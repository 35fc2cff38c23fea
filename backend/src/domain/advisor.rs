//! KuberAI advisor: answers gold-investment questions.
//!
//! The service asks the language model whether a question is about gold and
//! what it wants to know, pulls the matching price data, and has the model
//! write the answer. Every upstream step degrades to keyword heuristics,
//! backup prices or canned text; a question is only ever refused when it is
//! invalid.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::warn;

use crate::domain::gold_price_service::GoldPriceService;
use crate::domain::ports::{
    AdvisorAnswer, AskKuber, FallbackMetrics, FallbackOutcome, LanguageModel, LanguageModelError,
    Upstream,
};
use crate::domain::{
    Error, PriceHistory, PriceQuote, PriceSource, QueryIntent, Question, TrendSummary,
    classify_by_keyword, is_gold_by_keyword, parse_yes_no,
};

/// History window fetched for `history` questions.
pub const HISTORY_QUESTION_DAYS: u32 = 30;
/// History window fetched for `prediction` questions.
pub const PREDICTION_QUESTION_DAYS: u32 = 90;

pub(crate) const NOT_GOLD_ANSWER: &str = "I can only help you with gold investment queries.";
pub(crate) const NOT_GOLD_INSIGHTS: &str = "Please ask me a question about gold.";
pub(crate) const DEGRADED_ANSWER: &str = "Right now I'm unable to fetch live AI insights due to an \
     API limit or server issue. The data coming is hard-coded and will resume the live response \
     as soon as the API limit gets refreshed";
pub(crate) const DEGRADED_INSIGHTS: &str = "But here’s a helpful tip: Gold is a safe-haven asset. \
     On Simplify Money, you can instantly buy or sell 24K, 99.9% pure digital gold.";
pub(crate) const SIMPLIFY_SUGGESTION: &str = "Simplify Money makes digital gold investment \
     effortless: - Buy or sell 24K, 99.9% pure gold instantly. - Your gold is securely stored in \
     insured vaults. - Start small with as little as ₹10.";
pub(crate) const NUDGE_TEXT: &str =
    "Would you like me to help you invest in digital gold on Simplify Money now?";

/// Price data gathered for one question.
#[derive(Debug, Default)]
struct MarketContext {
    quote: Option<PriceQuote>,
    history: Option<PriceHistory>,
    substituted: bool,
}

impl MarketContext {
    fn to_json(&self) -> Value {
        let mut data = Map::new();
        if let Some(quote) = self.quote {
            data.insert(
                "current".to_owned(),
                json!({
                    "pricePerGram": quote.price_per_gram(),
                    "source": quote.source(),
                }),
            );
        }
        if let Some(history) = &self.history {
            data.insert("history".to_owned(), json!(history.snapshots()));
        }
        Value::Object(data)
    }
}

/// Tracks whether the model is still worth calling during one request.
struct ModelSession<'a, M: ?Sized> {
    model: &'a M,
    metrics: &'a dyn FallbackMetrics,
    failed: bool,
}

impl<M> ModelSession<'_, M>
where
    M: LanguageModel + ?Sized,
{
    /// Complete `prompt`, or `None` once any call in this request failed.
    async fn complete(&mut self, step: &'static str, prompt: &str) -> Option<String> {
        if self.failed {
            return None;
        }
        match self.model.complete(prompt).await {
            Ok(reply) => Some(reply),
            Err(err) => {
                self.fail(step, &err);
                None
            }
        }
    }

    fn fail(&mut self, step: &'static str, err: &LanguageModelError) {
        warn!(step, error = %err, "language model unavailable; using fallback");
        self.metrics
            .record_fallback(Upstream::LanguageModel, FallbackOutcome::Substituted);
        self.failed = true;
    }
}

/// Advisor implementing the [`AskKuber`] driving port.
#[derive(Clone)]
pub struct AdvisorService<M: ?Sized> {
    model: Arc<M>,
    prices: GoldPriceService,
    metrics: Arc<dyn FallbackMetrics>,
}

impl<M: ?Sized> AdvisorService<M> {
    /// Create an advisor over a language model and the price service.
    pub fn new(model: Arc<M>, prices: GoldPriceService, metrics: Arc<dyn FallbackMetrics>) -> Self {
        Self {
            model,
            prices,
            metrics,
        }
    }
}

impl<M> AdvisorService<M>
where
    M: LanguageModel + ?Sized,
{
    async fn gather_market_data(&self, intent: QueryIntent) -> MarketContext {
        let mut context = MarketContext::default();
        match intent {
            QueryIntent::CurrentPrice => {
                context.quote = self.fetch_quote().await;
            }
            QueryIntent::History => {
                context.history = Some(self.prices.history(HISTORY_QUESTION_DAYS).await);
            }
            QueryIntent::Prediction => {
                context.quote = self.fetch_quote().await;
                context.history = Some(self.prices.history(PREDICTION_QUESTION_DAYS).await);
            }
            QueryIntent::GeneralInfo => {}
        }
        context.substituted = context
            .quote
            .is_some_and(|quote| quote.source() != PriceSource::Live)
            || context
                .history
                .as_ref()
                .is_some_and(|history| history.source() != PriceSource::Live);
        context
    }

    async fn fetch_quote(&self) -> Option<PriceQuote> {
        // No price at all is still answerable; the data block just omits it.
        self.prices.current_quote().await.ok()
    }

    fn trend_for(&self, context: &MarketContext) -> TrendSummary {
        match &context.history {
            Some(history) if !history.is_empty() => {
                TrendSummary::from_snapshots(history.snapshots())
            }
            _ => TrendSummary::from_snapshots(self.prices.backup_history().snapshots()),
        }
    }
}

#[async_trait]
impl<M> AskKuber for AdvisorService<M>
where
    M: LanguageModel + ?Sized,
{
    async fn ask(&self, question: Question) -> Result<AdvisorAnswer, Error> {
        let text = question.as_str();
        let mut model = ModelSession {
            model: self.model.as_ref(),
            metrics: self.metrics.as_ref(),
            failed: false,
        };

        let keyword_gold = is_gold_by_keyword(text);
        let is_gold_query = model
            .complete("detection", &detection_prompt(text))
            .await
            .and_then(|reply| parse_yes_no(&reply))
            .unwrap_or(keyword_gold);

        if !is_gold_query {
            return Ok(AdvisorAnswer {
                is_gold_query,
                intent: None,
                answer: NOT_GOLD_ANSWER.to_owned(),
                extra_insights: NOT_GOLD_INSIGHTS.to_owned(),
                simplify_suggestion: SIMPLIFY_SUGGESTION.to_owned(),
                nudge_text: NUDGE_TEXT.to_owned(),
                price: None,
                trend: None,
                fallback: model.failed,
            });
        }

        let intent = model
            .complete("intent", &intent_prompt(text))
            .await
            .and_then(|reply| QueryIntent::parse_llm_label(&reply))
            .unwrap_or_else(|| classify_by_keyword(text));

        let context = self.gather_market_data(intent).await;
        let trend = self.trend_for(&context);
        let insight = trend.insight();

        let prompt = fusion_prompt(text, &context.to_json(), &trend.narrative());
        let (answer, extra_insights) = match model.complete("answer", &prompt).await {
            Some(reply) => split_reply(&reply),
            None => (DEGRADED_ANSWER.to_owned(), DEGRADED_INSIGHTS.to_owned()),
        };
        let extra_insights = match insight {
            Some(insight) => format!("{extra_insights} {insight}").trim().to_owned(),
            None => extra_insights,
        };

        Ok(AdvisorAnswer {
            is_gold_query,
            intent: Some(intent),
            answer,
            extra_insights,
            simplify_suggestion: SIMPLIFY_SUGGESTION.to_owned(),
            nudge_text: NUDGE_TEXT.to_owned(),
            price: context.quote,
            trend: trend.is_available().then(|| trend.rounded()),
            fallback: model.failed || context.substituted,
        })
    }
}

pub(crate) fn detection_prompt(question: &str) -> String {
    format!("Is this about gold? Answer yes or no: '{question}'")
}

pub(crate) fn intent_prompt(question: &str) -> String {
    format!(
        "Classify \"{question}\" into: [\"current_price\", \"history\", \"prediction\", \
         \"general_info\"]. Respond with one word."
    )
}

pub(crate) fn fusion_prompt(question: &str, data: &Value, trend_narrative: &str) -> String {
    format!(
        "You are KuberAI. User asked: \"{question}\".\nData: {data}.\nTrend Analysis: \
         {trend_narrative}\nProvide a clear answer, 3-4 short insights, and a nudge to invest."
    )
}

/// Split a model reply at its first blank line into answer and insights,
/// collapsing whitespace in both halves.
pub(crate) fn split_reply(reply: &str) -> (String, String) {
    let reply = reply.trim();
    let (answer, rest) = reply.split_once("\n\n").unwrap_or((reply, ""));
    (normalise_whitespace(answer), normalise_whitespace(rest))
}

fn normalise_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "advisor_tests.rs"]
mod tests;
