//! Shared doubles and app wiring for the HTTP integration tests.
//!
//! The app is assembled from the real domain services and inbound handlers;
//! only the upstream adapters are replaced with deterministic doubles.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use mockable::DefaultClock;

use kuber::Trace;
use kuber::domain::ports::{
    AskKuber, GoldPriceSource, GoldPriceSourceError, GoldPurchase, HoldingsQuery, LanguageModel,
    LanguageModelError, NoOpFallbackMetrics,
};
use kuber::domain::{AdvisorService, GoldPriceService, PriceSnapshot, PurchaseService};
use kuber::inbound::http::ask::ask_kuber;
use kuber::inbound::http::health::{HealthState, live, ready, status};
use kuber::inbound::http::holdings::holdings;
use kuber::inbound::http::purchase::buy_gold;
use kuber::inbound::http::state::HttpState;
use kuber::inbound::http::validation::json_config;
use kuber::outbound::backup_file::JsonFileBackupStore;
use kuber::outbound::in_memory_ledger::InMemoryLedger;

/// Latest price in [`backup_store`].
pub const BACKUP_LATEST_PRICE: f64 = 6_300.0;

/// Live feed double: a fixed price, or a failure on every call.
pub enum StubPriceSource {
    Live(f64),
    Down,
}

#[async_trait]
impl GoldPriceSource for StubPriceSource {
    async fn current_price(&self) -> Result<f64, GoldPriceSourceError> {
        match self {
            Self::Live(price) => Ok(*price),
            Self::Down => Err(GoldPriceSourceError::rate_limited("status 429")),
        }
    }

    async fn price_history(&self, _days: u32) -> Result<Vec<PriceSnapshot>, GoldPriceSourceError> {
        Err(GoldPriceSourceError::rate_limited("status 429"))
    }
}

/// Language model double answering each prompt kind with canned text.
#[derive(Default)]
pub struct ScriptedModel {
    calls: AtomicUsize,
}

impl ScriptedModel {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, prompt: &str) -> Result<String, LanguageModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = if prompt.starts_with("Is this about gold?") {
            "Yes"
        } else if prompt.starts_with("Classify") {
            "current_price"
        } else {
            "Gold is steady today.\n\nBuying small amounts regularly smooths out price swings."
        };
        Ok(reply.to_owned())
    }
}

/// Language model double whose quota is always exhausted.
pub struct ExhaustedModel;

#[async_trait]
impl LanguageModel for ExhaustedModel {
    async fn complete(&self, _prompt: &str) -> Result<String, LanguageModelError> {
        Err(LanguageModelError::rate_limited("quota exceeded"))
    }
}

/// Thirty-one daily prices rising 10 INR a day to [`BACKUP_LATEST_PRICE`].
pub fn backup_store() -> JsonFileBackupStore {
    let last = NaiveDate::from_ymd_opt(2025, 8, 31).expect("valid date");
    let snapshots = (0..=30_u32)
        .map(|offset| {
            let date = last
                .checked_sub_days(Days::new(u64::from(30 - offset)))
                .expect("date in range");
            let price = BACKUP_LATEST_PRICE - f64::from(30 - offset) * 10.0;
            PriceSnapshot::try_new(date, price).expect("valid price")
        })
        .collect();
    JsonFileBackupStore::from_snapshots(snapshots)
}

/// HTTP state over the given upstream doubles, the [`backup_store`] and a
/// fresh in-memory ledger.
pub fn http_state(
    feed: StubPriceSource,
    model: Arc<dyn LanguageModel>,
) -> (web::Data<HttpState>, InMemoryLedger) {
    let metrics = Arc::new(NoOpFallbackMetrics);
    let prices = GoldPriceService::new(Arc::new(feed), Arc::new(backup_store()), metrics.clone());
    let advisor: Arc<dyn AskKuber> =
        Arc::new(AdvisorService::new(model, prices.clone(), metrics));
    let ledger = InMemoryLedger::new();
    let service = Arc::new(PurchaseService::new(
        Arc::new(ledger.clone()),
        Arc::new(ledger.clone()),
        prices,
        Arc::new(DefaultClock),
    ));
    let purchases: Arc<dyn GoldPurchase> = service.clone();
    let query: Arc<dyn HoldingsQuery> = service;
    (
        web::Data::new(HttpState::new(advisor, purchases, query)),
        ledger,
    )
}

/// The production route table over `state`.
pub fn app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    App::new()
        .app_data(health)
        .app_data(state)
        .app_data(json_config())
        .wrap(Trace)
        .service(status)
        .service(ask_kuber)
        .service(buy_gold)
        .service(holdings)
        .service(ready)
        .service(live)
}
