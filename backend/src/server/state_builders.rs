//! Builders wiring outbound adapters into the HTTP state ports.

use std::sync::Arc;

use mockable::DefaultClock;
use tracing::{info, warn};

use kuber::domain::ports::{
    AskKuber, BackupPriceStore, DisabledGoldPriceSource, DisabledLanguageModel, FallbackMetrics,
    GoldPriceSource, GoldPurchase, HoldingsQuery, LanguageModel,
};
use kuber::domain::{AdvisorService, GoldPriceService, PurchaseService};
use kuber::inbound::http::state::HttpState;
use kuber::outbound::backup_file::JsonFileBackupStore;
use kuber::outbound::gemini::GeminiHttpClient;
use kuber::outbound::gold_api::GoldApiHttpSource;
use kuber::outbound::in_memory_ledger::InMemoryLedger;
use kuber::outbound::persistence::{DbPool, DieselTransactionRepository, DieselUserRepository};
use kuber::settings::AppSettings;

use super::ServerConfig;

fn build_price_source(settings: &AppSettings) -> std::io::Result<Arc<dyn GoldPriceSource>> {
    match &settings.gold_api {
        Some(gold_api) => {
            let source = GoldApiHttpSource::new(
                gold_api.base_url.clone(),
                gold_api.api_key.clone(),
                settings.upstream_timeout,
            )
            .map_err(|e| std::io::Error::other(format!("gold price client: {e}")))?;
            Ok(Arc::new(source))
        }
        None => Ok(Arc::new(DisabledGoldPriceSource)),
    }
}

fn build_language_model(settings: &AppSettings) -> std::io::Result<Arc<dyn LanguageModel>> {
    match &settings.gemini {
        Some(gemini) => {
            let client = GeminiHttpClient::new(
                gemini.base_url.clone(),
                &gemini.model,
                gemini.api_key.clone(),
                settings.upstream_timeout,
            )
            .map_err(|e| std::io::Error::other(format!("language model client: {e}")))?;
            Ok(Arc::new(client))
        }
        None => Ok(Arc::new(DisabledLanguageModel)),
    }
}

fn split_ports<S>(service: S) -> (Arc<dyn GoldPurchase>, Arc<dyn HoldingsQuery>)
where
    S: GoldPurchase + HoldingsQuery + 'static,
{
    let service = Arc::new(service);
    let purchases: Arc<dyn GoldPurchase> = service.clone();
    let holdings: Arc<dyn HoldingsQuery> = service;
    (purchases, holdings)
}

/// Purchase ports over PostgreSQL when a pool is configured, otherwise over
/// a process-local ledger.
fn build_purchase_ports(
    db_pool: Option<&DbPool>,
    prices: GoldPriceService,
) -> (Arc<dyn GoldPurchase>, Arc<dyn HoldingsQuery>) {
    let clock = Arc::new(DefaultClock);
    match db_pool {
        Some(pool) => split_ports(PurchaseService::new(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselTransactionRepository::new(pool.clone())),
            prices,
            clock,
        )),
        None => {
            warn!("no database pool configured; purchases are kept in memory");
            let ledger = InMemoryLedger::new();
            split_ports(PurchaseService::new(
                Arc::new(ledger.clone()),
                Arc::new(ledger),
                prices,
                clock,
            ))
        }
    }
}

/// Build the HTTP state from configuration.
///
/// # Errors
/// Returns [`std::io::Error`] when an outbound HTTP client cannot be built.
pub(super) fn build_http_state(
    config: &ServerConfig,
    metrics: Arc<dyn FallbackMetrics>,
) -> std::io::Result<HttpState> {
    let settings = &config.settings;
    let backup: Arc<dyn BackupPriceStore> =
        Arc::new(JsonFileBackupStore::load_or_empty(&settings.backup_path));
    let prices = GoldPriceService::new(build_price_source(settings)?, backup, metrics.clone());
    let advisor: Arc<dyn AskKuber> = Arc::new(AdvisorService::new(
        build_language_model(settings)?,
        prices.clone(),
        metrics,
    ));
    let (purchases, holdings) = build_purchase_ports(config.db_pool.as_ref(), prices);

    info!(
        live_prices = settings.gold_api.is_some(),
        language_model = settings.gemini.is_some(),
        database = config.db_pool.is_some(),
        "HTTP state initialised"
    );
    Ok(HttpState::new(advisor, purchases, holdings))
}
