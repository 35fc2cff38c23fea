//! KuberAI entry-point: reads settings, prepares persistence and serves the
//! HTTP API.

mod server;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use kuber::inbound::http::health::HealthState;
use kuber::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use kuber::settings::{AppSettings, BuildMode, DatabaseSettings};
#[cfg(feature = "metrics")]
use server::initialize_metrics;
use server::{ServerConfig, create_server};

async fn connect_database(database: &DatabaseSettings) -> std::io::Result<DbPool> {
    run_pending_migrations(&database.url)
        .await
        .map_err(std::io::Error::other)?;
    let pool = DbPool::new(PoolConfig::new(&database.url).with_max_size(database.max_connections))
        .await
        .map_err(std::io::Error::other)?;
    info!(max_connections = database.max_connections, "database pool ready");
    Ok(pool)
}

/// Read settings from the process environment under the current build mode.
fn load_settings() -> std::io::Result<AppSettings> {
    AppSettings::from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = load_settings()?;

    let mut config = ServerConfig::new(settings.clone());
    if let Some(database) = &settings.database {
        config = config.with_db_pool(connect_database(database).await?);
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(initialize_metrics(|| {
        PrometheusMetricsBuilder::new("kuber")
            .endpoint("/metrics")
            .build()
    }));

    info!(bind_addr = %config.bind_addr(), "starting KuberAI");
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
