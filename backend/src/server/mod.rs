//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::ServerConfig;

#[cfg(feature = "metrics")]
pub(crate) use metrics::initialize_metrics;
#[cfg(feature = "metrics")]
use metrics::MetricsLayer;
use state_builders::build_http_state;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use kuber::Trace;
#[cfg(debug_assertions)]
use kuber::doc::ApiDoc;
use kuber::domain::ports::{FallbackMetrics, NoOpFallbackMetrics};
use kuber::inbound::http::ask::ask_kuber;
use kuber::inbound::http::health::{HealthState, live, ready, status};
use kuber::inbound::http::holdings::holdings;
use kuber::inbound::http::purchase::buy_gold;
use kuber::inbound::http::state::HttpState;
use kuber::inbound::http::validation::json_config;
#[cfg(feature = "metrics")]
use kuber::outbound::metrics::PrometheusFallbackMetrics;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Fallback counters registered on the Prometheus registry when metrics are
/// configured.
///
/// # Errors
/// Returns [`std::io::Error`] if Prometheus metric registration fails.
#[cfg(feature = "metrics")]
fn build_fallback_metrics(config: &ServerConfig) -> std::io::Result<Arc<dyn FallbackMetrics>> {
    match &config.prometheus {
        Some(prom) => {
            let metrics = PrometheusFallbackMetrics::new(&prom.registry).map_err(|e| {
                std::io::Error::other(format!("fallback metrics registration failed: {e}"))
            })?;
            Ok(Arc::new(metrics))
        }
        None => Ok(Arc::new(NoOpFallbackMetrics)),
    }
}

/// Fallback counters are a no-op when the metrics feature is disabled.
#[cfg(not(feature = "metrics"))]
fn build_fallback_metrics(_config: &ServerConfig) -> std::io::Result<Arc<dyn FallbackMetrics>> {
    Ok(Arc::new(NoOpFallbackMetrics))
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .wrap(Trace)
        .service(status)
        .service(ask_kuber)
        .service(buy_gold)
        .service(holdings)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] containing settings, binding and optional
///   persistence and metrics.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when building clients, binding the socket or
/// starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let fallback_metrics = build_fallback_metrics(&config)?;
    let http_state = web::Data::new(build_http_state(&config, fallback_metrics)?);
    let ServerConfig {
        bind_addr,
        #[cfg(feature = "metrics")]
        prometheus,
        ..
    } = config;

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(prometheus);

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
