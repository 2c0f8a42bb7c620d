use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryDealMemory};
use crate::routes::with_offer_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use zipin::config::AppConfig;
use zipin::error::AppError;
use zipin::telemetry;
use zipin::workflows::offer::OfferService;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let memory = Arc::new(InMemoryDealMemory::with_capacity(
        config.offer.deal_memory_capacity,
    ));
    let offer_service = Arc::new(OfferService::new(memory, config.offer.clone()));

    let app = with_offer_routes(offer_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        band = config.offer.band.label(),
        deal_memory = config.offer.deal_memory_capacity,
        "offer valuation service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
