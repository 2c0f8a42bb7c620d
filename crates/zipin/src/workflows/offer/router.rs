use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::warn;

use super::repository::{DealKey, DealMemory, RepositoryError};
use super::service::{
    CompsRequest, OfferService, OfferServiceError, QuoteRequest, SignalScanRequest,
};

/// Router builder exposing offer, deal-memory, comps, and signal endpoints.
pub fn offer_router<M>(service: Arc<OfferService<M>>) -> Router
where
    M: DealMemory + 'static,
{
    Router::new()
        .route("/api/v1/offers", post(quote_handler::<M>))
        .route(
            "/api/v1/deals",
            get(list_deals_handler::<M>).delete(clear_deals_handler::<M>),
        )
        .route("/api/v1/deals/:key", get(deal_handler::<M>))
        .route("/api/v1/comps", post(comps_handler::<M>))
        .route("/api/v1/signals/scan", post(signal_scan_handler::<M>))
        .with_state(service)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({ "error": message.into() });
    (status, axum::Json(payload)).into_response()
}

fn service_error_response(error: OfferServiceError) -> Response {
    match error {
        OfferServiceError::Validation(error) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, error.to_string())
        }
        OfferServiceError::Repository(RepositoryError::NotFound) => {
            error_response(StatusCode::NOT_FOUND, "deal not found")
        }
        other => {
            warn!(error = %other, "offer request failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

pub(crate) async fn quote_handler<M>(
    State(service): State<Arc<OfferService<M>>>,
    axum::Json(request): axum::Json<QuoteRequest>,
) -> Response
where
    M: DealMemory + 'static,
{
    match service.quote(request) {
        Ok(quote) => {
            let payload = json!({
                "deal_key": quote.deal_key,
                "recommendation": {
                    "code": quote.result.recommendation,
                    "headline": quote.result.recommendation.headline(),
                    "reason": quote.result.recommendation.reason(),
                },
                "result": quote.result,
                "comps": quote.comps,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn list_deals_handler<M>(State(service): State<Arc<OfferService<M>>>) -> Response
where
    M: DealMemory + 'static,
{
    match service.recent_deals() {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn deal_handler<M>(
    State(service): State<Arc<OfferService<M>>>,
    Path(key): Path<String>,
) -> Response
where
    M: DealMemory + 'static,
{
    match service.deal(&DealKey(key)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn clear_deals_handler<M>(
    State(service): State<Arc<OfferService<M>>>,
) -> Response
where
    M: DealMemory + 'static,
{
    match service.clear_deals() {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn comps_handler<M>(
    State(service): State<Arc<OfferService<M>>>,
    axum::Json(request): axum::Json<CompsRequest>,
) -> Response
where
    M: DealMemory + 'static,
{
    match service.evaluate_comps(&request) {
        Some(stats) => (StatusCode::OK, axum::Json(stats)).into_response(),
        None => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "at least one comp needs a positive price and square footage",
        ),
    }
}

pub(crate) async fn signal_scan_handler<M>(
    State(service): State<Arc<OfferService<M>>>,
    axum::Json(request): axum::Json<SignalScanRequest>,
) -> Response
where
    M: DealMemory + 'static,
{
    match service.scan_signals(&request) {
        Some(signal) => (StatusCode::OK, axum::Json(signal)).into_response(),
        None => error_response(StatusCode::UNPROCESSABLE_ENTITY, "provide an address or ZIP"),
    }
}
