//! Operational endpoints: liveness of the book store and Prometheus scraping.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use data_store::DataStore;
use domain::BookId;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;

use super::books::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub listeners: usize,
    pub background_consumers: usize,
}

/// GET /health: probes the book store and reports the dispatch wiring.
///
/// Answers 503 with status `degraded` when the store cannot be read.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let (code, status) = match state.store.exists_by_id(BookId::new()).await {
        Ok(_) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::warn!(error = %e, "book store health probe failed");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded")
        }
    };

    let body = HealthResponse {
        status,
        listeners: state.dispatcher.listener_count(),
        background_consumers: state.broadcast.subscriber_count(),
    };
    (code, Json(body))
}

/// GET /metrics: Prometheus text exposition.
pub async fn metrics(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        handle.render(),
    )
}
