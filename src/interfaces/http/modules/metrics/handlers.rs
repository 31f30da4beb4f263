//! Prometheus metrics handler

use axum::extract::State;
use metrics_exporter_prometheus::PrometheusHandle;

/// Application state for the metrics endpoint.
#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
}

/// Prometheus text exposition of all recorded metrics
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Metrics",
    responses((status = 200, description = "Prometheus text format", body = String))
)]
pub async fn metrics(State(state): State<MetricsState>) -> String {
    state.handle.render()
}
