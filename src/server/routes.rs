use crate::server::{handlers, types::AppState};
use crate::service::PredictionService;
use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

pub fn create_router(
    service: PredictionService,
    model_version: String,
    metrics: Option<PrometheusHandle>,
) -> Router {
    let state = Arc::new(AppState {
        service,
        model_version,
        metrics,
    });

    Router::new()
        .route("/", get(handlers::health_check))
        .route("/predict", post(handlers::predict))
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
}
