use axum::{extract::State, Json};
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::Instant;

use crate::error::InferenceError;
use crate::server::types::*;
use crate::service::PredictionResult;

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model_version: state.model_version.clone(),
    })
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Vec<CustomerData>>,
) -> Result<Json<Vec<PredictionResult>>, InferenceError> {
    if payload.is_empty() {
        return Err(InferenceError::InvalidRequest(
            "expected at least one customer record".to_string(),
        ));
    }

    let start = Instant::now();
    counter!("predict_requests_total", 1);
    histogram!("predict_batch_size", payload.len() as f64);

    let records = payload
        .iter()
        .map(CustomerData::to_record)
        .collect::<Result<Vec<_>, _>>()?;

    let results = state.service.predict(&records).map_err(|e| {
        counter!("predict_errors_total", 1);
        tracing::warn!(error = %e, batch = records.len(), "prediction failed");
        e
    })?;

    tracing::debug!(
        batch = results.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "prediction served"
    );

    Ok(Json(results))
}

/// Prometheus text exposition. Empty when no recorder was installed.
pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}
