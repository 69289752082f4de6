use crate::error::InferenceError;
use crate::preprocessing::RawRecord;
use crate::service::PredictionService;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shared Application State
pub struct AppState {
    pub service: PredictionService,
    pub model_version: String,
    pub metrics: Option<PrometheusHandle>,
}

// --- DTOs (Data Transfer Objects) ---

/// One bank customer. All fields are required; the JSON extractor rejects
/// records that miss one or carry the wrong type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerData {
    pub age: i64,
    pub job: String,
    pub marital: String,
    pub education: String,
    pub default: String,
    pub balance: f64,
    pub housing: String,
    pub loan: String,
    pub contact: String,
    pub day: i64,
    pub month: String,
    pub duration: i64,
    pub campaign: i64,
    pub pdays: i64,
    pub previous: i64,
    pub poutcome: String,
}

impl CustomerData {
    /// Field-name keyed record in declaration order.
    pub fn to_record(&self) -> Result<RawRecord, InferenceError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(InferenceError::InvalidRequest(format!(
                "customer did not serialize to an object: {other}"
            ))),
            Err(e) => Err(InferenceError::InvalidRequest(e.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub model_version: String,
}
