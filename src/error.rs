use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ndarray::ShapeError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Model not found at path: {0}")]
    ModelNotFound(String),

    #[error("Model not loaded.")]
    ModelUnavailable,

    #[error("ONNX Runtime error: {0}")]
    OrtError(#[from] ort::Error),

    #[error("Model metadata error: {0}")]
    MetadataError(String),

    #[error("Output shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("Preprocessing error: {0}")]
    PreprocessingError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Shape error: {0}")]
    ShapeError(#[from] ShapeError),
}

impl IntoResponse for InferenceError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            InferenceError::ModelUnavailable => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            InferenceError::ModelNotFound(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            InferenceError::PreprocessingError(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            InferenceError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            InferenceError::ShapeMismatch { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            InferenceError::ShapeError(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
