//! End-to-end prediction: records in, one result per record out.

use crate::error::InferenceError;
use crate::model::LoadedModel;
use crate::preprocessing::{align, Frame, RawRecord};
use ndarray::Array2;
use serde::Serialize;
use std::time::Instant;

pub const DEFAULT_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub probability_subscribe: f32,
    pub prediction: u8,
}

impl PredictionResult {
    /// Labels the record positive only when `probability` is strictly above `threshold`.
    pub fn from_probability(probability: f32, threshold: f32) -> Self {
        Self {
            probability_subscribe: probability,
            prediction: u8::from(probability > threshold),
        }
    }
}

pub struct PredictionService {
    model: LoadedModel,
    threshold: f32,
}

impl PredictionService {
    pub fn new(model: LoadedModel, threshold: f32) -> Self {
        Self { model, threshold }
    }

    pub fn model(&self) -> &LoadedModel {
        &self.model
    }

    /// Encodes and aligns `records` into the model's input matrix.
    pub fn prepare(&self, records: &[RawRecord]) -> Result<Array2<f32>, InferenceError> {
        let frame = Frame::from_records(records);
        let encoded = self.model.encoder.encode(frame);
        let aligned = align(encoded, &self.model.schema);
        aligned.to_matrix()
    }

    /// Runs the whole pipeline. Results keep the order of `records`.
    pub fn predict(&self, records: &[RawRecord]) -> Result<Vec<PredictionResult>, InferenceError> {
        let features = self.prepare(records)?;

        let predictor = self
            .model
            .predictor
            .as_ref()
            .ok_or(InferenceError::ModelUnavailable)?;

        let start = Instant::now();
        let probabilities = predictor.predict_proba(features.view())?;
        metrics::histogram!("inference_duration_seconds", start.elapsed().as_secs_f64());

        if probabilities.len() != records.len() {
            return Err(InferenceError::ShapeMismatch {
                expected: vec![records.len()],
                got: vec![probabilities.len()],
            });
        }

        Ok(probabilities
            .into_iter()
            .map(|p| PredictionResult::from_probability(p, self.threshold))
            .collect())
    }
}
