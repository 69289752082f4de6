use crate::config::ModelConfig;
use crate::error::InferenceError;
use crate::model::predictor::{positive_class_probabilities, Predictor};
use crate::model::schema::{resolve_schema, ModelMetadata, TrainedSchema};
use crate::preprocessing::CategoricalEncoder;
use ndarray::ArrayView2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Custom ONNX metadata key holding the feature names as a JSON array.
pub const FEATURE_NAMES_KEY: &str = "feature_names";
/// Output name used by LightGBM/sklearn ONNX converters with `zipmap=False`.
pub const DEFAULT_PROBABILITY_OUTPUT: &str = "probabilities";

// Initialize the global environment for ORT (only needed once)
pub fn init_ort() -> Result<(), InferenceError> {
    ort::init().with_name("bankpredict").commit()?;
    Ok(())
}

/// Loads an ONNX model from disk and creates an inference session.
///
/// # Arguments
/// * `model_path` - Path to the .onnx file
/// * `intra_threads` - Parallelism within a single operator
pub fn load_model(
    model_path: impl AsRef<Path>,
    intra_threads: usize,
) -> Result<Session, InferenceError> {
    let path = model_path.as_ref();
    if !path.exists() {
        return Err(InferenceError::ModelNotFound(path.display().to_string()));
    }

    let session = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(intra_threads)?
        .commit_from_file(path)?;

    tracing::info!(path = %path.display(), "loaded model");
    for (i, input) in session.inputs.iter().enumerate() {
        tracing::debug!(index = i, name = %input.name, kind = ?input.input_type, "model input");
    }
    for (i, output) in session.outputs.iter().enumerate() {
        tracing::debug!(index = i, name = %output.name, "model output");
    }

    Ok(session)
}

/// Picks the probability output: the configured name, else the conventional
/// `probabilities`, else the last output.
pub fn select_probability_output(
    outputs: &[&str],
    configured: Option<&str>,
) -> Result<usize, InferenceError> {
    if let Some(name) = configured {
        return outputs.iter().position(|o| *o == name).ok_or_else(|| {
            InferenceError::MetadataError(format!(
                "model has no output named '{name}' (outputs: {outputs:?})"
            ))
        });
    }
    if let Some(idx) = outputs.iter().position(|o| *o == DEFAULT_PROBABILITY_OUTPUT) {
        return Ok(idx);
    }
    outputs
        .len()
        .checked_sub(1)
        .ok_or_else(|| InferenceError::MetadataError("model has no outputs".to_string()))
}

/// [`Predictor`] backed by an ONNX Runtime session.
pub struct OnnxPredictor {
    // Session::run needs &mut
    session: Mutex<Session>,
    input_name: String,
    output_index: usize,
}

impl OnnxPredictor {
    pub fn new(session: Session, probability_output: Option<&str>) -> Result<Self, InferenceError> {
        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| InferenceError::MetadataError("model has no inputs".to_string()))?;
        let output_names: Vec<&str> = session.outputs.iter().map(|o| o.name.as_str()).collect();
        let output_index = select_probability_output(&output_names, probability_output)?;

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_index,
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Session>, InferenceError> {
        self.session
            .lock()
            .map_err(|_| InferenceError::OrtError(ort::Error::new("session lock poisoned")))
    }
}

impl Predictor for OnnxPredictor {
    fn predict_proba(&self, features: ArrayView2<'_, f32>) -> Result<Vec<f32>, InferenceError> {
        let rows = features.nrows();
        let shape = vec![rows, features.ncols()];
        let data: Box<[f32]> = features.iter().copied().collect();
        let input_value = Value::from_array((shape, data))?;

        let mut session_guard = self.lock()?;
        let outputs = session_guard.run(ort::inputs![self.input_name.clone() => input_value])?;

        let (shape, data) = outputs[self.output_index].try_extract_tensor::<f32>()?;
        let dims: Vec<usize> = shape.iter().map(|&x| x as usize).collect();
        positive_class_probabilities(&dims, data, rows)
    }

    fn feature_names(&self) -> Result<Vec<String>, InferenceError> {
        let session_guard = self.lock()?;
        let metadata = session_guard.metadata()?;
        match metadata.custom(FEATURE_NAMES_KEY)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                InferenceError::MetadataError(format!("'{FEATURE_NAMES_KEY}' is not a JSON array: {e}"))
            }),
            None => Ok(Vec::new()),
        }
    }
}

/// Everything derived from the model artifact at startup. Read-only afterwards.
#[derive(Clone, Default)]
pub struct LoadedModel {
    /// `None` when the artifact could not be loaded.
    pub predictor: Option<Arc<dyn Predictor>>,
    pub schema: TrainedSchema,
    pub encoder: CategoricalEncoder,
}

impl LoadedModel {
    /// Builds the model state from a predictor and its (possibly empty) sidecar.
    pub fn from_parts(
        predictor: Arc<dyn Predictor>,
        metadata: &ModelMetadata,
    ) -> Result<Self, InferenceError> {
        let schema = resolve_schema(predictor.as_ref(), metadata)?;
        let encoder = CategoricalEncoder::new(&metadata.categories);

        let batch_fitted = encoder.batch_fitted_columns();
        if !batch_fitted.is_empty() {
            tracing::warn!(
                columns = ?batch_fitted,
                "no frozen vocabulary for these categorical columns, codes will be fitted per batch"
            );
        }

        Ok(Self {
            predictor: Some(predictor),
            schema,
            encoder,
        })
    }

    /// State used when no model is available: every prediction fails cleanly.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn is_available(&self) -> bool {
        self.predictor.is_some()
    }
}

/// Loads the configured model and sidecar. Never fails: any problem is logged
/// and yields an unavailable model so the server still starts.
pub fn load_from_config(config: &ModelConfig) -> LoadedModel {
    match try_load(config) {
        Ok(model) => model,
        Err(InferenceError::ModelNotFound(path)) => {
            tracing::warn!(%path, "model file not found, predictions are disabled");
            LoadedModel::unavailable()
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to load model, predictions are disabled");
            LoadedModel::unavailable()
        }
    }
}

fn try_load(config: &ModelConfig) -> Result<LoadedModel, InferenceError> {
    let session = load_model(&config.path, config.intra_threads)?;
    let predictor = OnnxPredictor::new(session, config.probability_output.as_deref())?;
    let metadata = load_metadata(config.metadata_path.as_deref())?;
    LoadedModel::from_parts(Arc::new(predictor), &metadata)
}

/// A configured but absent sidecar is tolerated; a malformed one is not.
fn load_metadata(path: Option<&str>) -> Result<ModelMetadata, InferenceError> {
    match path {
        Some(path) if Path::new(path).exists() => ModelMetadata::load(path),
        Some(path) => {
            tracing::warn!(%path, "model metadata sidecar not found");
            Ok(ModelMetadata::default())
        }
        None => Ok(ModelMetadata::default()),
    }
}
