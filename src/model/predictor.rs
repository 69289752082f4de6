use crate::error::InferenceError;
use ndarray::{ArrayView2, ArrayViewD, Axis};

/// Binary classifier treated as a black box.
pub trait Predictor: Send + Sync {
    /// Positive-class probability for every row of `features`, in row order.
    fn predict_proba(&self, features: ArrayView2<'_, f32>) -> Result<Vec<f32>, InferenceError>;

    /// Feature names recorded in the model itself, if any.
    fn feature_names(&self) -> Result<Vec<String>, InferenceError> {
        Ok(Vec::new())
    }
}

/// Pulls the positive-class column out of a classifier's probability output.
///
/// Accepts `[rows, 2]` (class 0, class 1) as produced by tree-ensemble
/// classifiers, or `[rows]` / `[rows, 1]` holding the positive class directly.
pub fn positive_class_probabilities(
    dims: &[usize],
    data: &[f32],
    rows: usize,
) -> Result<Vec<f32>, InferenceError> {
    let output = ArrayViewD::from_shape(dims, data)?;

    let probabilities: Vec<f32> = match dims {
        [n] if *n == rows => output.iter().copied().collect(),
        [n, 1] if *n == rows => output.iter().copied().collect(),
        [n, 2] if *n == rows => output.index_axis(Axis(1), 1).iter().copied().collect(),
        _ => {
            return Err(InferenceError::ShapeMismatch {
                expected: vec![rows, 2],
                got: dims.to_vec(),
            })
        }
    };

    Ok(probabilities.into_iter().map(|p| p.clamp(0.0, 1.0)).collect())
}
