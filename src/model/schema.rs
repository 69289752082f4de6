use crate::error::InferenceError;
use crate::model::predictor::Predictor;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Ordered feature names the model was fit on. Fixed once the model is loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainedSchema {
    features: Vec<String>,
    index: HashSet<String>,
}

impl TrainedSchema {
    pub fn new(features: Vec<String>) -> Result<Self, InferenceError> {
        let mut index = HashSet::with_capacity(features.len());
        for name in &features {
            if !index.insert(name.clone()) {
                return Err(InferenceError::MetadataError(format!(
                    "duplicate feature name '{name}'"
                )));
            }
        }
        Ok(Self { features, index })
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains(name)
    }
}

/// JSON sidecar exported next to the model at training time.
///
/// ```json
/// {
///   "feature_names": ["id", "age", "job", "..."],
///   "categories": { "job": ["admin", "blue-collar", "..."] }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(default)]
    pub feature_names: Vec<String>,
    /// Column name to training-time categories; a category's code is its index.
    #[serde(default)]
    pub categories: HashMap<String, Vec<String>>,
}

impl ModelMetadata {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            InferenceError::MetadataError(format!("reading {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            InferenceError::MetadataError(format!("parsing {}: {}", path.display(), e))
        })
    }
}

/// Determines the trained feature order.
///
/// Names listed in the sidecar win; otherwise the names embedded in the model
/// are used. Finding none is not fatal: the schema is empty and alignment
/// becomes a pass-through.
pub fn resolve_schema(
    model: &dyn Predictor,
    metadata: &ModelMetadata,
) -> Result<TrainedSchema, InferenceError> {
    let features = if !metadata.feature_names.is_empty() {
        metadata.feature_names.clone()
    } else {
        model.feature_names()?
    };

    if features.is_empty() {
        tracing::warn!("model exposes no feature names, inputs will not be aligned");
    } else {
        tracing::info!(count = features.len(), features = ?features, "resolved trained feature schema");
    }

    TrainedSchema::new(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::predictor::tests::StubPredictor;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_schema_rejects_duplicates() {
        let result = TrainedSchema::new(names(&["age", "job", "age"]));
        match result {
            Err(InferenceError::MetadataError(msg)) => assert!(msg.contains("age")),
            other => panic!("Expected MetadataError, got {other:?}"),
        }
    }

    #[test]
    fn test_schema_lookup() {
        let schema = TrainedSchema::new(names(&["id", "age"])).unwrap();
        assert_eq!(schema.len(), 2);
        assert!(schema.contains("id"));
        assert!(!schema.contains("job"));
        assert_eq!(schema.features(), names(&["id", "age"]).as_slice());
    }

    #[test]
    fn test_resolve_prefers_sidecar() {
        let model = StubPredictor::constant(0.3).with_feature_names(&["from_model"]);
        let metadata = ModelMetadata {
            feature_names: names(&["a", "b"]),
            ..Default::default()
        };
        let schema = resolve_schema(&model, &metadata).unwrap();
        assert_eq!(schema.features(), names(&["a", "b"]).as_slice());
    }

    #[test]
    fn test_resolve_falls_back_to_model() {
        let model = StubPredictor::constant(0.3).with_feature_names(&["id", "age"]);
        let schema = resolve_schema(&model, &ModelMetadata::default()).unwrap();
        assert_eq!(schema.features(), names(&["id", "age"]).as_slice());
    }

    #[test]
    fn test_resolve_without_names_is_empty() {
        let model = StubPredictor::constant(0.3);
        let schema = resolve_schema(&model, &ModelMetadata::default()).unwrap();
        assert!(schema.is_empty());
    }

    #[test]
    fn test_metadata_load() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"feature_names": ["id", "job"], "categories": {{"job": ["admin", "unknown"]}}}}"#
        )
        .unwrap();

        let metadata = ModelMetadata::load(file.path()).unwrap();
        assert_eq!(metadata.feature_names, names(&["id", "job"]));
        assert_eq!(metadata.categories["job"], names(&["admin", "unknown"]));
    }

    #[test]
    fn test_metadata_fields_optional() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();
        assert_eq!(ModelMetadata::load(file.path()).unwrap(), ModelMetadata::default());
    }

    #[test]
    fn test_metadata_malformed() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            ModelMetadata::load(file.path()),
            Err(InferenceError::MetadataError(_))
        ));
    }
}
