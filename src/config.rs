use serde::Deserialize;
use std::path::Path;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "BANKPREDICT_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Deserialize, Clone, Debug, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ModelConfig {
    #[serde(default = "default_model_path")]
    pub path: String,
    /// JSON sidecar with feature names and frozen category vocabularies.
    #[serde(default)]
    pub metadata_path: Option<String>,
    #[serde(default = "default_model_version")]
    pub version: String,
    /// Name of the graph output holding class probabilities.
    #[serde(default)]
    pub probability_output: Option<String>,
    #[serde(default = "default_intra_threads")]
    pub intra_threads: usize,
    #[serde(default = "default_threshold")]
    pub threshold: f32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_model_path() -> String {
    "models/lgbm_model.onnx".to_string()
}

fn default_model_version() -> String {
    "LGBM v1.0".to_string()
}

fn default_intra_threads() -> usize {
    4
}

fn default_threshold() -> f32 {
    0.5
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            metadata_path: None,
            version: default_model_version(),
            probability_output: None,
            intra_threads: default_intra_threads(),
            threshold: default_threshold(),
        }
    }
}

impl AppConfig {
    /// Reads the YAML config at `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Resolves the config location from `BANKPREDICT_CONFIG`, falling back to `config.yaml`.
    pub fn load_from_env() -> anyhow::Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(path)
    }
}
