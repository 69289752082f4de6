pub mod config;
pub mod error;
pub mod model;
pub mod preprocessing;
pub mod server;
pub mod service;
pub mod telemetry;


// Re-export common types
pub use error::InferenceError;
pub use service::{PredictionResult, PredictionService};
