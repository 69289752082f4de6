pub mod loader;
pub mod predictor;
pub mod schema;

pub use loader::LoadedModel;
pub use predictor::Predictor;
pub use schema::{ModelMetadata, TrainedSchema};
