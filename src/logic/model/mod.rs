//! Model Module - Ensemble Classifier & Inference Engine
//!
//! Forest internals sit behind the `Classifier` contract; prediction and
//! persistence only see `TrainedModel`.

pub mod classifier;
pub mod tree;
pub mod forest;
pub mod artifact;
pub mod storage;
pub mod inference;

#[cfg(test)]
mod tests;

// Re-export common types
pub use artifact::{ModelMetadata, TrainedModel};
pub use classifier::{ClassProbabilities, Classifier};
pub use forest::{ForestParams, RandomForest};
pub use inference::{predict, predict_batch, predict_features, PredictionResult};
pub use storage::{get_default_model_path, load_model, save_model};
