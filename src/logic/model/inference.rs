//! Inference Engine - session verdicts from a trained forest
//!
//! Pure functions over a read-only `TrainedModel`; callers may share one
//! model across threads without coordination.

use ndarray::aview1;
use serde::{Deserialize, Serialize};

use super::artifact::TrainedModel;
use super::classifier::{ClassProbabilities, Classifier};
use crate::error::Result;
use crate::logic::features::{self, FeatureVector};
use crate::logic::session::{Label, Session};

/// Prediction output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: Label,
    /// Probability of `label`, 0.0 - 1.0
    pub confidence: f64,
    pub probabilities: ClassProbabilities,
}

impl PredictionResult {
    pub fn is_bot(&self) -> bool {
        self.label == Label::Bot
    }
}

/// Extract features from `session` and classify it
pub fn predict(model: &TrainedModel, session: &Session) -> Result<PredictionResult> {
    let vector = features::extract(session)?;
    predict_features(model, &vector)
}

/// Classify an already extracted feature vector
pub fn predict_features(model: &TrainedModel, vector: &FeatureVector) -> Result<PredictionResult> {
    let start_time = std::time::Instant::now();
    model.validate_schema()?;

    let row = vector.to_row();
    let probabilities = model.forest().predict_proba(aview1(&row))?;
    let label = probabilities.label();

    log::debug!(
        "Predicted {} (p={:.3}) in {}us for {}",
        label,
        probabilities.confidence(),
        start_time.elapsed().as_micros(),
        vector.to_log_entry()
    );

    Ok(PredictionResult {
        label,
        confidence: probabilities.confidence(),
        probabilities,
    })
}

/// Classify each session independently, aborting on the first failure.
///
/// Errors carry the index of the offending session.
pub fn predict_batch(model: &TrainedModel, sessions: &[Session]) -> Result<Vec<PredictionResult>> {
    sessions
        .iter()
        .enumerate()
        .map(|(i, s)| predict(model, s).map_err(|e| e.at_session(i)))
        .collect()
}
