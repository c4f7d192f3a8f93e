//! Trained model artifact
//!
//! A fitted forest plus the metadata needed to use it safely: the feature
//! layout it was trained on, and how well it did.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::forest::{ForestParams, RandomForest};
use crate::error::Result;
use crate::logic::features::layout::{validate_layout, LayoutInfo};

/// Model metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub feature_version: u8,
    pub layout_hash: u32,
    /// Feature names in the order the forest consumes them
    pub feature_order: Vec<String>,
    /// Held-out accuracy, or in-sample when nothing was held out
    pub training_accuracy: f64,
    pub trained_at: DateTime<Utc>,
    pub training_samples: usize,
    pub validation_samples: usize,
    /// Aligned with `feature_order`
    pub feature_importances: Vec<f64>,
    pub params: ForestParams,
}

impl ModelMetadata {
    pub fn layout(&self) -> LayoutInfo {
        LayoutInfo {
            version: self.feature_version,
            hash: self.layout_hash,
            feature_names: self.feature_order.clone(),
        }
    }
}

/// Immutable once built; re-training produces a new instance.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    metadata: ModelMetadata,
    forest: RandomForest,
}

impl TrainedModel {
    pub(crate) fn new(metadata: ModelMetadata, forest: RandomForest) -> Self {
        Self { metadata, forest }
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }

    pub fn feature_order(&self) -> &[String] {
        &self.metadata.feature_order
    }

    pub fn training_accuracy(&self) -> f64 {
        self.metadata.training_accuracy
    }

    /// Importances paired with feature names, most important first
    pub fn ranked_importances(&self) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> = self
            .metadata
            .feature_order
            .iter()
            .cloned()
            .zip(self.metadata.feature_importances.iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    /// Fails with `SchemaMismatch` unless the model's layout is exactly the
    /// extractor's current one
    pub fn validate_schema(&self) -> Result<()> {
        validate_layout(&self.metadata.layout())
    }

    #[cfg(test)]
    pub(crate) fn metadata_mut(&mut self) -> &mut ModelMetadata {
        &mut self.metadata
    }
}
