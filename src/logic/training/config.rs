//! Training configuration

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_VALIDATION_RATIO;
use crate::error::{CaptchaError, Result};
use crate::logic::model::ForestParams;

/// Training Configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Forest shape and random seed
    pub forest: ForestParams,

    /// Share of each class held out to measure accuracy (0.0 - <1.0)
    pub validation_ratio: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            forest: ForestParams::default(),
            validation_ratio: DEFAULT_VALIDATION_RATIO,
        }
    }
}

impl TrainingConfig {
    /// Fit on everything, report in-sample accuracy
    pub fn without_holdout() -> Self {
        Self {
            validation_ratio: 0.0,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.forest.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let forest = &self.forest;
        if forest.n_trees == 0 {
            return Err(CaptchaError::InvalidConfig("n_trees must be at least 1".to_string()));
        }
        if forest.max_depth == 0 {
            return Err(CaptchaError::InvalidConfig("max_depth must be at least 1".to_string()));
        }
        if forest.min_samples_split < 2 {
            return Err(CaptchaError::InvalidConfig(
                "min_samples_split must be at least 2".to_string(),
            ));
        }
        if forest.max_features == Some(0) {
            return Err(CaptchaError::InvalidConfig("max_features must be at least 1".to_string()));
        }
        if !(0.0..1.0).contains(&self.validation_ratio) {
            return Err(CaptchaError::InvalidConfig(format!(
                "validation_ratio {} outside [0, 1)",
                self.validation_ratio
            )));
        }
        Ok(())
    }
}
