//! Configuration module

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_MAX_DEPTH, DEFAULT_MIN_SAMPLES_SPLIT, DEFAULT_RANDOM_SEED, DEFAULT_SESSIONS_FILE,
    DEFAULT_TREE_COUNT, DEFAULT_VALIDATION_RATIO,
};
use crate::logic::dataset::TimeUnit;
use crate::logic::model::{get_default_model_path, ForestParams};
use crate::logic::training::TrainingConfig;

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Where the trained model is saved and loaded
    pub model_path: PathBuf,

    /// Generator-format sessions used for training
    pub sessions_path: PathBuf,

    /// Unit of raw timestamps in input files
    pub time_unit: TimeUnit,

    /// Forest shape, seed and holdout ratio
    pub training: TrainingConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let forest = ForestParams {
            n_trees: parse_var(&lookup, "CAPTCHA_TREES").unwrap_or(DEFAULT_TREE_COUNT),
            max_depth: parse_var(&lookup, "CAPTCHA_MAX_DEPTH").unwrap_or(DEFAULT_MAX_DEPTH),
            min_samples_split: parse_var(&lookup, "CAPTCHA_MIN_SAMPLES_SPLIT")
                .unwrap_or(DEFAULT_MIN_SAMPLES_SPLIT),
            seed: parse_var(&lookup, "CAPTCHA_SEED").unwrap_or(DEFAULT_RANDOM_SEED),
            ..Default::default()
        };

        Self {
            model_path: lookup("CAPTCHA_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(get_default_model_path),

            sessions_path: lookup("CAPTCHA_SESSIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSIONS_FILE)),

            time_unit: parse_var(&lookup, "CAPTCHA_TIME_UNIT").unwrap_or_default(),

            training: TrainingConfig {
                forest,
                validation_ratio: parse_var(&lookup, "CAPTCHA_VALIDATION_RATIO")
                    .unwrap_or(DEFAULT_VALIDATION_RATIO),
            },
        }
    }
}

/// Parsed value of `key`; unparseable values fall back with a warning
fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}
