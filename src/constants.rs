//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change a training default, only edit this file.

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Behavioral CAPTCHA";

/// Directory under the platform data dir holding models and exports
pub const DATA_DIR_NAME: &str = "behavioral-captcha";

/// Default model file name
pub const DEFAULT_MODEL_FILE: &str = "mouse_model.json";

/// Default sessions file (generator output)
pub const DEFAULT_SESSIONS_FILE: &str = "data/all_sessions.json";

// ============================================
// Training defaults
// ============================================

/// Number of trees in the forest
pub const DEFAULT_TREE_COUNT: usize = 100;

/// Maximum depth of each tree
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Minimum samples a node needs before it may be split
pub const DEFAULT_MIN_SAMPLES_SPLIT: usize = 2;

/// Share of each class held out for validation
pub const DEFAULT_VALIDATION_RATIO: f64 = 0.3;

/// Seed for bootstrap sampling and feature subsampling
pub const DEFAULT_RANDOM_SEED: u64 = 42;
