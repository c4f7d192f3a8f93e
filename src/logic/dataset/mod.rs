//! Dataset Module - session input and feature output
//!
//! Loads generator-format session files and exports versioned feature
//! records as JSONL for offline analysis.

pub mod loader;
pub mod record;
pub mod export;
pub mod summary;


use std::path::PathBuf;

use crate::constants::DATA_DIR_NAME;

pub use export::{features_to_jsonl, read_jsonl};
pub use loader::{load_sessions, parse_sessions, TimeUnit};
pub use record::FeatureRecord;
pub use summary::{class_means, ClassSummary};

/// Get the base directory for models and exports
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}
