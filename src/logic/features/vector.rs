//! Feature Vector - Core data structure for ML input
//!
//! Uses the centralized layout from `layout.rs` for consistent ordering
//! whenever the vector is flattened into a model row.

use serde::{Deserialize, Serialize};

use super::layout::{FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION, layout_hash};
use crate::logic::session::Label;

// ============================================================================
// MOVEMENT STATISTICS
// ============================================================================

/// The numeric statistics of one session, computed from points alone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementStats {
    pub num_points: usize,
    pub max_speed: f64,
    pub std_speed: f64,
    pub session_duration: f64,
}

impl MovementStats {
    /// Flatten in FEATURE_LAYOUT order
    pub fn to_row(&self) -> [f64; FEATURE_COUNT] {
        [
            self.num_points as f64,
            self.max_speed,
            self.std_speed,
            self.session_duration,
        ]
    }
}

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Statistics of one session plus the pass-through label.
///
/// Derived from a `Session`; never edited in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    #[serde(flatten)]
    pub stats: MovementStats,
    pub label: Option<Label>,
}

impl FeatureVector {
    pub fn new(stats: MovementStats, label: Option<Label>) -> Self {
        Self { stats, label }
    }

    pub fn num_points(&self) -> usize {
        self.stats.num_points
    }

    pub fn max_speed(&self) -> f64 {
        self.stats.max_speed
    }

    pub fn std_speed(&self) -> f64 {
        self.stats.std_speed
    }

    pub fn session_duration(&self) -> f64 {
        self.stats.session_duration
    }

    /// Numeric fields in FEATURE_LAYOUT order (label excluded)
    pub fn to_row(&self) -> [f64; FEATURE_COUNT] {
        self.stats.to_row()
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "feature_version": FEATURE_VERSION,
            "layout_hash": layout_hash(),
            "named_values": FEATURE_LAYOUT.iter()
                .zip(self.to_row().iter())
                .map(|(name, value)| (name.to_string(), *value))
                .collect::<std::collections::BTreeMap<_, _>>(),
            "label": self.label,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
