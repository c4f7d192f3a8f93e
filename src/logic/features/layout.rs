//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! Trained models carry the layout they were fitted on; inference refuses
//! to run a model whose layout differs from this one.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::error::{CaptchaError, Result};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in a model input row
pub const FEATURE_LAYOUT: &[&str] = &[
    "num_points",       // 0: Number of samples in the session
    "max_speed",        // 1: Peak instantaneous speed (px/s)
    "std_speed",        // 2: Population std-dev of instantaneous speed
    "session_duration", // 3: Last minus first timestamp (s)
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 4;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over version + ordered feature names
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Current layout as owned names, as stored in a model artifact
pub fn feature_order() -> Vec<String> {
    FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_names: feature_order(),
        }
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Validate a model's recorded layout against the extractor's layout.
///
/// Names must match exactly and in order; version and hash must agree too.
/// There is no reordering fallback.
pub fn validate_layout(info: &LayoutInfo) -> Result<()> {
    let current = LayoutInfo::current();

    if info.feature_names != current.feature_names
        || info.version != current.version
        || info.hash != current.hash
    {
        return Err(CaptchaError::SchemaMismatch {
            expected: info.feature_names.clone(),
            actual: current.feature_names,
        });
    }

    Ok(())
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

// ============================================================================
// TESTS
// ============================================================================
