//! Features Module - Feature Extraction Engine
//!
//! Session → fixed-length numeric vector. This mapping is the whole
//! discriminative surface of the classifier; new features go here and in
//! `layout.rs` together, nothing downstream changes.

pub mod layout;
pub mod vector;
pub mod extractor;


// Re-export common types
pub use extractor::{compute_stats, extract, extract_all};
pub use layout::{FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION, LayoutInfo};
pub use vector::{FeatureVector, MovementStats};
