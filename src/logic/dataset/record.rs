use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::logic::features::{layout, FeatureVector, FEATURE_LAYOUT, FEATURE_VERSION};
use crate::logic::session::Label;

/// One exported row: the features of a session under a named layout
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub session_id: Option<String>,

    // Feature contract
    pub feature_version: u8,
    pub layout_hash: u32,
    pub features: BTreeMap<String, f64>,

    pub label: Option<Label>,
}

impl FeatureRecord {
    pub fn from_vector(session_id: Option<&str>, vector: &FeatureVector) -> Self {
        let features = FEATURE_LAYOUT
            .iter()
            .zip(vector.to_row())
            .map(|(name, value)| (name.to_string(), value))
            .collect();

        Self {
            session_id: session_id.map(str::to_string),
            feature_version: FEATURE_VERSION,
            layout_hash: layout::layout_hash(),
            features,
            label: vector.label,
        }
    }
}
