//! Per-class feature statistics

use serde::Serialize;

use crate::logic::features::{layout, FeatureVector, FEATURE_COUNT};
use crate::logic::session::Label;

/// Mean of every feature over the vectors of one class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSummary {
    pub label: Label,
    pub count: usize,
    /// FEATURE_LAYOUT order
    pub means: [f64; FEATURE_COUNT],
}

impl ClassSummary {
    pub fn mean(&self, feature: &str) -> Option<f64> {
        layout::feature_index(feature).map(|i| self.means[i])
    }
}

/// Per-class means, HUMAN then BOT. Unlabeled vectors are skipped and
/// classes with no vectors are omitted.
pub fn class_means(vectors: &[FeatureVector]) -> Vec<ClassSummary> {
    Label::ALL
        .iter()
        .filter_map(|&label| {
            let rows: Vec<_> = vectors
                .iter()
                .filter(|v| v.label == Some(label))
                .map(|v| v.to_row())
                .collect();
            if rows.is_empty() {
                return None;
            }

            let mut means = [0.0; FEATURE_COUNT];
            for row in &rows {
                for (sum, value) in means.iter_mut().zip(row) {
                    *sum += value;
                }
            }
            for sum in means.iter_mut() {
                *sum /= rows.len() as f64;
            }

            Some(ClassSummary { label, count: rows.len(), means })
        })
        .collect()
}
