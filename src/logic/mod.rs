//! Logic Module - Classification Engine
//!
//! - `session/` - Recorded mouse interactions
//! - `features/` - Session → feature vector
//! - `training/` - Fits the ensemble, records metadata
//! - `model/` - Ensemble, inference, persistence
//! - `evaluation/` - Held-out metrics
//! - `dataset/` - Session files in, feature records out

pub mod session;
pub mod features;
pub mod training;
pub mod model;
pub mod evaluation;
pub mod dataset;

#[cfg(test)]
pub mod testing;
