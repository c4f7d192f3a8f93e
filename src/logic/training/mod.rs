//! Training Module - fits the ensemble on labeled sessions

pub mod config;
pub mod split;
pub mod pipeline;

#[cfg(test)]
mod tests;

// Re-export common types
pub use config::TrainingConfig;
pub use pipeline::{train, train_with_config};
