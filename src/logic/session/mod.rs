//! Session Module - Recorded Mouse Interactions
//!
//! Canonical representation of one captured session: ordered movement
//! samples plus an optional ground-truth label.

pub mod types;


// Re-export common types
pub use types::{Label, MovementSample, Session};
