//! Session Types
//!
//! Core types for recorded mouse interactions.
//! No feature logic here - only data structures.

use serde::{Deserialize, Serialize};

// ============================================================================
// LABEL
// ============================================================================

/// Ground-truth / predicted class of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Human,
    Bot,
}

impl Label {
    /// Both classes, in class-index order
    pub const ALL: [Label; 2] = [Label::Human, Label::Bot];

    /// Position of this class in probability / count arrays
    pub fn index(&self) -> usize {
        match self {
            Label::Human => 0,
            Label::Bot => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Label> {
        Label::ALL.get(index).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Human => "human",
            Label::Bot => "bot",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" => Ok(Label::Human),
            "bot" => Ok(Label::Bot),
            other => Err(format!("unknown label: {}", other)),
        }
    }
}

// ============================================================================
// MOVEMENT SAMPLE
// ============================================================================

/// One point on a trajectory. `t` is seconds since session start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementSample {
    pub x: f64,
    pub y: f64,
    pub t: f64,
}

impl MovementSample {
    pub fn new(x: f64, y: f64, t: f64) -> Self {
        Self { x, y, t }
    }
}

impl From<(f64, f64, f64)> for MovementSample {
    fn from((x, y, t): (f64, f64, f64)) -> Self {
        Self::new(x, y, t)
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// One recorded interaction. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: Option<String>,
    points: Vec<MovementSample>,
    label: Option<Label>,
}

impl Session {
    pub fn new(points: Vec<MovementSample>, label: Option<Label>) -> Self {
        Self { id: None, points, label }
    }

    /// Labeled session for training / evaluation
    pub fn labeled(points: Vec<MovementSample>, label: Label) -> Self {
        Self::new(points, Some(label))
    }

    /// Unlabeled session for live inference
    pub fn unlabeled(points: Vec<MovementSample>) -> Self {
        Self::new(points, None)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn points(&self) -> &[MovementSample] {
        &self.points
    }

    pub fn label(&self) -> Option<Label> {
        self.label
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
