//! Session Loader
//!
//! Reads recorded sessions from the generator's JSON format. Accepts an
//! array of session records, a single record, or a bare array of points
//! (one unlabeled live session).

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::Result;
use crate::logic::session::{Label, MovementSample, Session};

/// Unit of the raw `t` values in an input file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeUnit {
    /// Epoch milliseconds, as the session generator writes them
    #[default]
    Milliseconds,
    Seconds,
}

impl TimeUnit {
    /// Multiplier that turns a raw delta into seconds
    pub fn to_seconds(&self) -> f64 {
        match self {
            TimeUnit::Milliseconds => 1e-3,
            TimeUnit::Seconds => 1.0,
        }
    }
}

impl FromStr for TimeUnit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ms" | "millis" | "milliseconds" => Ok(TimeUnit::Milliseconds),
            "s" | "sec" | "seconds" => Ok(TimeUnit::Seconds),
            other => Err(format!("unknown time unit: {}", other)),
        }
    }
}

// ============================================================================
// WIRE FORMAT
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawPoint {
    x: f64,
    y: f64,
    t: f64,
}

// `metadata` is not declared: browser / OS info and the recorded duration
// never reach the extractor.
#[derive(Debug, Deserialize)]
struct RawSession {
    #[serde(default)]
    session_id: Option<String>,
    #[serde(rename = "type", default)]
    label: Option<Label>,
    movements: Vec<RawPoint>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawInput {
    Sessions(Vec<RawSession>),
    Single(RawSession),
    Points(Vec<RawPoint>),
}

// ============================================================================
// LOADING
// ============================================================================

/// Load every session in a JSON file
pub fn load_sessions(path: &Path, unit: TimeUnit) -> Result<Vec<Session>> {
    let content = fs::read_to_string(path)?;
    let sessions = parse_sessions(&content, unit)?;
    log::info!("Loaded {} sessions from {:?}", sessions.len(), path);
    Ok(sessions)
}

/// Parse sessions from JSON text
pub fn parse_sessions(json: &str, unit: TimeUnit) -> Result<Vec<Session>> {
    let sessions = match serde_json::from_str::<RawInput>(json)? {
        RawInput::Sessions(raw) => raw.into_iter().map(|s| convert(s, unit)).collect(),
        RawInput::Single(raw) => vec![convert(raw, unit)],
        RawInput::Points(points) => vec![Session::unlabeled(normalize(&points, unit))],
    };
    Ok(sessions)
}

fn convert(raw: RawSession, unit: TimeUnit) -> Session {
    let session = Session::new(normalize(&raw.movements, unit), raw.label);
    match raw.session_id {
        Some(id) => session.with_id(id),
        None => session,
    }
}

/// Shift timestamps to start at zero and rescale to seconds
fn normalize(points: &[RawPoint], unit: TimeUnit) -> Vec<MovementSample> {
    let Some(origin) = points.first().map(|p| p.t) else {
        return Vec::new();
    };
    let scale = unit.to_seconds();

    points
        .iter()
        .map(|p| MovementSample::new(p.x, p.y, (p.t - origin) * scale))
        .collect()
}
