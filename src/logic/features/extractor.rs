//! Movement Feature Extraction
//!
//! Turns a session's point sequence into the fixed statistics the
//! classifier consumes. The numeric part only ever sees `&[MovementSample]`,
//! so the label cannot influence it.

use super::vector::{FeatureVector, MovementStats};
use crate::error::{CaptchaError, Result};
use crate::logic::session::{MovementSample, Session};

/// Minimum samples for any feature to be computable
pub const MIN_POINTS: usize = 2;

/// Extract the feature vector of a session, tagging it with the session label
pub fn extract(session: &Session) -> Result<FeatureVector> {
    let stats = compute_stats(session.points())?;
    Ok(FeatureVector::new(stats, session.label()))
}

/// Extract a batch, aborting on the first malformed session.
///
/// Errors carry the index of the offending session.
pub fn extract_all(sessions: &[Session]) -> Result<Vec<FeatureVector>> {
    sessions
        .iter()
        .enumerate()
        .map(|(i, s)| extract(s).map_err(|e| e.at_session(i)))
        .collect()
}

/// Compute movement statistics from points alone
pub fn compute_stats(points: &[MovementSample]) -> Result<MovementStats> {
    validate_points(points)?;

    let speeds = instantaneous_speeds(points);
    if let Some(pair) = speeds.iter().position(|s| !s.is_finite()) {
        return Err(CaptchaError::MalformedSample {
            sample: pair + 1,
            reason: "speed overflows",
            session: None,
        });
    }
    let max_speed = speeds.iter().copied().fold(0.0f64, f64::max);
    let std_speed = population_std(&speeds);

    let last = points.len() - 1;
    let session_duration = points[last].t - points[0].t;
    if session_duration == 0.0 {
        log::warn!("Session of {} points has zero duration", points.len());
    }

    let stats = MovementStats {
        num_points: points.len(),
        max_speed,
        std_speed,
        session_duration,
    };
    // Finite inputs can still overflow once subtracted or squared
    if stats.to_row().iter().any(|v| !v.is_finite()) {
        return Err(CaptchaError::MalformedSample {
            sample: last,
            reason: "feature overflow",
            session: None,
        });
    }
    Ok(stats)
}

/// Speed per consecutive pair. Same-timestamp pairs contribute zero.
pub fn instantaneous_speeds(points: &[MovementSample]) -> Vec<f64> {
    points
        .windows(2)
        .map(|pair| {
            let (a, b) = (pair[0], pair[1]);
            let distance = (b.x - a.x).hypot(b.y - a.y);
            let dt = b.t - a.t;
            if dt > 0.0 {
                distance / dt
            } else {
                0.0
            }
        })
        .collect()
}

/// Population standard deviation (0 for fewer than two values)
pub fn population_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    // Work on values scaled by the largest magnitude so squaring cannot overflow
    let scale = values.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return if scale == 0.0 { 0.0 } else { f64::NAN };
    }

    let n = values.len() as f64;
    let mean = values.iter().map(|v| v / scale).sum::<f64>() / n;
    let variance = values.iter().map(|v| (v / scale - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt() * scale
}

/// Structural well-formedness: enough points, finite values, monotonic time
fn validate_points(points: &[MovementSample]) -> Result<()> {
    if points.len() < MIN_POINTS {
        return Err(CaptchaError::InsufficientData {
            points: points.len(),
            session: None,
        });
    }

    for (i, p) in points.iter().enumerate() {
        if !(p.x.is_finite() && p.y.is_finite() && p.t.is_finite()) {
            return Err(CaptchaError::MalformedSample {
                sample: i,
                reason: "non-finite coordinate or timestamp",
                session: None,
            });
        }
        if i > 0 && p.t < points[i - 1].t {
            return Err(CaptchaError::MalformedSample {
                sample: i,
                reason: "timestamp decreases",
                session: None,
            });
        }
    }

    Ok(())
}
