//! Error handling

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CaptchaError>;

#[derive(Debug, Error)]
pub enum CaptchaError {
    // Session errors
    #[error("insufficient data{}: {points} point(s), need at least 2", session_suffix(.session))]
    InsufficientData { points: usize, session: Option<usize> },

    #[error("malformed sample {sample}{}: {reason}", session_suffix(.session))]
    MalformedSample {
        sample: usize,
        reason: &'static str,
        session: Option<usize>,
    },

    #[error("session {session} carries no label")]
    UnlabeledSession { session: usize },

    // Dataset errors
    #[error("degenerate dataset: {human} human / {bot} bot session(s), need both classes")]
    DegenerateDataset { human: usize, bot: usize },

    #[error("empty dataset")]
    EmptyDataset,

    // Model errors
    #[error("schema mismatch: model expects {expected:?}, extractor emits {actual:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("non-finite value in row {row}, feature {feature}")]
    NonFiniteInput { row: usize, feature: usize },

    #[error("corrupted model: {0}")]
    CorruptedModel(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    // Generic errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CaptchaError {
    /// Attach the index of the offending session in a batch
    pub fn at_session(self, index: usize) -> Self {
        match self {
            CaptchaError::InsufficientData { points, .. } => CaptchaError::InsufficientData {
                points,
                session: Some(index),
            },
            CaptchaError::MalformedSample { sample, reason, .. } => CaptchaError::MalformedSample {
                sample,
                reason,
                session: Some(index),
            },
            other => other,
        }
    }
}

fn session_suffix(session: &Option<usize>) -> String {
    session.map(|i| format!(" in session {}", i)).unwrap_or_default()
}
