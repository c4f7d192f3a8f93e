//! Evaluation Module - held-out accuracy metrics
//!
//! Runs the prediction service over labeled sessions and aggregates the
//! verdicts. A model that gets everything wrong still yields a report.

pub mod report;
pub mod roc;


pub use report::{ClassMetrics, ConfusionMatrix, EvaluationReport};

use crate::error::{CaptchaError, Result};
use crate::logic::model::{predict_batch, TrainedModel};
use crate::logic::session::{Label, Session};

/// Evaluate `model` against labeled sessions
pub fn evaluate(model: &TrainedModel, labeled_sessions: &[Session]) -> Result<EvaluationReport> {
    if labeled_sessions.is_empty() {
        return Err(CaptchaError::EmptyDataset);
    }

    let truth: Vec<Label> = labeled_sessions
        .iter()
        .enumerate()
        .map(|(i, s)| s.label().ok_or(CaptchaError::UnlabeledSession { session: i }))
        .collect::<Result<_>>()?;

    let predictions = predict_batch(model, labeled_sessions)?;

    let mut matrix = ConfusionMatrix::default();
    for (actual, prediction) in truth.iter().zip(&predictions) {
        matrix.record(*actual, prediction.label);
    }

    let scores: Vec<f64> = predictions.iter().map(|p| p.probabilities.bot).collect();
    let positives: Vec<bool> = truth.iter().map(|l| *l == Label::Bot).collect();

    let report = EvaluationReport {
        total: matrix.total(),
        accuracy: matrix.accuracy(),
        human: ClassMetrics::from_matrix(&matrix, Label::Human),
        bot: ClassMetrics::from_matrix(&matrix, Label::Bot),
        confusion_matrix: matrix,
        roc_auc: roc::roc_auc(&scores, &positives),
    };

    log::info!(
        "Evaluated {} sessions: accuracy {:.3}, roc_auc {}",
        report.total,
        report.accuracy,
        report.roc_auc.map_or("n/a".to_string(), |v| format!("{:.3}", v))
    );
    Ok(report)
}
