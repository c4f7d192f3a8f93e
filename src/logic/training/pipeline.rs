//! Training Pipeline
//!
//! Labeled sessions → feature rows → fitted forest → `TrainedModel`.
//! Each call is independent; nothing is kept between runs.

use chrono::Utc;
use ndarray::{aview1, Array2};

use super::config::TrainingConfig;
use super::split::stratified_split;
use crate::error::{CaptchaError, Result};
use crate::logic::features::layout::{feature_order, layout_hash, FEATURE_COUNT, FEATURE_VERSION};
use crate::logic::features::{self, FeatureVector};
use crate::logic::model::{Classifier, ModelMetadata, RandomForest, TrainedModel};
use crate::logic::session::{Label, Session};

/// Train with default configuration
pub fn train(dataset: &[Session]) -> Result<TrainedModel> {
    train_with_config(dataset, &TrainingConfig::default())
}

/// Train with explicit configuration.
///
/// Any malformed or unlabeled session aborts the whole run.
pub fn train_with_config(dataset: &[Session], config: &TrainingConfig) -> Result<TrainedModel> {
    config.validate()?;

    let labels = collect_labels(dataset)?;
    let counts = count_classes(&labels);
    if counts.iter().any(|&c| c == 0) {
        return Err(CaptchaError::DegenerateDataset {
            human: counts[Label::Human.index()],
            bot: counts[Label::Bot.index()],
        });
    }

    let vectors = features::extract_all(dataset)?;
    log::info!(
        "Extracted features from {} sessions ({} human, {} bot)",
        vectors.len(),
        counts[Label::Human.index()],
        counts[Label::Bot.index()]
    );

    let split = stratified_split(&labels, config.validation_ratio, config.forest.seed);
    let (inputs, targets) = assemble(&vectors, &labels, &split.train);

    let mut forest = RandomForest::new(config.forest);
    forest.fit(inputs.view(), &targets)?;
    log::info!(
        "Fitted {} trees on {} sessions",
        forest.trees().len(),
        split.train.len()
    );

    let holdout = if split.validation.is_empty() { &split.train } else { &split.validation };
    let training_accuracy = accuracy(&forest, &vectors, &labels, holdout)?;
    log::info!(
        "{} accuracy: {:.3}",
        if split.validation.is_empty() { "In-sample" } else { "Validation" },
        training_accuracy
    );

    let metadata = ModelMetadata {
        feature_version: FEATURE_VERSION,
        layout_hash: layout_hash(),
        feature_order: feature_order(),
        training_accuracy,
        trained_at: Utc::now(),
        training_samples: split.train.len(),
        validation_samples: split.validation.len(),
        feature_importances: forest.feature_importances().to_vec(),
        params: config.forest,
    };

    Ok(TrainedModel::new(metadata, forest))
}

fn collect_labels(dataset: &[Session]) -> Result<Vec<Label>> {
    dataset
        .iter()
        .enumerate()
        .map(|(i, s)| s.label().ok_or(CaptchaError::UnlabeledSession { session: i }))
        .collect()
}

fn count_classes(labels: &[Label]) -> [usize; 2] {
    let mut counts = [0usize; 2];
    for label in labels {
        counts[label.index()] += 1;
    }
    counts
}

/// Numeric fields into an (n × FEATURE_COUNT) matrix, labels into targets
fn assemble(vectors: &[FeatureVector], labels: &[Label], rows: &[usize]) -> (Array2<f64>, Vec<Label>) {
    let mut inputs = Array2::<f64>::zeros((rows.len(), FEATURE_COUNT));
    let mut targets = Vec::with_capacity(rows.len());

    for (r, &i) in rows.iter().enumerate() {
        inputs.row_mut(r).assign(&aview1(&vectors[i].to_row()));
        targets.push(labels[i]);
    }

    (inputs, targets)
}

fn accuracy(forest: &RandomForest, vectors: &[FeatureVector], labels: &[Label], rows: &[usize]) -> Result<f64> {
    let mut correct = 0usize;
    for &i in rows {
        let row = vectors[i].to_row();
        if forest.predict_proba(aview1(&row))?.label() == labels[i] {
            correct += 1;
        }
    }
    Ok(correct as f64 / rows.len() as f64)
}
