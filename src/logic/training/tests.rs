//! Training pipeline tests

use super::config::TrainingConfig;
use super::pipeline::{train, train_with_config};
use crate::error::CaptchaError;
use crate::logic::features::layout::{feature_order, layout_hash, FEATURE_VERSION};
use crate::logic::model::ForestParams;
use crate::logic::session::{Label, MovementSample, Session};
use crate::logic::testing;

fn quick_config() -> TrainingConfig {
    TrainingConfig {
        forest: ForestParams { n_trees: 20, ..Default::default() },
        ..Default::default()
    }
}

#[test]
fn test_train_records_layout() {
    let model = train_with_config(&testing::mixed_dataset(15), &quick_config()).unwrap();
    let meta = model.metadata();

    assert_eq!(meta.feature_order.len(), 4);
    assert_eq!(meta.feature_order, feature_order());
    assert_eq!(meta.feature_version, FEATURE_VERSION);
    assert_eq!(meta.layout_hash, layout_hash());
    assert!(model.validate_schema().is_ok());
}

#[test]
fn test_train_metadata() {
    let model = train_with_config(&testing::mixed_dataset(20), &quick_config()).unwrap();
    let meta = model.metadata();

    // 30% of 20 per class held out
    assert_eq!(meta.validation_samples, 12);
    assert_eq!(meta.training_samples, 28);
    assert!((0.0..=1.0).contains(&meta.training_accuracy));
    assert!(meta.training_accuracy >= 0.9);
    assert_eq!(meta.feature_importances.len(), 4);
    assert_eq!(meta.params.n_trees, 20);
    assert_eq!(model.forest().trees().len(), 20);

    let ranked = model.ranked_importances();
    assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
}

#[test]
fn test_default_train() {
    let model = train(&testing::mixed_dataset(10)).unwrap();
    assert_eq!(model.forest().trees().len(), 100);
}

#[test]
fn test_train_is_reproducible() {
    let dataset = testing::mixed_dataset(12);
    let a = train_with_config(&dataset, &quick_config()).unwrap();
    let b = train_with_config(&dataset, &quick_config()).unwrap();

    assert_eq!(a.forest(), b.forest());
    assert_eq!(a.training_accuracy(), b.training_accuracy());
}

#[test]
fn test_different_seed_changes_forest() {
    let dataset = testing::mixed_dataset(12);
    let a = train_with_config(&dataset, &quick_config()).unwrap();
    let b = train_with_config(&dataset, &quick_config().with_seed(7)).unwrap();
    assert_ne!(a.forest(), b.forest());
}

#[test]
fn test_without_holdout_uses_in_sample_accuracy() {
    let config = TrainingConfig {
        forest: ForestParams { n_trees: 10, ..Default::default() },
        ..TrainingConfig::without_holdout()
    };
    let model = train_with_config(&testing::mixed_dataset(5), &config).unwrap();

    assert_eq!(model.metadata().validation_samples, 0);
    assert_eq!(model.metadata().training_samples, 10);
    assert_eq!(model.training_accuracy(), 1.0);
}

#[test]
fn test_single_class_rejected() {
    let humans: Vec<Session> = (0..5).map(testing::human_session).collect();
    match train_with_config(&humans, &quick_config()) {
        Err(CaptchaError::DegenerateDataset { human, bot }) => {
            assert_eq!(human, 5);
            assert_eq!(bot, 0);
        }
        other => panic!("Expected DegenerateDataset, got {:?}", other.map(|_| ())),
    }

    let bots: Vec<Session> = (0..5).map(testing::bot_session).collect();
    assert!(matches!(
        train_with_config(&bots, &quick_config()),
        Err(CaptchaError::DegenerateDataset { human: 0, bot: 5 })
    ));
}

#[test]
fn test_empty_dataset_rejected() {
    assert!(matches!(
        train(&[]),
        Err(CaptchaError::DegenerateDataset { human: 0, bot: 0 })
    ));
}

#[test]
fn test_unlabeled_session_rejected() {
    let mut dataset = testing::mixed_dataset(3);
    dataset.push(Session::unlabeled(testing::bot_session(99).points().to_vec()));

    assert!(matches!(
        train_with_config(&dataset, &quick_config()),
        Err(CaptchaError::UnlabeledSession { session: 6 })
    ));
}

#[test]
fn test_malformed_session_aborts_training() {
    let mut dataset = testing::mixed_dataset(3);
    dataset.insert(2, Session::labeled(vec![MovementSample::new(0.0, 0.0, 0.0)], Label::Bot));

    match train_with_config(&dataset, &quick_config()) {
        Err(CaptchaError::InsufficientData { points, session }) => {
            assert_eq!(points, 1);
            assert_eq!(session, Some(2));
        }
        other => panic!("Expected InsufficientData, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_invalid_config_rejected() {
    let dataset = testing::mixed_dataset(3);

    let no_trees = TrainingConfig {
        forest: ForestParams { n_trees: 0, ..Default::default() },
        ..Default::default()
    };
    assert!(matches!(train_with_config(&dataset, &no_trees), Err(CaptchaError::InvalidConfig(_))));

    let bad_ratio = TrainingConfig { validation_ratio: 1.0, ..Default::default() };
    assert!(matches!(train_with_config(&dataset, &bad_ratio), Err(CaptchaError::InvalidConfig(_))));

    let bad_split = TrainingConfig {
        forest: ForestParams { min_samples_split: 1, ..Default::default() },
        ..Default::default()
    };
    assert!(bad_split.validate().is_err());
}
