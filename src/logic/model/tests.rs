//! Prediction service & persistence tests

use super::inference::{predict, predict_batch, predict_features};
use super::storage::{load_model, save_model};
use super::TrainedModel;
use crate::error::CaptchaError;
use crate::logic::features;
use crate::logic::model::ForestParams;
use crate::logic::session::{Label, MovementSample, Session};
use crate::logic::testing;
use crate::logic::training::{train_with_config, TrainingConfig};
use std::fs;
use tempfile::tempdir;

fn trained() -> TrainedModel {
    let config = TrainingConfig {
        forest: ForestParams { n_trees: 25, ..Default::default() },
        ..Default::default()
    };
    train_with_config(&testing::mixed_dataset(20), &config).unwrap()
}

#[test]
fn test_predict_unlabeled_sessions() {
    let model = trained();

    let bot = Session::unlabeled(testing::bot_session(500).points().to_vec());
    let human = Session::unlabeled(testing::human_session(500).points().to_vec());

    let bot_result = predict(&model, &bot).unwrap();
    let human_result = predict(&model, &human).unwrap();

    assert_eq!(bot_result.label, Label::Bot);
    assert!(bot_result.is_bot());
    assert_eq!(human_result.label, Label::Human);
    assert!(human_result.confidence > 0.5 && human_result.confidence <= 1.0);
    assert_eq!(human_result.confidence, human_result.probabilities.human);
}

#[test]
fn test_predict_is_deterministic() {
    let model = trained();
    let session = testing::human_session(77);
    assert_eq!(predict(&model, &session).unwrap(), predict(&model, &session).unwrap());
}

#[test]
fn test_predict_features_matches_predict() {
    let model = trained();
    let session = testing::bot_session(31);
    let vector = features::extract(&session).unwrap();
    assert_eq!(predict_features(&model, &vector).unwrap(), predict(&model, &session).unwrap());
}

#[test]
fn test_batch_matches_single_predictions() {
    let model = trained();
    let sessions = vec![testing::human_session(40), testing::bot_session(41), testing::human_session(42)];

    let batch = predict_batch(&model, &sessions).unwrap();
    let single: Vec<_> = sessions.iter().map(|s| predict(&model, s).unwrap()).collect();
    assert_eq!(batch, single);
}

#[test]
fn test_batch_reports_failing_index() {
    let model = trained();
    let sessions = vec![
        testing::human_session(1),
        Session::unlabeled(vec![MovementSample::new(0.0, 0.0, 0.0)]),
    ];

    assert!(matches!(
        predict_batch(&model, &sessions),
        Err(CaptchaError::InsufficientData { points: 1, session: Some(1) })
    ));
}

#[test]
fn test_schema_skew_is_fatal() {
    let mut model = trained();
    model.metadata_mut().feature_order = vec![
        "std_speed".to_string(),
        "max_speed".to_string(),
        "num_points".to_string(),
        "session_duration".to_string(),
    ];

    match predict(&model, &testing::bot_session(3)) {
        Err(CaptchaError::SchemaMismatch { expected, actual }) => {
            assert_eq!(expected[0], "std_speed");
            assert_eq!(actual[0], "num_points");
        }
        other => panic!("Expected SchemaMismatch, got {:?}", other),
    }
}

#[test]
fn test_schema_skew_with_extra_feature() {
    let mut model = trained();
    model.metadata_mut().feature_order.push("click_cadence".to_string());
    assert!(matches!(
        predict(&model, &testing::bot_session(3)),
        Err(CaptchaError::SchemaMismatch { .. })
    ));
}

#[test]
fn test_save_load_cycle() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("models").join("mouse_model.json");
    let model = trained();

    save_model(&model, &path).unwrap();
    let loaded = load_model(&path).unwrap();

    assert_eq!(loaded, model);
    for session in [testing::human_session(900), testing::bot_session(901)] {
        assert_eq!(predict(&loaded, &session).unwrap(), predict(&model, &session).unwrap());
    }
}

#[test]
fn test_load_defers_schema_check_to_predict() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");
    save_model(&trained(), &path).unwrap();

    let mut json: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    json["metadata"]["feature_order"] = serde_json::json!(["num_points", "max_speed", "std_speed"]);
    fs::write(&path, serde_json::to_vec(&json).unwrap()).unwrap();

    let loaded = load_model(&path).unwrap();
    assert!(matches!(
        predict(&loaded, &testing::human_session(5)),
        Err(CaptchaError::SchemaMismatch { .. })
    ));
}

#[test]
fn test_tampered_forest_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");
    save_model(&trained(), &path).unwrap();

    let mut json: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    json["forest"]["params"]["n_trees"] = serde_json::json!(1);
    fs::write(&path, serde_json::to_vec(&json).unwrap()).unwrap();

    assert!(matches!(load_model(&path), Err(CaptchaError::CorruptedModel(_))));
}

#[test]
fn test_tampered_metadata_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");
    save_model(&trained(), &path).unwrap();
    let original: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();

    for (field, value) in [
        ("training_accuracy", serde_json::json!(0.42)),
        ("feature_importances", serde_json::json!([1.0, 0.0, 0.0, 0.0])),
        ("training_samples", serde_json::json!(9999)),
    ] {
        let mut json = original.clone();
        json["metadata"][field] = value;
        fs::write(&path, serde_json::to_vec(&json).unwrap()).unwrap();

        match load_model(&path) {
            Err(CaptchaError::CorruptedModel(_)) => {}
            other => panic!("Editing {} should corrupt the model, got {:?}", field, other.map(|_| ())),
        }
    }
}

#[test]
fn test_load_missing_file() {
    let dir = tempdir().unwrap();
    assert!(matches!(load_model(&dir.path().join("absent.json")), Err(CaptchaError::Io(_))));
}

#[test]
fn test_load_garbage() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");
    fs::write(&path, b"not json").unwrap();
    assert!(matches!(load_model(&path), Err(CaptchaError::Serialization(_))));
}

#[test]
fn test_concurrent_predictions_share_model() {
    let model = trained();
    let sessions: Vec<Session> = (0..8)
        .map(|i| if i % 2 == 0 { testing::human_session(600 + i) } else { testing::bot_session(600 + i) })
        .collect();
    let expected = predict_batch(&model, &sessions).unwrap();

    let model = &model;
    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = sessions
            .iter()
            .map(|session| scope.spawn(move || predict(model, session).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results, expected);
}

#[test]
fn test_overflowing_session_never_reaches_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");

    let mut dataset = testing::mixed_dataset(10);
    dataset.push(Session::labeled(
        vec![
            MovementSample::new(0.0, 0.0, 0.0),
            MovementSample::new(1e300, 0.0, 1e-10),
            MovementSample::new(0.0, 0.0, 1.0),
        ],
        Label::Bot,
    ));
    let config = TrainingConfig { validation_ratio: 0.0, ..TrainingConfig::default() };

    let result = train_with_config(&dataset, &config).and_then(|model| save_model(&model, &path));
    assert!(matches!(
        result,
        Err(CaptchaError::MalformedSample { session: Some(20), .. })
    ));
    assert!(!path.exists());

    // Without the bad session the same data round-trips losslessly
    dataset.pop();
    let model = train_with_config(&dataset, &config).unwrap();
    save_model(&model, &path).unwrap();
    assert_eq!(load_model(&path).unwrap(), model);
}
