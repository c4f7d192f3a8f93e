use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::artifact::{ModelMetadata, TrainedModel};
use super::forest::{ForestParams, RandomForest};
use crate::constants::DEFAULT_MODEL_FILE;
use crate::error::{CaptchaError, Result};
use crate::logic::dataset::get_data_dir;

/// On-disk layout: metadata, forest, and a SHA-256 over both
#[derive(Serialize)]
struct ModelFileRef<'a> {
    metadata: &'a ModelMetadata,
    forest: &'a RandomForest,
    checksum: String,
}

#[derive(Deserialize)]
struct ModelFile {
    metadata: ModelMetadata,
    forest: RandomForest,
    checksum: String,
}

/// Get default model path
pub fn get_default_model_path() -> PathBuf {
    get_data_dir().join(DEFAULT_MODEL_FILE)
}

/// Save model to disk
pub fn save_model(model: &TrainedModel, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = ModelFileRef {
        metadata: model.metadata(),
        forest: model.forest(),
        checksum: artifact_checksum(model.metadata(), model.forest())?,
    };
    let json = serde_json::to_vec_pretty(&file)?;
    fs::write(path, json)?;

    log::info!("Model saved to {}", path.display());
    Ok(())
}

/// Load model from disk.
///
/// Integrity and forest structure are checked here; the feature layout is
/// only checked when the model is first used for prediction.
pub fn load_model(path: &Path) -> Result<TrainedModel> {
    let data = fs::read(path)?;
    let file: ModelFile = serde_json::from_slice(&data)?;

    let actual = artifact_checksum(&file.metadata, &file.forest)?;
    if actual != file.checksum {
        return Err(CaptchaError::CorruptedModel(format!(
            "checksum mismatch: expected {}, got {}",
            file.checksum, actual
        )));
    }
    file.forest.validate()?;

    log::info!(
        "Model loaded from {} ({} trees, trained {})",
        path.display(),
        file.forest.trees().len(),
        file.metadata.trained_at
    );
    Ok(TrainedModel::new(file.metadata, file.forest))
}

/// Everything the checksum protects. The layout fields are left out so a
/// layout edit surfaces as `SchemaMismatch` at predict time.
#[derive(Serialize)]
struct ChecksumScope<'a> {
    training_accuracy: f64,
    trained_at: &'a DateTime<Utc>,
    training_samples: usize,
    validation_samples: usize,
    feature_importances: &'a [f64],
    params: &'a ForestParams,
    forest: &'a RandomForest,
}

fn artifact_checksum(metadata: &ModelMetadata, forest: &RandomForest) -> Result<String> {
    let scope = ChecksumScope {
        training_accuracy: metadata.training_accuracy,
        trained_at: &metadata.trained_at,
        training_samples: metadata.training_samples,
        validation_samples: metadata.validation_samples,
        feature_importances: &metadata.feature_importances,
        params: &metadata.params,
        forest,
    };
    let bytes = serde_json::to_vec(&scope)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}
