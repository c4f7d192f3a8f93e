//! Behavioral CAPTCHA
//!
//! Classifies mouse-movement sessions as HUMAN or BOT with a random forest
//! over a handful of speed and timing statistics.

pub mod config;
pub mod constants;
pub mod error;
pub mod logic;

pub use config::Config;
pub use error::{CaptchaError, Result};
pub use logic::dataset::{load_sessions, TimeUnit};
pub use logic::evaluation::{evaluate, EvaluationReport};
pub use logic::features::{extract, extract_all, FeatureVector};
pub use logic::model::{load_model, predict, predict_batch, save_model, PredictionResult, TrainedModel};
pub use logic::session::{Label, MovementSample, Session};
pub use logic::training::{train, train_with_config, TrainingConfig};
