//! Behavioral CAPTCHA - Command Line Entry Point
//!
//! ```text
//! sessions.json ──► features ──► train ──► model.json
//!                                             │
//!                 live session ──► predict ◄──┘
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use behavioral_captcha::config::Config;
use behavioral_captcha::constants::{APP_NAME, APP_VERSION};
use behavioral_captcha::logic::dataset::{self, TimeUnit};
use behavioral_captcha::logic::evaluation::{self, EvaluationReport};
use behavioral_captcha::logic::features::{self, FEATURE_LAYOUT};
use behavioral_captcha::logic::model::{self, TrainedModel};
use behavioral_captcha::logic::session::{Label, Session};
use behavioral_captcha::logic::training;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Model file (overrides CAPTCHA_MODEL_PATH)
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Unit of raw timestamps in input files: ms or s (overrides CAPTCHA_TIME_UNIT)
    #[arg(long, global = true)]
    time_unit: Option<TimeUnit>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a model on labeled sessions and save it
    Train(TrainArgs),
    /// Classify every session in a file
    Predict {
        /// Sessions file or a bare point array
        input: PathBuf,
        /// Print results as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Score a model against labeled held-out sessions
    Evaluate {
        /// Labeled sessions file
        input: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Extract features, print per-class means, optionally export JSONL
    Features {
        /// Sessions file
        input: PathBuf,
        /// JSONL export target
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct TrainArgs {
    /// Generator-format sessions (overrides CAPTCHA_SESSIONS_PATH)
    #[arg(long)]
    sessions: Option<PathBuf>,
    /// Number of trees
    #[arg(long)]
    trees: Option<usize>,
    /// Maximum tree depth
    #[arg(long)]
    max_depth: Option<usize>,
    /// Minimum sessions a node needs before it may split
    #[arg(long)]
    min_samples_split: Option<usize>,
    /// Share of each class held out for validation
    #[arg(long)]
    validation_ratio: Option<f64>,
    /// Random seed
    #[arg(long)]
    seed: Option<u64>,
}

impl TrainArgs {
    /// Flags win over environment values
    fn apply(self, config: &mut Config) {
        if let Some(path) = self.sessions {
            config.sessions_path = path;
        }
        let forest = &mut config.training.forest;
        forest.n_trees = self.trees.unwrap_or(forest.n_trees);
        forest.max_depth = self.max_depth.unwrap_or(forest.max_depth);
        forest.min_samples_split = self.min_samples_split.unwrap_or(forest.min_samples_split);
        forest.seed = self.seed.unwrap_or(forest.seed);
        if let Some(ratio) = self.validation_ratio {
            config.training.validation_ratio = ratio;
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(path) = cli.model {
        config.model_path = path;
    }
    if let Some(unit) = cli.time_unit {
        config.time_unit = unit;
    }

    log::debug!("{} v{}", APP_NAME, APP_VERSION);

    match cli.command {
        Commands::Train(args) => {
            args.apply(&mut config);
            run_train(&config)
        }
        Commands::Predict { input, json } => run_predict(&config, &input, json),
        Commands::Evaluate { input, json } => run_evaluate(&config, &input, json),
        Commands::Features { input, output } => run_features(&config, &input, output.as_deref()),
    }
}

fn read_sessions(path: &Path, unit: TimeUnit) -> Result<Vec<Session>> {
    let sessions = dataset::load_sessions(path, unit)
        .with_context(|| format!("Failed to load sessions from {}", path.display()))?;
    if sessions.is_empty() {
        bail!("No sessions in {}", path.display());
    }
    Ok(sessions)
}

fn read_model(path: &Path) -> Result<TrainedModel> {
    model::load_model(path).with_context(|| format!("Failed to load model from {}", path.display()))
}

fn run_train(config: &Config) -> Result<()> {
    let sessions = read_sessions(&config.sessions_path, config.time_unit)?;
    let trained = training::train_with_config(&sessions, &config.training).context("Training failed")?;
    model::save_model(&trained, &config.model_path)
        .with_context(|| format!("Failed to save model to {}", config.model_path.display()))?;

    let meta = trained.metadata();
    println!("Trained on {} sessions ({} held out)", meta.training_samples, meta.validation_samples);
    println!("Accuracy: {:.2}%", meta.training_accuracy * 100.0);
    println!("Feature importances:");
    for (name, importance) in trained.ranked_importances() {
        println!("  {:<18} {:.4}", name, importance);
    }
    println!("Model saved to {}", config.model_path.display());
    Ok(())
}

fn run_predict(config: &Config, input: &Path, json: bool) -> Result<()> {
    let trained = read_model(&config.model_path)?;
    let sessions = read_sessions(input, config.time_unit)?;
    let results = model::predict_batch(&trained, &sessions).context("Prediction failed")?;

    for (i, (session, result)) in sessions.iter().zip(&results).enumerate() {
        let id = session.id().map(str::to_string).unwrap_or_else(|| format!("#{}", i));
        if json {
            println!("{}", serde_json::json!({ "session_id": id, "result": result }));
        } else {
            println!(
                "{:<14} {:<5} confidence {:.3} (human {:.3} / bot {:.3})",
                id,
                result.label.as_str().to_uppercase(),
                result.confidence,
                result.probabilities.human,
                result.probabilities.bot
            );
        }
    }
    Ok(())
}

fn run_evaluate(config: &Config, input: &Path, json: bool) -> Result<()> {
    let trained = read_model(&config.model_path)?;
    let sessions = read_sessions(input, config.time_unit)?;
    let report = evaluation::evaluate(&trained, &sessions).context("Evaluation failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &EvaluationReport) {
    println!("Sessions: {}", report.total);
    println!("Accuracy: {:.2}%", report.accuracy * 100.0);
    match report.roc_auc {
        Some(auc) => println!("ROC-AUC:  {:.4}", auc),
        None => println!("ROC-AUC:  n/a (single class)"),
    }

    println!();
    println!("{:<8} {:>9} {:>9} {:>9} {:>8}", "class", "precision", "recall", "f1", "support");
    for label in Label::ALL {
        let m = report.class(label);
        println!(
            "{:<8} {:>9.3} {:>9.3} {:>9.3} {:>8}",
            label.as_str().to_uppercase(),
            m.precision,
            m.recall,
            m.f1,
            m.support
        );
    }

    println!();
    println!("Confusion matrix (rows actual, columns predicted):");
    println!("{:<8} {:>7} {:>7}", "", "HUMAN", "BOT");
    for actual in Label::ALL {
        println!(
            "{:<8} {:>7} {:>7}",
            actual.as_str().to_uppercase(),
            report.confusion_matrix.get(actual, Label::Human),
            report.confusion_matrix.get(actual, Label::Bot)
        );
    }
}

fn run_features(config: &Config, input: &Path, output: Option<&Path>) -> Result<()> {
    let sessions = read_sessions(input, config.time_unit)?;
    let vectors = features::extract_all(&sessions).context("Feature extraction failed")?;

    println!("Extracted {} feature vectors", vectors.len());
    let summaries = dataset::class_means(&vectors);
    if !summaries.is_empty() {
        println!("Feature means by class:");
        for (i, name) in FEATURE_LAYOUT.iter().enumerate() {
            let cells: Vec<String> = summaries
                .iter()
                .map(|s| format!("{}={:.3}", s.label.as_str().to_uppercase(), s.means[i]))
                .collect();
            println!("  {:<18} {}", name, cells.join("  "));
        }
    }

    if let Some(path) = output {
        let written = dataset::features_to_jsonl(&sessions, path)
            .with_context(|| format!("Failed to export features to {}", path.display()))?;
        println!("Wrote {} records to {}", written, path.display());
    }
    Ok(())
}
