//! Gridcast CLI — fantasy football next-season prediction pipeline.
//!
//! Stages run one-shot, request/response style: `train` fits and
//! persists a model artifact, `predict` scores the current season with
//! the latest artifact, `analyze` and `query` read persisted outputs.
//!
//! # Environment Variables
//! - `GRIDCAST_DATA_DIR` - object store root (default: data)
//! - `GRIDCAST_ESTIMATOR_MODE` - seeded | random (default: seeded)
//! - `GRIDCAST_N_TREES`, `GRIDCAST_MAX_DEPTH` - forest overrides

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use gridcast::application::ml::analyzer;
use gridcast::application::ml::estimator::estimator_for_mode;
use gridcast::application::ml::features::FeatureBuilder;
use gridcast::application::ml::predictor::{Predictor, UniformNoise};
use gridcast::application::ml::trainer::ModelTrainer;
use gridcast::application::ml::transitions::TransitionExtractor;
use gridcast::application::query::{slice_predictions, QueryParams};
use gridcast::config::PipelineConfig;
use gridcast::domain::errors::PipelineError;
use gridcast::infrastructure::feed;
use gridcast::infrastructure::persistence::{
    FsObjectStore, ModelRepository, PredictionRepository,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "gridcast")]
#[command(about = "Next-season fantasy football predictions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a model on historical season data and persist the artifact
    Train {
        /// Path to historical season CSV (Player,Position,Team,Fantasy_Points,Year)
        #[arg(long, default_value = "data/raw/historical.csv")]
        input: PathBuf,
    },
    /// Score the current season with the latest model
    Predict {
        /// Path to current-season CSV
        #[arg(long, default_value = "data/raw/current_season.csv")]
        input: PathBuf,
        /// Season the predictions are for (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
        /// Keep only the top N predictions
        #[arg(long)]
        top_n: Option<usize>,
        /// Also write the prediction set as CSV
        #[arg(long)]
        csv_out: Option<PathBuf>,
    },
    /// Summarize stored predictions and/or a historical corpus
    Analyze {
        /// Season of the stored prediction set
        #[arg(long)]
        year: Option<i32>,
        /// Optional historical season CSV to analyze alongside
        #[arg(long)]
        historical: Option<PathBuf>,
    },
    /// Slice a stored prediction set
    Query {
        /// Season of the stored prediction set
        #[arg(long)]
        year: Option<i32>,
        /// Number of predictions to return
        #[arg(long, default_value_t = 50)]
        top_n: usize,
        /// Case-insensitive position filter (qb, rb, wr, te)
        #[arg(long)]
        position: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let cli = Cli::parse();
    let config = PipelineConfig::from_env()?;
    info!(
        data_dir = %config.data_dir.display(),
        estimator = ?config.estimator_mode,
        "gridcast {} starting",
        env!("CARGO_PKG_VERSION")
    );

    let store = Arc::new(FsObjectStore::new(config.data_dir.clone()));

    match cli.command {
        Commands::Train { input } => train(&config, store, &input),
        Commands::Predict {
            input,
            year,
            top_n,
            csv_out,
        } => predict(&config, store, &input, year, top_n, csv_out),
        Commands::Analyze { year, historical } => analyze(store, year, historical.as_deref()),
        Commands::Query {
            year,
            top_n,
            position,
        } => query(store, year, top_n, position),
    }
}

fn builder_from_config(config: &PipelineConfig) -> FeatureBuilder {
    let estimator = estimator_for_mode(config.estimator_mode, config.age_ranges.clone());
    FeatureBuilder::new(estimator, config.epoch_year)
}

fn train(config: &PipelineConfig, store: Arc<FsObjectStore>, input: &std::path::Path) -> Result<()> {
    let records = feed::read_season_records(input)?;

    let builder = builder_from_config(config);
    let examples = TransitionExtractor::new(&builder).extract(&records);
    info!(
        records = records.len(),
        examples = examples.len(),
        "prepared training transitions"
    );

    let trainer = ModelTrainer::new(config.forest.clone(), config.holdout_fraction);
    let outcome = trainer
        .train(&examples)
        .context("Model training aborted")?;

    let repo = ModelRepository::new(store);
    let pointer = repo.save(&outcome.model, &outcome.metadata)?;

    let metrics = &outcome.metadata.metrics;
    println!("Model trained on {} examples", outcome.metadata.training_samples);
    println!(
        "Held-out: MSE={:.4}, RMSE={:.4}, R²={:.4}",
        metrics.mse, metrics.rmse, metrics.r2
    );
    println!("Feature importance:");
    for (name, share) in &metrics.feature_importance {
        println!("  {name:<24} {share:.4}");
    }
    println!("Artifact: {}", pointer.latest_model_key);
    Ok(())
}

fn predict(
    config: &PipelineConfig,
    store: Arc<FsObjectStore>,
    input: &std::path::Path,
    year: Option<i32>,
    top_n: Option<usize>,
    csv_out: Option<PathBuf>,
) -> Result<()> {
    let records = feed::read_season_records(input)?;
    let year = year.unwrap_or_else(|| chrono::Utc::now().year());

    let repo = ModelRepository::new(store.clone());
    let (model, metadata) = repo.load_latest()?;
    info!(
        trained = %metadata.timestamp,
        samples = metadata.training_samples,
        "loaded latest model"
    );

    let predictor = Predictor::new(
        builder_from_config(config),
        config.variance.clone(),
        Box::new(UniformNoise),
    );
    let limit = top_n.or(Some(config.default_top_n));
    let predictions = predictor.predict(&records, &model, &metadata, limit)?;

    PredictionRepository::new(store).save(year, &predictions)?;
    if let Some(path) = csv_out {
        feed::write_predictions_csv(&path, &predictions)?;
        println!("CSV written to {}", path.display());
    }

    println!("Top predictions for {}:", year + 1);
    for prediction in predictions.iter().take(10) {
        println!(
            "  {:<24} {:<5} {:>7.1} -> {:>7.1} ({:+.1}%)",
            prediction.player,
            prediction.position,
            prediction.current_points,
            prediction.predicted_next_year,
            prediction.percent_change
        );
    }
    Ok(())
}

fn analyze(
    store: Arc<FsObjectStore>,
    year: Option<i32>,
    historical: Option<&std::path::Path>,
) -> Result<()> {
    let year = year.unwrap_or_else(|| chrono::Utc::now().year());

    // Analysis degrades to empty sections instead of failing on
    // missing inputs.
    let predictions = match PredictionRepository::new(store).load(year) {
        Ok(predictions) => predictions,
        Err(PipelineError::NoPredictions) => Vec::new(),
        Err(e) => return Err(e.into()),
    };
    let records = match historical {
        Some(path) => feed::read_season_records(path)?,
        None => Vec::new(),
    };

    let report = serde_json::json!({
        "predictions_analysis": analyzer::analyze_predictions(&predictions, 10),
        "historical_analysis": analyzer::analyze_historical(&records),
        "insights": analyzer::generate_insights(&predictions, &records),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn query(
    store: Arc<FsObjectStore>,
    year: Option<i32>,
    top_n: usize,
    position: Option<String>,
) -> Result<()> {
    let year = year.unwrap_or_else(|| chrono::Utc::now().year());
    let predictions = PredictionRepository::new(store).load(year)?;
    let response = slice_predictions(&predictions, &QueryParams { top_n, position })?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
