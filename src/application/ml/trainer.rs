//! Random forest training over transition examples.
//!
//! Fits on a seeded 80/20 shuffle split, evaluates MSE/RMSE/R² on the
//! held-out partition and derives per-feature permutation importances.
//! The fitted forest plus metadata form the immutable model artifact.

use crate::config::ForestParams;
use crate::domain::errors::PipelineError;
use crate::domain::ml::feature_schema::{FEATURE_COUNT, FEATURE_NAMES, FEATURE_SCHEMA_VERSION};
use crate::domain::ml::forest::ForestModel;
use crate::domain::repositories::Regressor;
use crate::domain::types::{EvalMetrics, ModelMetadata, TrainingExample};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use tracing::info;

pub struct TrainingOutcome {
    pub model: ForestModel,
    pub metadata: ModelMetadata,
}

pub struct ModelTrainer {
    params: ForestParams,
    holdout_fraction: f64,
}

impl ModelTrainer {
    pub fn new(params: ForestParams, holdout_fraction: f64) -> Self {
        Self {
            params,
            holdout_fraction,
        }
    }

    /// Fits the forest and evaluates it on the held-out partition.
    ///
    /// Fails with `InsufficientData` on an empty example set; the caller
    /// must not persist anything in that case. Very small sets (where a
    /// fractional holdout would round to zero) are evaluated in-sample.
    pub fn train(&self, examples: &[TrainingExample]) -> Result<TrainingOutcome, PipelineError> {
        let n = examples.len();
        if n == 0 {
            return Err(PipelineError::InsufficientData {
                stage: "trainer",
                required: 1,
                got: 0,
            });
        }

        let mut rng = StdRng::seed_from_u64(self.params.seed);
        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(&mut rng);

        let holdout = ((n as f64) * self.holdout_fraction).floor() as usize;
        let (train_idx, test_idx) = indices.split_at(n - holdout);

        let x_train: Vec<Vec<f64>> = train_idx.iter().map(|&i| examples[i].features.clone()).collect();
        let y_train: Vec<f64> = train_idx.iter().map(|&i| examples[i].label).collect();

        info!(
            samples = x_train.len(),
            held_out = holdout,
            n_trees = self.params.n_trees,
            max_depth = self.params.max_depth,
            "training random forest"
        );

        let model = ForestModel::fit(&x_train, &y_train, &self.params)?;

        // In-sample evaluation when the holdout rounds down to nothing.
        let (x_eval, y_eval): (Vec<Vec<f64>>, Vec<f64>) = if test_idx.is_empty() {
            (x_train, y_train)
        } else {
            (
                test_idx.iter().map(|&i| examples[i].features.clone()).collect(),
                test_idx.iter().map(|&i| examples[i].label).collect(),
            )
        };

        let predictions = model
            .predict(&x_eval)
            .map_err(|reason| PipelineError::Training { reason })?;

        let mse = mean_squared_error(&predictions, &y_eval);
        let metrics = EvalMetrics {
            mse,
            rmse: mse.sqrt(),
            r2: r_squared(&predictions, &y_eval),
            feature_importance: permutation_importance(&model, &x_eval, &y_eval, mse, &mut rng)?,
        };

        info!(
            mse = metrics.mse,
            rmse = metrics.rmse,
            r2 = metrics.r2,
            "held-out evaluation complete"
        );

        let metadata = ModelMetadata {
            timestamp: Utc::now().format("%Y%m%d_%H%M%S").to_string(),
            model_type: "RandomForestRegressor".to_string(),
            training_samples: n,
            feature_count: FEATURE_COUNT,
            schema_version: FEATURE_SCHEMA_VERSION,
            metrics,
        };

        Ok(TrainingOutcome { model, metadata })
    }
}

fn mean_squared_error(predictions: &[f64], actuals: &[f64]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let sq_err: f64 = predictions
        .iter()
        .zip(actuals.iter())
        .map(|(p, a)| (p - a).powi(2))
        .sum();
    sq_err / predictions.len() as f64
}

fn r_squared(predictions: &[f64], actuals: &[f64]) -> f64 {
    if actuals.is_empty() {
        return 0.0;
    }
    let mean_y = actuals.iter().sum::<f64>() / actuals.len() as f64;
    let var_y: f64 =
        actuals.iter().map(|a| (a - mean_y).powi(2)).sum::<f64>() / actuals.len() as f64;
    if var_y > 0.0 {
        1.0 - mean_squared_error(predictions, actuals) / var_y
    } else {
        0.0
    }
}

/// Permutation importance on the evaluation partition: shuffle one
/// feature column at a time and record the MSE increase. The forest
/// itself does not expose impurity-based importances.
fn permutation_importance(
    model: &ForestModel,
    x_eval: &[Vec<f64>],
    y_eval: &[f64],
    baseline_mse: f64,
    rng: &mut StdRng,
) -> Result<BTreeMap<String, f64>, PipelineError> {
    let mut raw = vec![0.0_f64; FEATURE_COUNT];

    if x_eval.len() > 1 {
        for feature in 0..FEATURE_COUNT {
            let mut column: Vec<f64> = x_eval.iter().map(|row| row[feature]).collect();
            column.shuffle(rng);

            let permuted: Vec<Vec<f64>> = x_eval
                .iter()
                .zip(column.iter())
                .map(|(row, &value)| {
                    let mut row = row.clone();
                    row[feature] = value;
                    row
                })
                .collect();

            let predictions = model
                .predict(&permuted)
                .map_err(|reason| PipelineError::Training { reason })?;
            raw[feature] = (mean_squared_error(&predictions, y_eval) - baseline_mse).max(0.0);
        }
    }

    let total: f64 = raw.iter().sum();
    let importance = FEATURE_NAMES
        .iter()
        .zip(raw.iter())
        .map(|(&name, &value)| {
            let share = if total > 0.0 { value / total } else { 0.0 };
            (name.to_string(), share)
        })
        .collect();
    Ok(importance)
}
