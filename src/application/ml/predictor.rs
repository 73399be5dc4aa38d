//! Inference over current-season records.
//!
//! Reuses the training-side feature builder (team consistency assumed),
//! scores through the `Regressor` seam, perturbs each raw prediction by a
//! position-conditioned random multiplier and ranks the results. The
//! noise source is injectable so tests can run without randomness.

use crate::application::ml::features::FeatureBuilder;
use crate::config::VarianceTable;
use crate::domain::errors::PipelineError;
use crate::domain::ml::feature_schema::FEATURE_SCHEMA_VERSION;
use crate::domain::repositories::Regressor;
use crate::domain::types::{round1, ModelMetadata, PredictionRecord, SeasonRecord};
use rand::Rng;
use rayon::prelude::*;
use std::cmp::Ordering;
use tracing::info;

/// Source of the deliberate forecast perturbation. The confidence score
/// is presentational, not a statistical confidence.
pub trait NoiseSource: Send + Sync {
    /// Multiplier drawn from `[1 - variance, 1 + variance]`.
    fn variance_multiplier(&self, variance: f64) -> f64;

    /// Confidence score in `[70, 95]`.
    fn confidence(&self) -> f64;
}

pub struct UniformNoise;

impl NoiseSource for UniformNoise {
    fn variance_multiplier(&self, variance: f64) -> f64 {
        rand::rng().random_range((1.0 - variance)..=(1.0 + variance))
    }

    fn confidence(&self) -> f64 {
        rand::rng().random_range(70.0..=95.0)
    }
}

/// Pass-through noise for deterministic runs and tests.
pub struct FixedNoise {
    pub confidence: f64,
}

impl NoiseSource for FixedNoise {
    fn variance_multiplier(&self, _variance: f64) -> f64 {
        1.0
    }

    fn confidence(&self) -> f64 {
        self.confidence
    }
}

pub struct Predictor {
    builder: FeatureBuilder,
    variance: VarianceTable,
    noise: Box<dyn NoiseSource>,
}

impl Predictor {
    pub fn new(builder: FeatureBuilder, variance: VarianceTable, noise: Box<dyn NoiseSource>) -> Self {
        Self {
            builder,
            variance,
            noise,
        }
    }

    /// Scores the current season and returns predictions sorted
    /// descending by predicted points, truncated to `top_n` when given.
    ///
    /// Empty input degrades to an empty set. A model trained on a
    /// different feature schema is rejected outright.
    pub fn predict(
        &self,
        records: &[SeasonRecord],
        model: &dyn Regressor,
        metadata: &ModelMetadata,
        top_n: Option<usize>,
    ) -> Result<Vec<PredictionRecord>, PipelineError> {
        if metadata.schema_version != FEATURE_SCHEMA_VERSION {
            return Err(PipelineError::SchemaMismatch {
                model: metadata.schema_version,
                pipeline: FEATURE_SCHEMA_VERSION,
            });
        }
        if records.is_empty() {
            return Ok(Vec::new());
        }

        // Next-season team is unknown at inference, so team consistency
        // is assumed. Documented approximation, not a bug.
        let encoded: Vec<(Vec<f64>, crate::domain::types::AttributeEstimate)> = records
            .par_iter()
            .map(|record| {
                let estimate = self.builder.estimate(&record.player_name, record.position);
                let features = self.builder.encode(record, record.position, &estimate, true);
                (features, estimate)
            })
            .collect();

        let features: Vec<Vec<f64>> = encoded.iter().map(|(f, _)| f.clone()).collect();
        let raw = model
            .predict(&features)
            .map_err(|reason| PipelineError::Inference { reason })?;

        let mut predictions: Vec<PredictionRecord> = records
            .iter()
            .zip(raw.iter())
            .zip(encoded.iter())
            .map(|((record, &prediction), (_, estimate))| {
                let variance = self.variance.for_position(record.position);
                let predicted = prediction * self.noise.variance_multiplier(variance);
                PredictionRecord {
                    player: record.player_name.clone(),
                    position: record.position,
                    team: record.team.clone(),
                    current_points: record.fantasy_points,
                    predicted_next_year: round1(predicted),
                    percent_change: percent_change(predicted, record.fantasy_points),
                    confidence: round1(self.noise.confidence()),
                    age: estimate.age,
                    experience: estimate.experience,
                }
            })
            .collect();

        predictions.sort_by(|a, b| {
            b.predicted_next_year
                .partial_cmp(&a.predicted_next_year)
                .unwrap_or(Ordering::Equal)
        });
        if let Some(limit) = top_n {
            predictions.truncate(limit);
        }

        info!(
            scored = records.len(),
            returned = predictions.len(),
            "prediction set built"
        );
        Ok(predictions)
    }
}

/// Zero current points would divide by zero; the change is reported as
/// the 0.0 sentinel instead of propagating inf/NaN into persisted output.
fn percent_change(predicted: f64, current: f64) -> f64 {
    if current > 0.0 {
        round1((predicted - current) / current * 100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::estimator::FixedEstimator;
    use crate::config::VarianceTable;
    use crate::domain::ml::feature_schema::FEATURE_COUNT;
    use crate::domain::types::{EvalMetrics, Position};
    use std::collections::BTreeMap;

    /// Predicts 110% of current points; stands in for the forest.
    struct TenPercentBump;

    impl Regressor for TenPercentBump {
        fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>, String> {
            Ok(features.iter().map(|row| row[0] * 1.1).collect())
        }
    }

    fn metadata(schema_version: u32) -> ModelMetadata {
        ModelMetadata {
            timestamp: "20250101_000000".to_string(),
            model_type: "RandomForestRegressor".to_string(),
            training_samples: 100,
            feature_count: FEATURE_COUNT,
            schema_version,
            metrics: EvalMetrics {
                mse: 1.0,
                rmse: 1.0,
                r2: 0.5,
                feature_importance: BTreeMap::new(),
            },
        }
    }

    fn predictor() -> Predictor {
        Predictor::new(
            FeatureBuilder::new(Box::new(FixedEstimator(27)), 2019),
            VarianceTable::default(),
            Box::new(FixedNoise { confidence: 80.0 }),
        )
    }

    fn season(player: &str, points: f64) -> SeasonRecord {
        SeasonRecord {
            player_name: player.to_string(),
            position: Position::Wr,
            team: "CIN".to_string(),
            fantasy_points: points,
            year: 2024,
        }
    }

    #[test]
    fn test_empty_input_gives_empty_set() {
        let result = predictor()
            .predict(&[], &TenPercentBump, &metadata(FEATURE_SCHEMA_VERSION), None)
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_schema_mismatch_rejected() {
        let result = predictor().predict(
            &[season("A", 100.0)],
            &TenPercentBump,
            &metadata(FEATURE_SCHEMA_VERSION + 1),
            None,
        );
        assert!(matches!(result, Err(PipelineError::SchemaMismatch { .. })));
    }

    #[test]
    fn test_sorted_descending_and_truncated() {
        let records = vec![
            season("Low", 50.0),
            season("High", 300.0),
            season("Mid", 150.0),
        ];
        let predictions = predictor()
            .predict(
                &records,
                &TenPercentBump,
                &metadata(FEATURE_SCHEMA_VERSION),
                Some(2),
            )
            .unwrap();

        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].player, "High");
        assert_eq!(predictions[1].player, "Mid");
        assert!(predictions[0].predicted_next_year >= predictions[1].predicted_next_year);
    }

    #[test]
    fn test_percent_change_consistent_with_formula() {
        let predictions = predictor()
            .predict(
                &[season("A", 200.0)],
                &TenPercentBump,
                &metadata(FEATURE_SCHEMA_VERSION),
                None,
            )
            .unwrap();
        // 200 -> 220 with the fixed noise multiplier of 1.0.
        assert_eq!(predictions[0].predicted_next_year, 220.0);
        assert_eq!(predictions[0].percent_change, 10.0);
        assert_eq!(predictions[0].confidence, 80.0);
    }

    #[test]
    fn test_zero_current_points_never_yields_nan() {
        let predictions = predictor()
            .predict(
                &[season("Rookie", 0.0)],
                &TenPercentBump,
                &metadata(FEATURE_SCHEMA_VERSION),
                None,
            )
            .unwrap();
        assert_eq!(predictions[0].percent_change, 0.0);
        assert!(predictions[0].percent_change.is_finite());
    }

    #[test]
    fn test_uniform_noise_bounds() {
        let noise = UniformNoise;
        for _ in 0..200 {
            let m = noise.variance_multiplier(0.25);
            assert!((0.75..=1.25).contains(&m));
            let c = noise.confidence();
            assert!((70.0..=95.0).contains(&c));
        }
    }
}
