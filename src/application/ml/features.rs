//! Feature construction over season records.
//!
//! Thin wrapper tying the attribute estimator to the versioned feature
//! schema. Both the transition extractor (training) and the predictor
//! (inference) go through this builder, never through ad-hoc encoding.

use crate::application::ml::estimator::AttributeEstimator;
use crate::domain::ml::feature_schema;
use crate::domain::types::{AttributeEstimate, Position, SeasonRecord};

pub struct FeatureBuilder {
    estimator: Box<dyn AttributeEstimator>,
    epoch_year: i32,
}

impl FeatureBuilder {
    pub fn new(estimator: Box<dyn AttributeEstimator>, epoch_year: i32) -> Self {
        Self {
            estimator,
            epoch_year,
        }
    }

    pub fn estimate(&self, player: &str, position: Position) -> AttributeEstimate {
        self.estimator.estimate(player, position)
    }

    /// Encodes one season record against the current schema version.
    pub fn encode(
        &self,
        record: &SeasonRecord,
        position: Position,
        estimate: &AttributeEstimate,
        team_consistent: bool,
    ) -> Vec<f64> {
        feature_schema::encode(record, position, estimate, self.epoch_year, team_consistent)
    }
}
