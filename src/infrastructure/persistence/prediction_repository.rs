//! Persisted prediction sets, one flat JSON list per season.

use crate::domain::errors::{PipelineError, StoreError};
use crate::domain::repositories::ObjectStore;
use crate::domain::types::PredictionRecord;
use std::sync::Arc;
use tracing::info;

pub struct PredictionRepository {
    store: Arc<dyn ObjectStore>,
}

impl PredictionRepository {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    fn key_for(year: i32) -> String {
        format!("predictions/fantasy_predictions_{year}.json")
    }

    pub fn save(&self, year: i32, predictions: &[PredictionRecord]) -> Result<(), PipelineError> {
        let bytes = serde_json::to_vec_pretty(predictions)
            .map_err(|e| PipelineError::store("serialize predictions", e.into()))?;
        self.store
            .put(&Self::key_for(year), bytes)
            .map_err(|e| PipelineError::store("save predictions", e))?;
        info!(year, count = predictions.len(), "prediction set saved");
        Ok(())
    }

    /// Loads the stored set for a season. A missing key maps to
    /// `NoPredictions` so the query surface can answer "run predict
    /// first" instead of surfacing a storage detail.
    pub fn load(&self, year: i32) -> Result<Vec<PredictionRecord>, PipelineError> {
        let bytes = match self.store.get(&Self::key_for(year)) {
            Ok(bytes) => bytes,
            Err(StoreError::NotFound { .. }) => return Err(PipelineError::NoPredictions),
            Err(e) => return Err(PipelineError::store("load predictions", e)),
        };
        serde_json::from_slice(&bytes)
            .map_err(|e| PipelineError::store("parse predictions", e.into()))
    }
}
