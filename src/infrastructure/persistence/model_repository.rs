//! Versioned model artifacts over an object store.
//!
//! Every training run writes an immutable timestamp-keyed model plus its
//! metadata, then rewrites the mutable `latest_model.json` pointer.
//! Concurrent trainers race on the pointer with last-writer-wins
//! semantics; artifacts themselves are never overwritten.

use crate::domain::errors::{PipelineError, StoreError};
use crate::domain::ml::forest::ForestModel;
use crate::domain::repositories::ObjectStore;
use crate::domain::types::ModelMetadata;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

pub const LATEST_POINTER_KEY: &str = "latest_model.json";

/// The mutable "latest" reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestModelRef {
    pub latest_model_key: String,
    pub latest_metadata_key: String,
    pub last_updated: String,
}

pub struct ModelRepository {
    store: Arc<dyn ObjectStore>,
}

impl ModelRepository {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Persists a model artifact and points `latest_model.json` at it.
    pub fn save(
        &self,
        model: &ForestModel,
        metadata: &ModelMetadata,
    ) -> Result<LatestModelRef, PipelineError> {
        let model_key = format!("models/fantasy_predictor_{}.json", metadata.timestamp);
        let metadata_key = format!("metadata/model_metadata_{}.json", metadata.timestamp);

        let model_bytes = serde_json::to_vec(model)
            .map_err(|e| PipelineError::store("serialize model", e.into()))?;
        let metadata_bytes = serde_json::to_vec_pretty(metadata)
            .map_err(|e| PipelineError::store("serialize model metadata", e.into()))?;

        self.store
            .put(&model_key, model_bytes)
            .map_err(|e| PipelineError::store("save model", e))?;
        self.store
            .put(&metadata_key, metadata_bytes)
            .map_err(|e| PipelineError::store("save model metadata", e))?;

        let latest = LatestModelRef {
            latest_model_key: model_key,
            latest_metadata_key: metadata_key,
            last_updated: metadata.timestamp.clone(),
        };
        let pointer_bytes = serde_json::to_vec_pretty(&latest)
            .map_err(|e| PipelineError::store("serialize latest pointer", e.into()))?;
        self.store
            .put(LATEST_POINTER_KEY, pointer_bytes)
            .map_err(|e| PipelineError::store("update latest pointer", e))?;

        info!(model_key = %latest.latest_model_key, "model artifact saved");
        Ok(latest)
    }

    /// Loads the model the latest pointer references. A missing pointer
    /// or artifact is a distinct, user-facing failure; inference never
    /// falls back to an undefined model.
    pub fn load_latest(&self) -> Result<(ForestModel, ModelMetadata), PipelineError> {
        let pointer_bytes = match self.store.get(LATEST_POINTER_KEY) {
            Ok(bytes) => bytes,
            Err(StoreError::NotFound { .. }) => {
                return Err(PipelineError::ArtifactUnavailable {
                    reason: "no latest model reference found; train a model first".to_string(),
                });
            }
            Err(e) => return Err(PipelineError::store("load latest pointer", e)),
        };

        let pointer: LatestModelRef = serde_json::from_slice(&pointer_bytes)
            .map_err(|e| PipelineError::store("parse latest pointer", e.into()))?;

        let model = self.load_json(&pointer.latest_model_key, "model artifact")?;
        let metadata = self.load_json(&pointer.latest_metadata_key, "model metadata")?;
        Ok((model, metadata))
    }

    fn load_json<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
        what: &str,
    ) -> Result<T, PipelineError> {
        let bytes = match self.store.get(key) {
            Ok(bytes) => bytes,
            Err(StoreError::NotFound { .. }) => {
                return Err(PipelineError::ArtifactUnavailable {
                    reason: format!("{what} missing at {key}"),
                });
            }
            Err(e) => return Err(PipelineError::store("load model artifact", e)),
        };
        serde_json::from_slice(&bytes)
            .map_err(|e| PipelineError::store("parse model artifact", e.into()))
    }
}
