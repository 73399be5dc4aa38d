use thiserror::Error;

/// Errors raised by the object storage boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object not found: {key}")]
    NotFound { key: String },

    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("object (de)serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Stage-level pipeline failures. Every variant carries enough context
/// for the caller to tell retryable (storage) from non-retryable
/// (insufficient or malformed data) conditions.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("insufficient data: {stage} needs at least {required} training examples, got {got}")]
    InsufficientData {
        stage: &'static str,
        required: usize,
        got: usize,
    },

    #[error("model artifact unavailable: {reason}")]
    ArtifactUnavailable { reason: String },

    #[error("feature schema mismatch: model was trained on v{model}, pipeline builds v{pipeline}")]
    SchemaMismatch { model: u32, pipeline: u32 },

    #[error("no predictions available; run the predict stage first")]
    NoPredictions,

    #[error("no players found for position {position}")]
    PositionNotFound { position: String },

    #[error("model training failed: {reason}")]
    Training { reason: String },

    #[error("model inference failed: {reason}")]
    Inference { reason: String },

    #[error("{stage}: {source}")]
    Store {
        stage: &'static str,
        #[source]
        source: StoreError,
    },
}

impl PipelineError {
    /// Storage failures other than a missing key may be transient;
    /// everything else is a property of the input data or the artifact set.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PipelineError::Store {
                source: StoreError::Io(_),
                ..
            }
        )
    }

    pub fn store(stage: &'static str, source: StoreError) -> Self {
        PipelineError::Store { stage, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_formatting() {
        let err = PipelineError::InsufficientData {
            stage: "trainer",
            required: 1,
            got: 0,
        };
        let msg = err.to_string();
        assert!(msg.contains("trainer"));
        assert!(msg.contains("got 0"));
    }

    #[test]
    fn test_retryable_classification() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        assert!(PipelineError::store("save model", StoreError::Io(io)).is_retryable());

        let missing = StoreError::NotFound {
            key: "latest_model.json".to_string(),
        };
        assert!(!PipelineError::store("load model", missing).is_retryable());
        assert!(
            !PipelineError::InsufficientData {
                stage: "trainer",
                required: 1,
                got: 0
            }
            .is_retryable()
        );
    }
}
