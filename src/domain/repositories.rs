//! Storage abstractions for the pipeline boundary.
//!
//! The core treats persistence as an opaque key/value blob store. The
//! `InMemory` implementation backs tests, the filesystem implementation
//! backs the CLI; both live in `infrastructure::persistence`.

use crate::domain::errors::StoreError;

/// Opaque blob storage. Keys are slash-separated paths
/// (`models/...`, `metadata/...`, `predictions/...`).
pub trait ObjectStore: Send + Sync {
    /// Store an object, overwriting any previous value at `key`.
    fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError>;

    /// Fetch an object. `StoreError::NotFound` when the key is absent.
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// List keys under a prefix, sorted ascending.
    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

/// Capability seam for the fitted model: the pipeline only ever scores
/// feature matrices, so the concrete regressor stays swappable.
pub trait Regressor: Send + Sync {
    /// Score one row per feature vector. Rows must match the feature
    /// schema the model was trained on.
    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>, String>;
}
