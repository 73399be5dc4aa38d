//! Directory-backed object store. Keys are slash-separated relative
//! paths under the configured root.

use crate::domain::errors::StoreError;
use crate::domain::repositories::ObjectStore;
use std::fs;
use std::path::{Path, PathBuf};

pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn collect_keys(&self, dir: &Path, keys: &mut Vec<String>) -> std::io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                self.collect_keys(&path, keys)?;
            } else if let Ok(relative) = path.strip_prefix(&self.root) {
                keys.push(relative.to_string_lossy().replace('\\', "/"));
            }
        }
        Ok(())
    }
}

impl ObjectStore for FsObjectStore {
    fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound {
                key: key.to_string(),
            }),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        if self.root.exists() {
            self.collect_keys(&self.root, &mut keys)?;
        }
        keys.retain(|key| key.starts_with(prefix));
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());
        store
            .put("models/fantasy_predictor_x.json", b"{}".to_vec())
            .unwrap();
        assert_eq!(
            store.get("models/fantasy_predictor_x.json").unwrap(),
            b"{}"
        );
    }

    #[test]
    fn test_missing_key_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());
        assert!(matches!(
            store.get("models/absent.json"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_list_by_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());
        store.put("raw_data/2022.json", vec![]).unwrap();
        store.put("raw_data/2024.json", vec![]).unwrap();
        store.put("latest_model.json", vec![]).unwrap();
        assert_eq!(
            store.list("raw_data/").unwrap(),
            vec!["raw_data/2022.json", "raw_data/2024.json"]
        );
        assert!(store.list("").unwrap().len() == 3);
    }
}
