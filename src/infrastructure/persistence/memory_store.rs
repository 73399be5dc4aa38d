//! Thread-safe in-memory object store, used by tests and dry runs.

use crate::domain::errors::StoreError;
use crate::domain::repositories::ObjectStore;
use std::collections::BTreeMap;
use std::sync::RwLock;

#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        let mut objects = self.objects.write().expect("store lock poisoned");
        objects.insert(key.to_string(), bytes);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let objects = self.objects.read().expect("store lock poisoned");
        objects
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                key: key.to_string(),
            })
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let objects = self.objects.read().expect("store lock poisoned");
        Ok(objects
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_roundtrip() {
        let store = InMemoryObjectStore::new();
        store.put("models/a.json", b"abc".to_vec()).unwrap();
        assert_eq!(store.get("models/a.json").unwrap(), b"abc");
    }

    #[test]
    fn test_missing_key_is_not_found() {
        let store = InMemoryObjectStore::new();
        assert!(matches!(
            store.get("nope"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_list_filters_by_prefix_sorted() {
        let store = InMemoryObjectStore::new();
        store.put("raw_data/2023.json", vec![]).unwrap();
        store.put("raw_data/2021.json", vec![]).unwrap();
        store.put("models/m.json", vec![]).unwrap();
        assert_eq!(
            store.list("raw_data/").unwrap(),
            vec!["raw_data/2021.json", "raw_data/2023.json"]
        );
    }

    #[test]
    fn test_put_overwrites() {
        let store = InMemoryObjectStore::new();
        store.put("k", b"one".to_vec()).unwrap();
        store.put("k", b"two".to_vec()).unwrap();
        assert_eq!(store.get("k").unwrap(), b"two");
    }
}
