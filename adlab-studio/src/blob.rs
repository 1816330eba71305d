//! In-memory media blob store.
//!
//! Finished video bytes are parked here and referenced by an opaque
//! `blob:` locator, so result URIs handed to the UI never carry the
//! provider URL or the API key baked into it.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// A stored media payload.
#[derive(Debug, Clone)]
pub struct MediaBlob {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Shared handle to the blob store. Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct BlobStore {
    inner: Arc<Mutex<HashMap<Uuid, Arc<MediaBlob>>>>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a payload and return its `blob:` locator.
    pub fn insert(&self, bytes: Vec<u8>, mime_type: impl Into<String>) -> String {
        let id = Uuid::new_v4();
        self.inner.lock().insert(id, Arc::new(MediaBlob { bytes, mime_type: mime_type.into() }));
        format!("blob:{id}")
    }

    /// Resolve a `blob:` locator.
    pub fn get(&self, locator: &str) -> Option<Arc<MediaBlob>> {
        let id = locator.strip_prefix("blob:")?.parse().ok()?;
        self.inner.lock().get(&id).cloned()
    }

    /// Drop a stored payload. Returns whether it existed.
    pub fn remove(&self, locator: &str) -> bool {
        let Some(id) = locator.strip_prefix("blob:").and_then(|s| s.parse().ok()) else {
            return false;
        };
        self.inner.lock().remove(&id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_get_roundtrips() {
        let store = BlobStore::new();
        let locator = store.insert(vec![1, 2, 3], "video/mp4");
        assert!(locator.starts_with("blob:"));

        let blob = store.get(&locator).unwrap();
        assert_eq!(blob.bytes, vec![1, 2, 3]);
        assert_eq!(blob.mime_type, "video/mp4");
    }

    #[test]
    fn unknown_and_malformed_locators_miss() {
        let store = BlobStore::new();
        assert!(store.get("blob:00000000-0000-0000-0000-000000000000").is_none());
        assert!(store.get("not-a-blob").is_none());
        assert!(!store.remove("not-a-blob"));
    }

    #[test]
    fn remove_frees_the_entry() {
        let store = BlobStore::new();
        let locator = store.insert(vec![9], "video/mp4");
        assert!(store.remove(&locator));
        assert!(store.get(&locator).is_none());
        assert!(!store.remove(&locator));
    }
}
