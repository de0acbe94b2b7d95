use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use super::error::StorageError;
use super::traits::{DEFAULT_SIGNED_URL_TTL_SECS, ObjectStore};

/// In-process object store used by tests and local development.
///
/// Keys are held in a `BTreeMap` so listing order is deterministic.
/// Signed URLs are stable, fake `https://` capabilities that embed the key
/// and a digest-based signature.
pub struct MemoryObjectStore {
    objects: Mutex<BTreeMap<String, StoredObject>>,
    base_url: String,
    ttl_secs: u32,
}

#[derive(Clone)]
struct StoredObject {
    data: Vec<u8>,
    content_type: String,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::with_base_url("https://storage.invalid/assets")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            base_url: base_url.into(),
            ttl_secs: DEFAULT_SIGNED_URL_TTL_SECS,
        }
    }

    /// Content type recorded for `key`, if the object exists.
    pub fn content_type(&self, key: &str) -> Option<String> {
        let objects = self.objects.lock().expect("store lock poisoned");
        objects.get(key).map(|o| o.content_type.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, StoredObject>> {
        self.objects.lock().expect("store lock poisoned")
    }
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<(), StorageError> {
        self.lock().insert(
            key.to_string(),
            StoredObject {
                data: data.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        self.lock()
            .get(key)
            .map(|o| o.data.clone())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.lock().contains_key(key))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        Ok(self
            .lock()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn copy(&self, src: &str, dst: &str) -> Result<(), StorageError> {
        let mut objects = self.lock();
        let object = objects
            .get(src)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(src.to_string()))?;
        objects.insert(dst.to_string(), object);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.lock().remove(key).is_some())
    }

    async fn presign(&self, key: &str) -> Result<String, StorageError> {
        // Presigning does not require existence (parity with S3); a missing
        // object yields a URL that 404s on fetch.
        let digest = Sha256::digest(format!("{key}:{}", self.ttl_secs).as_bytes());
        let signature = hex::encode(&digest[..8]);
        Ok(format!(
            "{}/{key}?expires={}&sig={signature}",
            self.base_url, self.ttl_secs
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::is_external_ref;

    fn store() -> MemoryObjectStore {
        MemoryObjectStore::new()
    }

    #[tokio::test]
    async fn put_get_round_trip() {
        let store = store();
        store.put("a/b.png", b"bytes", "image/png").await.unwrap();
        assert_eq!(store.get("a/b.png").await.unwrap(), b"bytes");
        assert_eq!(store.content_type("a/b.png").unwrap(), "image/png");
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let store = store();
        assert!(matches!(
            store.get("missing").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_filters_by_prefix() {
        let store = store();
        store.put("videos/a.mp4", b"a", "video/mp4").await.unwrap();
        store.put("videos/b.mp4", b"b", "video/mp4").await.unwrap();
        store.put("images/c.png", b"c", "image/png").await.unwrap();

        let keys = store.list("videos/").await.unwrap();
        assert_eq!(keys, vec!["videos/a.mp4", "videos/b.mp4"]);
    }

    #[tokio::test]
    async fn copy_duplicates_content() {
        let store = store();
        store.put("src.mp4", b"movie", "video/mp4").await.unwrap();
        store.copy("src.mp4", "dst.mp4").await.unwrap();
        assert_eq!(store.get("dst.mp4").await.unwrap(), b"movie");
        assert_eq!(store.content_type("dst.mp4").unwrap(), "video/mp4");
    }

    #[tokio::test]
    async fn copy_missing_source_fails() {
        let store = store();
        assert!(matches!(
            store.copy("nope", "dst").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_reports_existence() {
        let store = store();
        store.put("k", b"v", "text/plain").await.unwrap();
        assert!(store.delete("k").await.unwrap());
        assert!(!store.delete("k").await.unwrap());
    }

    #[tokio::test]
    async fn signed_url_embeds_key_and_differs_from_it() {
        let store = store();
        store.put("abc123.png", b"v", "image/png").await.unwrap();
        let url = store.signed_url("abc123.png").await.unwrap();
        assert!(url.contains("abc123.png"));
        assert_ne!(url, "abc123.png");
    }

    #[tokio::test]
    async fn signed_url_passes_through_full_urls() {
        let store = store();
        let external = "https://example.com/already/a/url.png";
        assert_eq!(store.signed_url(external).await.unwrap(), external);
        // Pass-through is idempotent.
        let again = store.signed_url(external).await.unwrap();
        assert_eq!(again, external);
    }

    #[tokio::test]
    async fn signed_url_passes_through_error_markers() {
        let store = store();
        let marker = "Error uploading to bucket";
        assert_eq!(store.signed_url(marker).await.unwrap(), marker);
    }

    #[test]
    fn external_ref_detection() {
        assert!(is_external_ref("http://a/b"));
        assert!(is_external_ref("https://a/b"));
        assert!(is_external_ref("gs://bucket/key"));
        assert!(is_external_ref("Error: upload failed"));
        assert!(!is_external_ref("generated_videos/x.mp4"));
    }
}
