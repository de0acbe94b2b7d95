use async_trait::async_trait;

use super::error::StorageError;

/// Default validity of a signed URL, in seconds.
pub const DEFAULT_SIGNED_URL_TTL_SECS: u32 = 3600;

/// Returns `true` if `key` is not a storage key at all: either a full URL
/// (already resolvable, must not be re-signed) or a legacy error marker
/// persisted by early versions of the asset table.
pub fn is_external_ref(key: &str) -> bool {
    key.starts_with("http://")
        || key.starts_with("https://")
        || key.starts_with("gs://")
        || key.starts_with("Error")
}

/// Key-addressed object storage.
///
/// Keys are opaque, stable path strings chosen by the caller. Signed URLs
/// are derived, time-boxed capabilities and are never persisted; callers
/// store keys and recompute URLs at read time.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `data` under `key`. Atomic from the caller's perspective; no
    /// partial object is ever visible. Not retried on failure.
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<(), StorageError>;

    /// Retrieve all bytes for `key`.
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Check whether an object exists at `key`.
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;

    /// List the keys of all objects under `prefix`.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;

    /// Copy the object at `src` to `dst` within the store.
    async fn copy(&self, src: &str, dst: &str) -> Result<(), StorageError>;

    /// Delete the object at `key`.
    ///
    /// Returns `true` if an object was deleted, `false` if none existed.
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;

    /// Compute a time-limited GET URL for a key known to live in this store.
    async fn presign(&self, key: &str) -> Result<String, StorageError>;

    /// Mint a signed URL for `key`.
    ///
    /// Keys that already look like full URLs (or carry the legacy error
    /// marker) pass through unchanged. URLs are recomputed on every call,
    /// never cached, so expiry cannot produce stale links.
    async fn signed_url(&self, key: &str) -> Result<String, StorageError> {
        if is_external_ref(key) {
            return Ok(key.to_string());
        }
        self.presign(key).await
    }
}
