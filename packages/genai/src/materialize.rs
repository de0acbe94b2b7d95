//! Moves a completed job's output to its canonical storage key.

use std::time::Duration;

use common::storage::{ObjectStore, locate_output};
use tracing::{info, warn};

use crate::client::GenerativeClient;
use crate::error::GenaiError;
use crate::types::Operation;

/// Retry budget for the bounded output search.
#[derive(Debug, Clone, Copy)]
pub struct LocatePolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for LocatePolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::from_secs(2),
        }
    }
}

/// Ensure the output of a completed video job ends up at `canonical_key`.
///
/// Three cases, in order of preference:
/// - the operation reports a fetchable HTTP URI: download and upload;
/// - the operation reports an object-store URI: copy to the canonical key
///   if it landed elsewhere;
/// - no URI at all (managed mode wrote under the canonical key prefix):
///   resolve by bounded search, relocate the first match, and best-effort
///   delete the provider-chosen original.
pub async fn materialize_video_output(
    client: &GenerativeClient,
    store: &dyn ObjectStore,
    operation: &Operation,
    canonical_key: &str,
    locate: LocatePolicy,
) -> Result<(), GenaiError> {
    match operation.first_video_uri() {
        Some(uri) if uri.starts_with("gs://") => {
            let source_key = object_key_of(&uri);
            if source_key == canonical_key {
                return Ok(());
            }
            // The provider's write may not be visible yet.
            if !store.exists(source_key).await? {
                tokio::time::sleep(locate.delay).await;
            }
            store.copy(source_key, canonical_key).await?;
            cleanup(store, source_key).await;
            Ok(())
        }
        Some(uri) => {
            let data = client.download_uri(&uri).await?;
            store.put(canonical_key, &data, "video/mp4").await?;
            Ok(())
        }
        None => {
            let found = locate_output(
                store,
                canonical_key,
                ".mp4",
                locate.max_attempts,
                locate.delay,
            )
            .await?;
            match found {
                Some(key) if key == canonical_key => Ok(()),
                Some(key) => {
                    info!(from = %key, to = %canonical_key, "relocating generated output");
                    store.copy(&key, canonical_key).await?;
                    cleanup(store, &key).await;
                    Ok(())
                }
                None => Err(GenaiError::OutputNotLocated {
                    prefix: canonical_key.to_string(),
                }),
            }
        }
    }
}

/// Best-effort delete of a provider-chosen original; never propagates.
async fn cleanup(store: &dyn ObjectStore, key: &str) {
    if let Err(e) = store.delete(key).await {
        warn!(key, error = %e, "failed to delete relocated original");
    }
}

/// Key component of a `gs://bucket/key` URI.
fn object_key_of(uri: &str) -> &str {
    uri.strip_prefix("gs://")
        .and_then(|rest| rest.split_once('/'))
        .map(|(_bucket, key)| key)
        .unwrap_or(uri)
}
