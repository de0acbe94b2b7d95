use std::time::Duration;

use tracing::debug;

use super::error::StorageError;
use super::traits::ObjectStore;

/// Locate a generated object that a provider wrote somewhere under `prefix`.
///
/// Some provider modes write output to a sibling or derived key that only
/// starts with the key the caller asked for, and the write may not be
/// immediately visible. This searches with a bounded retry budget:
///
/// 1. Up to `max_attempts` rounds: list `prefix`, keep keys ending in
///    `expected_suffix`, return the first match in discovery order.
/// 2. Between rounds, sleep the fixed `delay`.
/// 3. After exhaustion, check whether `prefix` itself holds content.
/// 4. Otherwise return `Ok(None)` — the caller reports the object as not
///    located rather than hanging or guessing.
pub async fn locate_output(
    store: &dyn ObjectStore,
    prefix: &str,
    expected_suffix: &str,
    max_attempts: u32,
    delay: Duration,
) -> Result<Option<String>, StorageError> {
    for attempt in 1..=max_attempts {
        let keys = store.list(prefix).await?;
        if let Some(key) = keys.into_iter().find(|k| k.ends_with(expected_suffix)) {
            return Ok(Some(key));
        }
        debug!(prefix, attempt, max_attempts, "output not visible yet");
        if attempt < max_attempts {
            tokio::time::sleep(delay).await;
        }
    }

    // The provider may have written exactly where we asked after all.
    if store.exists(prefix).await? {
        return Ok(Some(prefix.to_string()));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::memory::MemoryObjectStore;

    #[tokio::test]
    async fn finds_object_on_first_attempt() {
        let store = MemoryObjectStore::new();
        store
            .put("out/abc.mp4/0/video.mp4", b"v", "video/mp4")
            .await
            .unwrap();

        let found = locate_output(&store, "out/abc.mp4", ".mp4", 3, Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(found.as_deref(), Some("out/abc.mp4/0/video.mp4"));
    }

    #[tokio::test]
    async fn picks_first_match_in_discovery_order() {
        let store = MemoryObjectStore::new();
        store.put("out/k/a.mp4", b"a", "video/mp4").await.unwrap();
        store.put("out/k/b.mp4", b"b", "video/mp4").await.unwrap();
        store.put("out/k/meta.json", b"{}", "application/json").await.unwrap();

        let found = locate_output(&store, "out/k", ".mp4", 1, Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(found.as_deref(), Some("out/k/a.mp4"));
    }

    #[tokio::test]
    async fn falls_back_to_the_canonical_key_itself() {
        let store = MemoryObjectStore::new();
        // Suffix filter never matches, but the canonical key has content.
        store.put("out/exact", b"v", "video/mp4").await.unwrap();

        let found = locate_output(&store, "out/exact", ".mp4", 2, Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(found.as_deref(), Some("out/exact"));
    }

    #[tokio::test]
    async fn exhausted_budget_returns_none() {
        let store = MemoryObjectStore::new();
        let found = locate_output(&store, "out/nothing", ".mp4", 3, Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test(start_paused = true)]
    async fn object_appearing_within_budget_is_found() {
        let store = Arc::new(MemoryObjectStore::new());

        let writer = Arc::clone(&store);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            writer
                .put("out/late/video.mp4", b"v", "video/mp4")
                .await
                .unwrap();
        });

        let found = locate_output(
            store.as_ref(),
            "out/late",
            ".mp4",
            10,
            Duration::from_secs(2),
        )
        .await
        .unwrap();
        assert_eq!(found.as_deref(), Some("out/late/video.mp4"));
    }

    #[tokio::test(start_paused = true)]
    async fn object_appearing_after_budget_is_not_found() {
        let store = Arc::new(MemoryObjectStore::new());

        let writer = Arc::clone(&store);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            writer
                .put("out/too-late/video.mp4", b"v", "video/mp4")
                .await
                .unwrap();
        });

        let found = locate_output(
            store.as_ref(),
            "out/too-late",
            ".mp4",
            3,
            Duration::from_secs(2),
        )
        .await
        .unwrap();
        assert_eq!(found, None);
    }
}
