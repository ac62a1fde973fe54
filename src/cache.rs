use fjall::Keyspace;
use serde::Deserialize;
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::Debug;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::task;

use crate::{Result, TripError};

#[derive(Serialize, Deserialize)]
struct StoredEntry<T> {
    value: T,
    expires_at: u64, // Unix timestamp (seconds)
}

/// On-disk key/value store with per-entry expiry
pub struct PersistentCache {
    store: Keyspace,
}

fn get_from_store(store: &Keyspace, key: Vec<u8>) -> Result<Option<Vec<u8>>> {
    Ok(store
        .get(key)
        .map_err(|e| TripError::cache(format!("read failed: {e}")))?
        .map(|v| v.to_vec()))
}

fn now_secs() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| TripError::cache(format!("clock before epoch: {e}")))?
        .as_secs())
}

impl PersistentCache {
    /// Open (or create) the cache database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(path.as_ref())
            .open()
            .map_err(|e| TripError::cache(format!("cannot open {}: {e}", path.as_ref().display())))?;
        let items = db
            .keyspace("cache", fjall::KeyspaceCreateOptions::default)
            .map_err(|e| TripError::cache(format!("cannot open keyspace: {e}")))?;
        Ok(PersistentCache { store: items })
    }

    /// Stores a serializable value with a time-to-live (TTL).
    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value))]
    pub async fn put<T: Serialize + Send + Debug + 'static>(
        &self,
        key: &str,
        value: T,
        ttl: Duration,
    ) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        let expires_at = now_secs()?
            .checked_add(ttl.as_secs())
            .ok_or_else(|| TripError::cache("TTL overflow"))?;
        let entry = StoredEntry { value, expires_at };
        let bytes = postcard::to_stdvec(&entry)
            .map_err(|e| TripError::cache(format!("encode failed: {e}")))?;

        task::spawn_blocking(move || store.insert(key, bytes))
            .await
            .map_err(|e| TripError::cache(format!("write task failed: {e}")))?
            .map_err(|e| TripError::cache(format!("write failed: {e}")))?;
        Ok(())
    }

    /// Retrieves a value if it exists and has not expired.
    /// Returns `None` for cache misses or expired entries.
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    pub async fn get<T: DeserializeOwned + Send + 'static>(&self, key: &str) -> Result<Option<T>> {
        let store = self.store.clone();
        let key_bytes = key.as_bytes().to_vec();

        let maybe_bytes = task::spawn_blocking(move || get_from_store(&store, key_bytes))
            .await
            .map_err(|e| TripError::cache(format!("read task failed: {e}")))??;

        let Some(bytes) = maybe_bytes else {
            tracing::debug!("Key not found");
            return Ok(None);
        };

        let entry: StoredEntry<T> = match postcard::from_bytes(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                // stale layout from an older build
                tracing::debug!("Dropping undecodable entry: {}", e);
                self.remove(key).await?;
                return Ok(None);
            }
        };

        if now_secs()? < entry.expires_at {
            tracing::debug!("Key found and still fresh");
            Ok(Some(entry.value))
        } else {
            tracing::debug!("Key found but expired");
            self.remove(key).await?;
            Ok(None)
        }
    }

    /// Manually removes a key from the cache.
    pub async fn remove(&self, key: &str) -> Result<()> {
        let key = key.as_bytes().to_vec();
        let store = self.store.clone();
        task::spawn_blocking(move || store.remove(key))
            .await
            .map_err(|e| TripError::cache(format!("remove task failed: {e}")))?
            .map_err(|e| TripError::cache(format!("remove failed: {e}")))?;
        Ok(())
    }
}
