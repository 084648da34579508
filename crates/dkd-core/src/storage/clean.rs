//! Removal of old batch directories.

use super::KeyStorage;
use anyhow::{Context, Result};
use std::time::{Duration, SystemTime};

impl KeyStorage {
    /// Delete batch directories whose modification time is older than
    /// `max_age`. Returns how many were removed. A missing keys directory
    /// means nothing to clean.
    pub async fn remove_stale_batches(&self, max_age: Duration) -> Result<usize> {
        let keys_dir = self.keys_dir();
        let mut entries = match tokio::fs::read_dir(&keys_dir).await {
            Ok(e) => e,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(e).with_context(|| format!("read dir: {}", keys_dir.display()))
            }
        };

        let now = SystemTime::now();
        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let meta = entry.metadata().await?;
            if !meta.is_dir() {
                continue;
            }
            let age = meta
                .modified()
                .ok()
                .and_then(|m| now.duration_since(m).ok())
                .unwrap_or_default();
            if age < max_age {
                continue;
            }
            let path = entry.path();
            match tokio::fs::remove_dir_all(&path).await {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), "removed stale key batch");
                    removed += 1;
                }
                Err(e) => tracing::warn!(path = %path.display(), "could not remove key batch: {}", e),
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_keys_dir_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let storage = KeyStorage::new(dir.path());
        assert_eq!(storage.remove_stale_batches(Duration::ZERO).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn removes_only_old_enough_batches() {
        let dir = tempfile::tempdir().unwrap();
        let storage = KeyStorage::new(dir.path());
        let batch = storage.create_batch().await.unwrap();
        batch.write_file(1, b"x").await.unwrap();

        // Fresh batch survives a one-hour threshold.
        assert_eq!(
            storage
                .remove_stale_batches(Duration::from_secs(3600))
                .await
                .unwrap(),
            0
        );
        assert!(batch.dir().exists());

        // Zero threshold removes everything.
        assert_eq!(storage.remove_stale_batches(Duration::ZERO).await.unwrap(), 1);
        assert!(!batch.dir().exists());
    }
}
