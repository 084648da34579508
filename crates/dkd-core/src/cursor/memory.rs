//! In-process cursor store.

use super::{CursorEntry, CursorStore};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use url::Url;

/// Cursor store backed by a map; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryCursorStore {
    cursors: Mutex<BTreeMap<String, Url>>,
}

impl MemoryCursorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CursorStore for MemoryCursorStore {
    async fn last_successful_download(&self, index_uri: &Url) -> Result<Option<Url>> {
        Ok(self.cursors.lock().await.get(index_uri.as_str()).cloned())
    }

    async fn record_successful_download(&self, index_uri: &Url, file_uri: &Url) -> Result<()> {
        self.cursors
            .lock()
            .await
            .insert(index_uri.to_string(), file_uri.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<CursorEntry>> {
        Ok(self
            .cursors
            .lock()
            .await
            .iter()
            .map(|(index, file)| CursorEntry {
                index_uri: index.clone(),
                last_file_uri: file.to_string(),
                updated_at: 0,
            })
            .collect())
    }

    async fn clear(&self, index_uri: &Url) -> Result<bool> {
        Ok(self.cursors.lock().await.remove(index_uri.as_str()).is_some())
    }
}
