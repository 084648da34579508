//! Download cursors: per-server record of the last key file fetched.
//!
//! Keyed by the server's index URI. The resolver reads a cursor before
//! truncating an index listing; the downloader writes it after the most
//! recent file of a server has been stored.

mod memory;
mod sqlite;

pub use memory::MemoryCursorStore;
pub use sqlite::SqliteCursorStore;

use anyhow::Result;
use async_trait::async_trait;
use url::Url;

/// One stored cursor, as listed by [`CursorStore::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorEntry {
    pub index_uri: String,
    pub last_file_uri: String,
    /// Unix seconds of the last write (0 when the store does not track it).
    pub updated_at: i64,
}

/// Persistent key-value store of download cursors.
///
/// Reads and writes must be atomic per key; writes are idempotent.
#[async_trait]
pub trait CursorStore: Send + Sync {
    /// Last file successfully downloaded from the server behind `index_uri`.
    async fn last_successful_download(&self, index_uri: &Url) -> Result<Option<Url>>;

    /// Record `file_uri` as the newest file downloaded from `index_uri`.
    async fn record_successful_download(&self, index_uri: &Url, file_uri: &Url) -> Result<()>;

    /// All stored cursors, ordered by index URI.
    async fn list(&self) -> Result<Vec<CursorEntry>>;

    /// Forget the cursor for `index_uri`. Returns whether one existed.
    async fn clear(&self, index_uri: &Url) -> Result<bool>;
}
