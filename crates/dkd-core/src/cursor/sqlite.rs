//! SQLite-backed cursor store (sqlx).
//!
//! The database file lives under the XDG state directory:
//! `~/.local/state/dkd/cursors.db`.

use super::{CursorEntry, CursorStore};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Row, Sqlite};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use url::Url;

/// Percent-encode a path for use in a sqlite:// URI so spaces and special chars don't break parsing.
fn path_to_sqlite_uri(path: &Path) -> String {
    let s = path.to_string_lossy();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '&' => out.push_str("%26"),
            c => out.push(c),
        }
    }
    format!("sqlite://{}", out)
}

/// Handle to the cursor database.
#[derive(Clone)]
pub struct SqliteCursorStore {
    pool: Pool<Sqlite>,
}

impl SqliteCursorStore {
    /// Open (or create) the default cursor database and run migrations.
    pub async fn open_default() -> Result<Self> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("dkd")?;
        let db_path = xdg_dirs.get_state_home().join("dkd").join("cursors.db");
        Self::open_at(db_path).await
    }

    /// Open (or create) the database at a specific path. Creates parent dirs if needed.
    pub async fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let uri = path_to_sqlite_uri(path) + "?mode=rwc";
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect(&uri)
            .await?;
        let store = SqliteCursorStore { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Open an in-memory database (single connection so every query sees the same DB).
    pub async fn open_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let store = SqliteCursorStore { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS download_cursors (
                index_uri TEXT PRIMARY KEY NOT NULL,
                last_file_uri TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl CursorStore for SqliteCursorStore {
    async fn last_successful_download(&self, index_uri: &Url) -> Result<Option<Url>> {
        let row = sqlx::query(
            r#"
            SELECT last_file_uri FROM download_cursors
            WHERE index_uri = ?1
            "#,
        )
        .bind(index_uri.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let raw: String = row.get("last_file_uri");
        match Url::parse(&raw) {
            Ok(url) => Ok(Some(url)),
            Err(e) => {
                // Unusable cursor behaves like no cursor: full index is fetched.
                tracing::warn!(index = %index_uri, cursor = %raw, "ignoring unparsable cursor: {}", e);
                Ok(None)
            }
        }
    }

    async fn record_successful_download(&self, index_uri: &Url, file_uri: &Url) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO download_cursors (index_uri, last_file_uri, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(index_uri) DO UPDATE SET
                last_file_uri = excluded.last_file_uri,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(index_uri.as_str())
        .bind(file_uri.as_str())
        .bind(unix_timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<CursorEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT index_uri, last_file_uri, updated_at
            FROM download_cursors
            ORDER BY index_uri ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| CursorEntry {
                index_uri: row.get("index_uri"),
                last_file_uri: row.get("last_file_uri"),
                updated_at: row.get("updated_at"),
            })
            .collect())
    }

    async fn clear(&self, index_uri: &Url) -> Result<bool> {
        let affected = sqlx::query(
            r#"
            DELETE FROM download_cursors
            WHERE index_uri = ?1
            "#,
        )
        .bind(index_uri.as_str())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }
}

fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
