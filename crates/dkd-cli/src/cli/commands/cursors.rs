//! `dkd cursors` – list stored download cursors.

use anyhow::Result;
use dkd_core::{CursorStore, SqliteCursorStore};

pub async fn run_cursors() -> Result<()> {
    let store = SqliteCursorStore::open_default().await?;
    let entries = store.list().await?;
    if entries.is_empty() {
        println!("No cursors stored.");
    } else {
        println!("{:<12} {:<50} {}", "UPDATED", "INDEX", "LAST FILE");
        for e in entries {
            println!("{:<12} {:<50} {}", e.updated_at, e.index_uri, e.last_file_uri);
        }
    }
    Ok(())
}
