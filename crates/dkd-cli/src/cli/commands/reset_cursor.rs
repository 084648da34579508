//! `dkd reset-cursor <INDEX_URL> | --all` – forget cursors.

use anyhow::{Context, Result};
use dkd_core::{CursorStore, SqliteCursorStore};
use url::Url;

pub async fn run_reset_cursor(index_url: Option<&str>, all: bool) -> Result<()> {
    let store = SqliteCursorStore::open_default().await?;

    if all {
        let mut cleared = 0;
        for entry in store.list().await? {
            let index = Url::parse(&entry.index_uri)
                .with_context(|| format!("stored index URL: {}", entry.index_uri))?;
            if store.clear(&index).await? {
                cleared += 1;
            }
        }
        println!("Cleared {} cursor(s)", cleared);
        return Ok(());
    }

    let raw = index_url.context("pass an index URL or --all")?;
    let index = Url::parse(raw).with_context(|| format!("invalid index URL: {}", raw))?;
    if store.clear(&index).await? {
        println!("Cleared cursor for {}", index);
    } else {
        println!("No cursor stored for {}", index);
    }
    Ok(())
}
