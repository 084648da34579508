//! `dkd clean` – delete old key batch directories.

use super::storage_from_config;
use anyhow::Result;
use dkd_core::config::DkdConfig;
use std::time::Duration;

pub async fn run_clean(cfg: &DkdConfig, older_than_hours: u64) -> Result<()> {
    let storage = storage_from_config(cfg)?;
    let max_age = Duration::from_secs(older_than_hours.saturating_mul(3600));
    let removed = storage.remove_stale_batches(max_age).await?;
    println!(
        "Removed {} batch(es) from {}",
        removed,
        storage.keys_dir().display()
    );
    Ok(())
}
