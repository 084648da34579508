//! `dkd download` – run one download cycle and print the written files.

use super::storage_from_config;
use anyhow::{Context, Result};
use dkd_core::config::DkdConfig;
use dkd_core::http::HttpClient;
use dkd_core::{DiagnosisKeyDownloader, RoamingConfig, SqliteCursorStore, StaticRegionResolver};
use std::sync::Arc;
use std::time::Duration;

/// `regions` replaces the configured visited regions when non-empty.
pub async fn run_download(
    cfg: &DkdConfig,
    regions: Vec<String>,
    timeout_secs: Option<u64>,
) -> Result<()> {
    let home = cfg
        .home
        .clone()
        .context("no home server configured: add a [home] section to config.toml")?;

    let visited = if regions.is_empty() {
        cfg.visited_regions.clone()
    } else {
        regions
    };
    let mut resolver = StaticRegionResolver::new(home).with_visited(visited);
    if let Some(region) = &cfg.home_region {
        resolver = resolver.with_home_region(region.clone());
    }

    let roaming = match &cfg.roaming_config {
        Some(path) => RoamingConfig::load(path),
        None => RoamingConfig::default(),
    };

    let mut options = cfg.downloader_options();
    if let Some(secs) = timeout_secs {
        options.timeout = Duration::from_secs(secs);
    }

    let cursors = SqliteCursorStore::open_default().await?;
    let http = HttpClient::new(
        cfg.retry_policy()?,
        cfg.request_options(),
        tokio::runtime::Handle::current(),
    );
    let downloader = DiagnosisKeyDownloader::new(
        http,
        Arc::new(cursors),
        Arc::new(resolver),
        Arc::new(roaming),
        storage_from_config(cfg)?,
        options,
    );

    let files = downloader.download().await?;
    if files.is_empty() {
        println!("No new key files.");
        return Ok(());
    }
    for f in &files {
        let path = f
            .local_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let marker = if f.is_most_recent { "*" } else { " " };
        println!("{} {}  {}", marker, path, f.file_uri);
    }
    println!("Downloaded {} key file(s).", files.len());
    Ok(())
}
