//! `dkd roaming [PATH]` – show the parsed roaming server map.

use anyhow::{Context, Result};
use dkd_core::config::DkdConfig;
use dkd_core::RoamingConfig;
use std::path::Path;

pub fn run_roaming(cfg: &DkdConfig, path: Option<&Path>) -> Result<()> {
    let path = path
        .or(cfg.roaming_config.as_deref())
        .context("no roaming config: pass a path or set roaming_config in config.toml")?;
    let roaming = RoamingConfig::load(path);
    if roaming.is_empty() {
        println!("No roaming servers in {}", path.display());
        return Ok(());
    }
    for region in roaming.regions() {
        println!("{}", region);
        for ep in roaming.servers_for(region) {
            println!("  {}", ep);
        }
    }
    Ok(())
}
