//! CLI command handlers, one file per command.

mod clean;
mod cursors;
mod download;
mod reset_cursor;
mod roaming;

pub use clean::run_clean;
pub use cursors::run_cursors;
pub use download::run_download;
pub use reset_cursor::run_reset_cursor;
pub use roaming::run_roaming;

use anyhow::Result;
use dkd_core::config::DkdConfig;
use dkd_core::storage::KeyStorage;

/// Storage rooted at `storage_dir` from config, or the XDG data dir.
pub(crate) fn storage_from_config(cfg: &DkdConfig) -> Result<KeyStorage> {
    let root = match &cfg.storage_dir {
        Some(dir) => dir.clone(),
        None => KeyStorage::default_root()?,
    };
    Ok(KeyStorage::new(root))
}
