//! On-disk layout for downloaded key files.
//!
//! `<root>/diag_keys/<batch>/keys_<n>.zip`, one randomly named batch
//! directory per download cycle so concurrent or stale cycles never clobber
//! each other. Files are written to a `.part` sibling and renamed into place.

mod batch;
mod clean;

pub use batch::KeyBatch;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Directory under the storage root holding all batches.
pub const KEYS_DIR: &str = "diag_keys";

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Random bytes per batch name (16 base-32 characters).
const BATCH_NAME_BYTES: usize = 10;

/// Root of the key file storage.
#[derive(Debug, Clone)]
pub struct KeyStorage {
    root: PathBuf,
}

impl KeyStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default root: `~/.local/share/dkd`.
    pub fn default_root() -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("dkd")?;
        Ok(xdg_dirs.get_data_home().join("dkd"))
    }

    /// `<root>/diag_keys`
    pub fn keys_dir(&self) -> PathBuf {
        self.root.join(KEYS_DIR)
    }

    /// Create a fresh, randomly named batch directory.
    pub async fn create_batch(&self) -> std::io::Result<KeyBatch> {
        let dir = self.keys_dir().join(random_batch_name());
        tokio::fs::create_dir_all(&dir).await?;
        tracing::debug!(dir = %dir.display(), "created key batch directory");
        Ok(KeyBatch::new(dir))
    }
}

/// Random, collision-resistant directory name: base-32, no padding.
pub fn random_batch_name() -> String {
    let bytes: [u8; BATCH_NAME_BYTES] = rand::random();
    data_encoding::BASE32_NOPAD.encode(&bytes)
}

/// Path for the temp file: appends `.part` to the final path (e.g. `keys_1.zip` → `keys_1.zip.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}
