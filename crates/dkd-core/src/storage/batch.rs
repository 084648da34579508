//! One download cycle's output directory.

use super::temp_path;
use std::path::{Path, PathBuf};

/// Directory receiving `keys_<n>.zip` files for one cycle.
#[derive(Debug, Clone)]
pub struct KeyBatch {
    dir: PathBuf,
}

impl KeyBatch {
    pub(crate) fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the `n`-th file of the batch (1-based).
    pub fn file_path(&self, n: usize) -> PathBuf {
        self.dir.join(format!("keys_{}.zip", n))
    }

    /// Write `bytes` as the `n`-th file: write to `.part`, then rename.
    /// Returns the final path.
    pub async fn write_file(&self, n: usize, bytes: &[u8]) -> std::io::Result<PathBuf> {
        let final_path = self.file_path(n);
        let tmp = temp_path(&final_path);
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &final_path).await?;
        Ok(final_path)
    }
}
