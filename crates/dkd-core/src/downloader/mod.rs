//! Diagnosis-key downloader: one full download cycle.
//!
//! Builds the server list (home + roaming servers of visited regions),
//! resolves candidate files, then fetches and stores them concurrently in a
//! fresh batch directory. The cursor of a server advances when its most
//! recent file is on disk. One deadline covers the whole cycle; there is no
//! partial success.

mod servers;

pub use servers::servers_to_consult;

use crate::cursor::CursorStore;
use crate::endpoint::{CandidateFile, ServerEndpoint};
use crate::error::DownloadError;
use crate::http::HttpClient;
use crate::region::RegionResolver;
use crate::resolver::KeyFileResolver;
use crate::roaming::RoamingConfig;
use crate::storage::{KeyBatch, KeyStorage};
use futures::{StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default deadline for one cycle.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Default number of key files fetched at once.
pub const DEFAULT_MAX_CONCURRENT: usize = 8;

#[derive(Debug, Clone, Copy)]
pub struct DownloaderOptions {
    /// Deadline for resolution plus every file download.
    pub timeout: Duration,
    /// Upper bound on concurrent file fetches.
    pub max_concurrent: usize,
}

impl Default for DownloaderOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

pub struct DiagnosisKeyDownloader {
    http: HttpClient,
    cursors: Arc<dyn CursorStore>,
    regions: Arc<dyn RegionResolver>,
    roaming: Arc<RoamingConfig>,
    storage: KeyStorage,
    resolver: KeyFileResolver,
    options: DownloaderOptions,
}

impl DiagnosisKeyDownloader {
    pub fn new(
        http: HttpClient,
        cursors: Arc<dyn CursorStore>,
        regions: Arc<dyn RegionResolver>,
        roaming: Arc<RoamingConfig>,
        storage: KeyStorage,
        options: DownloaderOptions,
    ) -> Self {
        let resolver = KeyFileResolver::new(http.clone(), Arc::clone(&cursors));
        Self {
            http,
            cursors,
            regions,
            roaming,
            storage,
            resolver,
            options,
        }
    }

    /// Run one cycle. Returns every file written, each with `local_path` set;
    /// an empty list means nothing new was published.
    ///
    /// Fails on the first fetch, write or cursor error, or with
    /// `DownloadError::Timeout` once the deadline passes. Files already
    /// written stay on disk and cursors already advanced stay advanced.
    pub async fn download(&self) -> Result<Vec<CandidateFile>, DownloadError> {
        let started = Instant::now();
        match tokio::time::timeout(self.options.timeout, self.run_cycle()).await {
            Ok(Ok(files)) => {
                tracing::info!(
                    files = files.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "download cycle completed"
                );
                Ok(files)
            }
            Ok(Err(e)) => {
                tracing::warn!("download cycle failed: {}", e);
                Err(e)
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.options.timeout, "download cycle timed out");
                Err(DownloadError::Timeout(self.options.timeout))
            }
        }
    }

    /// Servers for this cycle, from the region resolver and roaming map.
    pub async fn servers(&self) -> Result<Vec<ServerEndpoint>, DownloadError> {
        let visited = self
            .regions
            .recently_visited_regions()
            .await
            .map_err(DownloadError::region)?;
        let home_region = self.regions.home_region();
        Ok(servers_to_consult(
            self.regions.home_server(),
            home_region.as_deref(),
            &visited,
            &self.roaming,
        ))
    }

    async fn run_cycle(&self) -> Result<Vec<CandidateFile>, DownloadError> {
        let servers = self.servers().await?;
        tracing::info!(servers = servers.len(), "resolving key servers");
        let candidates = self.resolver.resolve(&servers).await?;
        if candidates.is_empty() {
            tracing::info!("no new key files");
            return Ok(Vec::new());
        }

        let batch = self
            .storage
            .create_batch()
            .await
            .map_err(|e| DownloadError::io(self.storage.keys_dir(), e))?;
        tracing::info!(
            files = candidates.len(),
            dir = %batch.dir().display(),
            "downloading key files"
        );

        futures::stream::iter(candidates.into_iter().enumerate())
            .map(|(i, candidate)| self.fetch_file(&batch, i + 1, candidate))
            .buffer_unordered(self.options.max_concurrent.max(1))
            .try_collect()
            .await
    }

    async fn fetch_file(
        &self,
        batch: &KeyBatch,
        n: usize,
        candidate: CandidateFile,
    ) -> Result<CandidateFile, DownloadError> {
        let bytes = self.http.get_bytes(&candidate.file_uri).await?;
        let path = batch
            .write_file(n, &bytes)
            .await
            .map_err(|e| DownloadError::io(batch.file_path(n), e))?;
        tracing::debug!(
            uri = %candidate.file_uri,
            path = %path.display(),
            bytes = bytes.len(),
            "stored key file"
        );

        if candidate.is_most_recent {
            self.cursors
                .record_successful_download(&candidate.server_index_uri, &candidate.file_uri)
                .await
                .map_err(DownloadError::cursor)?;
            tracing::debug!(
                index = %candidate.server_index_uri,
                cursor = %candidate.file_uri,
                "advanced download cursor"
            );
        }

        Ok(candidate.with_local_path(path))
    }
}
