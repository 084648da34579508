//! Key-file resolver: server endpoints -> candidate files to download.
//!
//! For every server the index is fetched fresh, split into filenames, mapped
//! onto the server's file base URI and cut after the stored cursor. Servers
//! are resolved concurrently; any failure fails the whole call.

mod index;

pub use index::{file_uri, files_after_cursor, parse_index};

use crate::cursor::CursorStore;
use crate::endpoint::{CandidateFile, ServerEndpoint};
use crate::error::DownloadError;
use crate::http::HttpClient;
use futures::future::try_join_all;
use std::sync::Arc;

#[derive(Clone)]
pub struct KeyFileResolver {
    http: HttpClient,
    cursors: Arc<dyn CursorStore>,
}

impl KeyFileResolver {
    pub fn new(http: HttpClient, cursors: Arc<dyn CursorStore>) -> Self {
        Self { http, cursors }
    }

    /// Candidate files for all `servers`, flattened. Order across servers is
    /// unspecified; within one server it is index order.
    pub async fn resolve(
        &self,
        servers: &[ServerEndpoint],
    ) -> Result<Vec<CandidateFile>, DownloadError> {
        let per_server = try_join_all(servers.iter().map(|s| self.resolve_server(s))).await?;
        Ok(per_server.into_iter().flatten().collect())
    }

    async fn resolve_server(
        &self,
        server: &ServerEndpoint,
    ) -> Result<Vec<CandidateFile>, DownloadError> {
        let body = self.http.get_text(&server.index_uri).await?;
        let listed = parse_index(&body)
            .into_iter()
            .map(|name| file_uri(&server.file_base_uri, name))
            .collect::<Result<Vec<_>, _>>()?;
        let listed_count = listed.len();

        let cursor = self
            .cursors
            .last_successful_download(&server.index_uri)
            .await
            .map_err(DownloadError::cursor)?;
        if let Some(c) = &cursor {
            if !listed.contains(c) {
                tracing::info!(
                    index = %server.index_uri,
                    cursor = %c,
                    "cursor not in current index, fetching all listed files"
                );
            }
        }
        let fresh = files_after_cursor(listed, cursor.as_ref());

        tracing::debug!(
            index = %server.index_uri,
            listed = listed_count,
            new = fresh.len(),
            "resolved server index"
        );

        let last = fresh.len().checked_sub(1);
        Ok(fresh
            .into_iter()
            .enumerate()
            .map(|(i, uri)| {
                CandidateFile::new(server.index_uri.clone(), uri, Some(i) == last)
            })
            .collect())
    }
}
