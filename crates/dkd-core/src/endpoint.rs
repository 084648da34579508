//! Server endpoints and the candidate files resolved from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// One key server to consult: the index document listing its export files and
/// the base URI each listed filename is appended to.
///
/// Serialized as `{"index": "...", "base": "..."}` in both the roaming JSON
/// and the `[home]` table of the TOML config.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerEndpoint {
    #[serde(rename = "index")]
    pub index_uri: Url,
    #[serde(rename = "base")]
    pub file_base_uri: Url,
}

impl ServerEndpoint {
    pub fn new(index_uri: Url, file_base_uri: Url) -> Self {
        Self {
            index_uri,
            file_base_uri,
        }
    }

    /// Parse both URIs from strings.
    pub fn parse(index: &str, base: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(index)?, Url::parse(base)?))
    }
}

impl fmt::Display for ServerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (files under {})", self.index_uri, self.file_base_uri)
    }
}

/// A key export file listed by one server's index.
///
/// Created by the resolver with `local_path == None`; the downloader fills in
/// the path once the bytes are on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Index URI of the server that listed this file (the cursor key).
    pub server_index_uri: Url,
    pub file_uri: Url,
    pub local_path: Option<PathBuf>,
    /// True only for the last file, in index order, among this server's files.
    pub is_most_recent: bool,
}

impl CandidateFile {
    pub fn new(server_index_uri: Url, file_uri: Url, is_most_recent: bool) -> Self {
        Self {
            server_index_uri,
            file_uri,
            local_path: None,
            is_most_recent,
        }
    }

    /// Returns the completed candidate pointing at `path`.
    pub fn with_local_path(mut self, path: PathBuf) -> Self {
        self.local_path = Some(path);
        self
    }
}
