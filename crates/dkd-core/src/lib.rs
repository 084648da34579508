//! Discovery and resumable download of diagnosis key export files from a
//! home key server and the roaming servers of recently visited regions.

pub mod config;
pub mod logging;

pub mod cursor;
pub mod downloader;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod region;
pub mod resolver;
pub mod retry;
pub mod roaming;
pub mod storage;

pub use cursor::{CursorStore, MemoryCursorStore, SqliteCursorStore};
pub use downloader::{DiagnosisKeyDownloader, DownloaderOptions};
pub use endpoint::{CandidateFile, ServerEndpoint};
pub use error::DownloadError;
pub use region::{RegionResolver, StaticRegionResolver};
pub use roaming::RoamingConfig;
