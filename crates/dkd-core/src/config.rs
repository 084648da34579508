use crate::downloader::{DownloaderOptions, DEFAULT_MAX_CONCURRENT};
use crate::endpoint::ServerEndpoint;
use crate::http::RequestOptions;
use crate::retry::RetryPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum retries for 5xx and transport failures (429 is always retried once).
    pub max_retries: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_secs: 1.0,
            max_delay_secs: 60,
        }
    }
}

impl RetryConfig {
    /// Fails when `base_delay_secs` is infinite or too large for a `Duration`.
    pub fn to_policy(&self) -> Result<RetryPolicy> {
        let base_delay = Duration::try_from_secs_f64(self.base_delay_secs.max(0.0))
            .with_context(|| {
                format!("retry.base_delay_secs out of range: {}", self.base_delay_secs)
            })?;
        Ok(RetryPolicy {
            max_retries: self.max_retries,
            base_delay,
            max_delay: Duration::from_secs(self.max_delay_secs),
        })
    }
}

/// Transport settings (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            request_timeout_secs: 300,
            user_agent: None,
        }
    }
}

impl HttpConfig {
    pub fn to_request_options(&self) -> RequestOptions {
        let mut opts = RequestOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..RequestOptions::default()
        };
        if let Some(ua) = &self.user_agent {
            opts.user_agent = ua.clone();
        }
        opts
    }
}

/// Global configuration loaded from `~/.config/dkd/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DkdConfig {
    /// Home key server. Required to run a download cycle.
    #[serde(default)]
    pub home: Option<ServerEndpoint>,
    /// Home region code; never looked up as a roaming region.
    #[serde(default)]
    pub home_region: Option<String>,
    /// Regions visited recently (static source used by the CLI).
    #[serde(default)]
    pub visited_regions: Vec<String>,
    /// JSON file mapping region codes to roaming key servers.
    #[serde(default)]
    pub roaming_config: Option<PathBuf>,
    /// Root for `diag_keys/`; defaults to the XDG data dir.
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,
    /// Deadline for one whole download cycle.
    pub download_timeout_secs: u64,
    /// Maximum key files fetched at once.
    pub max_concurrent_downloads: usize,
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    #[serde(default)]
    pub http: Option<HttpConfig>,
}

impl Default for DkdConfig {
    fn default() -> Self {
        Self {
            home: None,
            home_region: None,
            visited_regions: Vec::new(),
            roaming_config: None,
            storage_dir: None,
            download_timeout_secs: 30 * 60,
            max_concurrent_downloads: DEFAULT_MAX_CONCURRENT,
            retry: None,
            http: None,
        }
    }
}

impl DkdConfig {
    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        self.retry.clone().unwrap_or_default().to_policy()
    }

    pub fn request_options(&self) -> RequestOptions {
        self.http.clone().unwrap_or_default().to_request_options()
    }

    pub fn downloader_options(&self) -> DownloaderOptions {
        DownloaderOptions {
            timeout: Duration::from_secs(self.download_timeout_secs),
            max_concurrent: self.max_concurrent_downloads.max(1),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dkd")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<DkdConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = DkdConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

/// Load configuration from an explicit path.
pub fn load_from_path(path: &Path) -> Result<DkdConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: DkdConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = DkdConfig::default();
        assert!(cfg.home.is_none());
        assert_eq!(cfg.download_timeout_secs, 1800);
        assert_eq!(cfg.max_concurrent_downloads, DEFAULT_MAX_CONCURRENT);
        assert_eq!(cfg.retry_policy().unwrap().max_retries, 3);
        assert_eq!(cfg.downloader_options().timeout, Duration::from_secs(1800));
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = DkdConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: DkdConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.download_timeout_secs, cfg.download_timeout_secs);
        assert_eq!(parsed.max_concurrent_downloads, cfg.max_concurrent_downloads);
        assert!(parsed.home.is_none());
    }

    #[test]
    fn config_toml_home_and_regions() {
        let toml = r#"
            home_region = "US"
            visited_regions = ["CA", "MX"]
            roaming_config = "/etc/dkd/roaming.json"
            download_timeout_secs = 600
            max_concurrent_downloads = 2

            [home]
            index = "https://keys.example.org/v1/index.txt"
            base = "https://keys.example.org/v1/"
        "#;
        let cfg: DkdConfig = toml::from_str(toml).unwrap();
        let home = cfg.home.as_ref().unwrap();
        assert_eq!(home.index_uri.as_str(), "https://keys.example.org/v1/index.txt");
        assert_eq!(home.file_base_uri.as_str(), "https://keys.example.org/v1/");
        assert_eq!(cfg.home_region.as_deref(), Some("US"));
        assert_eq!(cfg.visited_regions, vec!["CA", "MX"]);
        assert_eq!(
            cfg.roaming_config.as_deref(),
            Some(Path::new("/etc/dkd/roaming.json"))
        );
        assert_eq!(cfg.downloader_options().max_concurrent, 2);
        assert!(cfg.retry.is_none());
    }

    #[test]
    fn config_toml_retry_and_http() {
        let toml = r#"
            download_timeout_secs = 1800
            max_concurrent_downloads = 8

            [retry]
            max_retries = 5
            base_delay_secs = 0.5
            max_delay_secs = 15

            [http]
            connect_timeout_secs = 5
            request_timeout_secs = 60
            user_agent = "dkd-test"
        "#;
        let cfg: DkdConfig = toml::from_str(toml).unwrap();
        let policy = cfg.retry_policy().unwrap();
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.base_delay, Duration::from_millis(500));
        assert_eq!(policy.max_delay, Duration::from_secs(15));
        let opts = cfg.request_options();
        assert_eq!(opts.connect_timeout, Duration::from_secs(5));
        assert_eq!(opts.request_timeout, Duration::from_secs(60));
        assert_eq!(opts.user_agent, "dkd-test");
    }

    #[test]
    fn load_from_path_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "download_timeout_secs = \"soon\"").unwrap();
        let err = load_from_path(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("parse config"));
    }

    #[test]
    fn out_of_range_base_delay_is_an_error() {
        for value in ["inf", "1e300"] {
            let toml = format!(
                "download_timeout_secs = 1800\nmax_concurrent_downloads = 8\n\n[retry]\nmax_retries = 3\nbase_delay_secs = {}\nmax_delay_secs = 60\n",
                value
            );
            let cfg: DkdConfig = toml::from_str(&toml).unwrap();
            let err = cfg.retry_policy().unwrap_err();
            assert!(format!("{:#}", err).contains("base_delay_secs"));
        }
    }

    #[test]
    fn negative_base_delay_clamps_to_zero() {
        let retry = RetryConfig {
            base_delay_secs: -2.0,
            ..RetryConfig::default()
        };
        assert_eq!(retry.to_policy().unwrap().base_delay, Duration::ZERO);
    }
}
