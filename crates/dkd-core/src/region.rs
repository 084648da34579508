//! Region resolver interface.
//!
//! Which countries the user visited is decided elsewhere; the downloader only
//! asks for the home server and the list of recently visited region codes.

use crate::endpoint::ServerEndpoint;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait RegionResolver: Send + Sync {
    /// Server pair of the user's home region. Always consulted.
    fn home_server(&self) -> ServerEndpoint;

    /// Home region code, if known. Visited regions equal to it are skipped
    /// when looking up roaming servers.
    fn home_region(&self) -> Option<String> {
        None
    }

    /// Region codes (ISO-3166 alpha-2) visited within the lookback window.
    async fn recently_visited_regions(&self) -> Result<Vec<String>>;
}

/// Resolver with a fixed home server and region list (config file or CLI flags).
#[derive(Debug, Clone)]
pub struct StaticRegionResolver {
    home: ServerEndpoint,
    home_region: Option<String>,
    visited: Vec<String>,
}

impl StaticRegionResolver {
    pub fn new(home: ServerEndpoint) -> Self {
        Self {
            home,
            home_region: None,
            visited: Vec::new(),
        }
    }

    pub fn with_home_region(mut self, region: impl Into<String>) -> Self {
        self.home_region = Some(region.into());
        self
    }

    pub fn with_visited<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.visited = regions.into_iter().map(Into::into).collect();
        self
    }
}

#[async_trait]
impl RegionResolver for StaticRegionResolver {
    fn home_server(&self) -> ServerEndpoint {
        self.home.clone()
    }

    fn home_region(&self) -> Option<String> {
        self.home_region.clone()
    }

    async fn recently_visited_regions(&self) -> Result<Vec<String>> {
        Ok(self.visited.clone())
    }
}
