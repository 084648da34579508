//! Roaming server map: region code -> key servers for that region.
//!
//! Built once from JSON and immutable afterwards. Parsing fails open: a
//! missing or malformed document yields an empty map, so the downloader
//! degrades to home-server-only behaviour instead of failing startup.

mod parse;

pub use parse::parse_roaming_json;

use crate::endpoint::ServerEndpoint;
use std::collections::BTreeMap;
use std::path::Path;

/// Region code (upper-case ISO-3166 alpha-2) -> ordered endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoamingConfig {
    servers: BTreeMap<String, Vec<ServerEndpoint>>,
}

impl RoamingConfig {
    /// Region keys are upper-cased. Keys that differ only in case are merged
    /// in key order, without repeating an endpoint.
    pub fn new(servers: BTreeMap<String, Vec<ServerEndpoint>>) -> Self {
        let mut merged: BTreeMap<String, Vec<ServerEndpoint>> = BTreeMap::new();
        for (region, eps) in servers {
            let key = normalize_region(&region);
            match merged.get_mut(&key) {
                Some(existing) => {
                    tracing::warn!(
                        region = %region,
                        merged_into = %key,
                        "roaming config lists a region twice, merging server lists"
                    );
                    for ep in eps {
                        if !existing.contains(&ep) {
                            existing.push(ep);
                        }
                    }
                }
                None => {
                    merged.insert(key, eps);
                }
            }
        }
        Self { servers: merged }
    }

    /// Parse the JSON document; never fails (see module docs).
    pub fn parse(json: &str) -> Self {
        Self::new(parse_roaming_json(json))
    }

    /// Read and parse a JSON file. Unreadable files degrade to an empty map.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let cfg = Self::parse(&json);
                tracing::info!(
                    path = %path.display(),
                    regions = cfg.servers.len(),
                    "loaded roaming config"
                );
                cfg
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "roaming config unreadable, roaming disabled: {}", e);
                Self::default()
            }
        }
    }

    /// Endpoints configured for `region`, in configuration order. Empty when
    /// the region has no roaming servers.
    pub fn servers_for(&self, region: &str) -> &[ServerEndpoint] {
        self.servers
            .get(&normalize_region(region))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.servers.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }
}

pub(crate) fn normalize_region(region: &str) -> String {
    region.trim().to_ascii_uppercase()
}
