//! JSON -> region map. Pure, no I/O.

use crate::endpoint::ServerEndpoint;
use std::collections::BTreeMap;

/// Parse `{"<CC>": [{"index": "<url>", "base": "<url>"}, ...], ...}`.
///
/// Any failure (invalid JSON, `null`, missing fields, wrong types, relative
/// URLs) yields an empty map and a warning. Per-region order is kept.
pub fn parse_roaming_json(json: &str) -> BTreeMap<String, Vec<ServerEndpoint>> {
    let json = json.trim();
    if json.is_empty() {
        return BTreeMap::new();
    }
    match serde_json::from_str::<Option<BTreeMap<String, Vec<ServerEndpoint>>>>(json) {
        Ok(Some(map)) => map,
        Ok(None) => BTreeMap::new(),
        Err(e) => {
            tracing::warn!("invalid roaming config, ignoring it: {}", e);
            BTreeMap::new()
        }
    }
}
