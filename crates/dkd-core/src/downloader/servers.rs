//! Server list for one cycle: home plus roaming servers of visited regions.

use crate::endpoint::ServerEndpoint;
use crate::roaming::{normalize_region, RoamingConfig};

/// Home endpoint first, then the roaming endpoints of every visited region in
/// visit order. Regions without roaming servers, the home region itself and
/// endpoints already in the list are skipped.
pub fn servers_to_consult(
    home: ServerEndpoint,
    home_region: Option<&str>,
    visited: &[String],
    roaming: &RoamingConfig,
) -> Vec<ServerEndpoint> {
    let home_region = home_region.map(normalize_region);
    let mut servers = vec![home];
    for region in visited {
        let region = normalize_region(region);
        if region.is_empty() || home_region.as_deref() == Some(region.as_str()) {
            continue;
        }
        let roaming_servers = roaming.servers_for(&region);
        if roaming_servers.is_empty() {
            tracing::debug!(region = %region, "no roaming servers configured for region");
        }
        for ep in roaming_servers {
            if !servers.contains(ep) {
                servers.push(ep.clone());
            }
        }
    }
    servers
}
