//! Discovery document: the read-only listing of registered tools.

use serde::Serialize;

use super::registry::{CapabilityDescriptor, Registry};

/// Server name plus every registered capability, in registration order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryDocument<'a> {
    pub server_name: &'a str,
    pub capabilities: Vec<CapabilityDescriptor<'a>>,
}

impl DiscoveryDocument<'_> {
    /// Serialize into a JSON value.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Project the registry into a discovery document.
pub fn describe<'a>(server_name: &'a str, registry: &'a Registry) -> DiscoveryDocument<'a> {
    DiscoveryDocument {
        server_name,
        capabilities: registry.list().collect(),
    }
}
