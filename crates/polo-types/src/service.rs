//! The `Service` value object.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A service registered with the polod daemon.
///
/// Plain record with named fields; the daemon returns one of these (as the
/// `OK` payload of an `info` reply) and the client never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Unique service identifier.
    pub identifier: String,

    /// Multicast groups the service is announced on. Empty means the
    /// daemon's configured defaults.
    #[serde(default)]
    pub multicast_groups: BTreeSet<String>,

    /// Free-form service parameters (hostname, version, ...).
    #[serde(default)]
    pub params: Map<String, Value>,

    /// Whether announcement is currently suspended.
    #[serde(default)]
    pub disabled: bool,
}

impl Service {
    /// Create a service with the given identifier and no groups or params.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn service_deserializes_from_info_payload() {
        let payload = json!({
            "identifier": "dummy",
            "multicast_groups": ["224.0.1.1", "224.0.1.2"],
            "params": {"hostname": "workstation"},
            "disabled": false
        });
        let service: Service = serde_json::from_value(payload).unwrap();
        assert_eq!(service.identifier, "dummy");
        assert_eq!(service.multicast_groups.len(), 2);
        assert_eq!(service.params["hostname"], "workstation");
        assert!(!service.disabled);
    }

    #[test]
    fn missing_optional_fields_default() {
        let payload = json!({"identifier": "dummy"});
        let service: Service = serde_json::from_value(payload).unwrap();
        assert!(service.multicast_groups.is_empty());
        assert!(service.params.is_empty());
        assert!(!service.disabled);
    }
}
