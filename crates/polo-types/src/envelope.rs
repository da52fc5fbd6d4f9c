//! Request and response envelopes.
//!
//! Requests are JSON objects carrying at minimum the action discriminator
//! and the service name; responses are exactly `{"OK": <value>}` or
//! `{"Error": "<message>"}`. The envelope fields are `serde_json::Value`
//! because the daemon contract is dynamically typed: requests may be built
//! from untyped input, and the validator rejects ill-typed fields before
//! any I/O happens.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The polo operation being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Publish,
    Unpublish,
    Info,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Publish => "publish",
            Action::Unpublish => "unpublish",
            Action::Info => "info",
        }
    }

    /// Progressive label for human-facing messages ("publishing", ...),
    /// distinct from the wire tag.
    pub fn label(self) -> &'static str {
        match self {
            Action::Publish => "publishing",
            Action::Unpublish => "unpublishing",
            Action::Info => "info",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request to the daemon. Built fresh per call, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct RequestEnvelope {
    pub action: Action,
    pub service: Value,

    /// Requested multicast groups. Empty means "daemon defaults" and is
    /// omitted from the wire object.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub multicast_groups: Vec<Value>,

    /// Boolean flags relevant to the action (`permanent`, `root`,
    /// `delete_file`), flattened into the wire object.
    #[serde(flatten)]
    pub flags: BTreeMap<&'static str, Value>,

    /// Free-form parameters sent along with publish requests.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, Value>,
}

impl RequestEnvelope {
    /// Envelope for a publish request built from typed arguments.
    pub fn publish(
        service: &str,
        multicast_groups: &BTreeSet<String>,
        permanent: bool,
        root: bool,
    ) -> Self {
        let mut flags = BTreeMap::new();
        flags.insert("permanent", Value::Bool(permanent));
        flags.insert("root", Value::Bool(root));
        Self {
            action: Action::Publish,
            service: Value::String(service.to_string()),
            multicast_groups: groups_to_values(multicast_groups),
            flags,
            params: Map::new(),
        }
    }

    /// Envelope for an unpublish request built from typed arguments.
    pub fn unpublish(
        service: &str,
        multicast_groups: &BTreeSet<String>,
        delete_file: bool,
    ) -> Self {
        let mut flags = BTreeMap::new();
        flags.insert("delete_file", Value::Bool(delete_file));
        Self {
            action: Action::Unpublish,
            service: Value::String(service.to_string()),
            multicast_groups: groups_to_values(multicast_groups),
            flags,
            params: Map::new(),
        }
    }

    /// Envelope for an info query.
    pub fn info(service: &str) -> Self {
        Self {
            action: Action::Info,
            service: Value::String(service.to_string()),
            multicast_groups: Vec::new(),
            flags: BTreeMap::new(),
            params: Map::new(),
        }
    }

    /// The service name as it should appear in error messages: the string
    /// itself for text values, the JSON rendering otherwise (`1`, `null`).
    pub fn service_label(&self) -> String {
        match &self.service {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// One reply from the daemon, already shape-checked.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseEnvelope {
    /// `{"OK": <value>}` — the wrapped value is the call's result.
    Ok(Value),
    /// `{"Error": "<message>"}` — the daemon rejected the request.
    Error(String),
}

fn groups_to_values(groups: &BTreeSet<String>) -> Vec<Value> {
    groups
        .iter()
        .map(|g| Value::String(g.clone()))
        .collect()
}
