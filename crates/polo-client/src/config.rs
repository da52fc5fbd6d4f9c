//! Client configuration loaded from TOML.
//!
//! No implicit process-wide defaults: everything the client needs (ports,
//! timeout, TLS material, host parameters) lives here and is passed to the
//! constructor explicitly.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Client settings for reaching the polod daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoloConfig {
    /// Daemon host. The daemon listens on the local host only; this is an
    /// IPC mechanism dressed as a network protocol.
    #[serde(default = "default_host")]
    pub host: String,

    /// Plain (datagram) port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// TLS-wrapped stream port.
    #[serde(default = "default_secure_port")]
    pub secure_port: u16,

    /// Select the secure transport instead of the plain one.
    #[serde(default)]
    pub secure: bool,

    /// Reply-wait bound in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// PEM file with roots for verifying the daemon certificate. When
    /// absent, the secure transport accepts the local daemon's self-signed
    /// certificate.
    #[serde(default)]
    pub ca_cert: Option<PathBuf>,

    /// Free-form parameters attached to publish requests.
    #[serde(default = "default_params")]
    pub params: Map<String, Value>,
}

impl Default for PoloConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            secure_port: default_secure_port(),
            secure: false,
            timeout_ms: default_timeout_ms(),
            ca_cert: None,
            params: default_params(),
        }
    }
}

impl PoloConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// The reply-wait bound as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Address of the plain datagram endpoint.
    pub fn plain_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        Ok(SocketAddr::new(self.host.parse()?, self.port))
    }

    /// Address of the secure stream endpoint.
    pub fn secure_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        Ok(SocketAddr::new(self.host.parse()?, self.secure_port))
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    1390
}

fn default_secure_port() -> u16 {
    1391
}

fn default_timeout_ms() -> u64 {
    1000
}

fn default_params() -> Map<String, Value> {
    let mut params = Map::new();
    if let Some(host) = hostname::get().ok().and_then(|h| h.into_string().ok()) {
        params.insert("hostname".to_string(), Value::String(host));
    }
    params
}
