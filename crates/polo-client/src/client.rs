//! The polo client orchestrator.
//!
//! Each call runs the same linear pipeline: validate → encode → transport
//! round-trip → decode → classify. No component holds cross-call state
//! except the transport's open socket or connection, which this client
//! owns exclusively for its lifetime.

use std::collections::BTreeSet;

use polo_protocol::{wire, DatagramTransport, TlsTransport, Transport};
use polo_types::{RequestEnvelope, ResponseEnvelope};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::PoloConfig;
use crate::error::PoloError;
use crate::validate;

/// Client for the polod service-registration daemon.
///
/// One transport resource per instance; calls take `&mut self`, so a call
/// runs to completion before the transport is reused. Concurrent callers
/// need separate instances.
pub struct PoloClient {
    transport: Box<dyn Transport>,
    config: PoloConfig,
}

impl PoloClient {
    /// Connect to the daemon, selecting plain or secure transport from
    /// `config.secure`.
    pub async fn connect(config: PoloConfig) -> Result<Self, PoloError> {
        let timeout = config.timeout();
        let transport: Box<dyn Transport> = if config.secure {
            let addr = config
                .secure_addr()
                .map_err(|e| PoloError::Internal(format!("bad daemon address: {e}")))?;
            let ca_pem = match &config.ca_cert {
                Some(path) => Some(std::fs::read_to_string(path).map_err(|e| {
                    PoloError::Internal(format!("failed to read CA certificate: {e}"))
                })?),
                None => None,
            };
            Box::new(TlsTransport::connect(addr, &config.host, ca_pem.as_deref(), timeout).await?)
        } else {
            let addr = config
                .plain_addr()
                .map_err(|e| PoloError::Internal(format!("bad daemon address: {e}")))?;
            Box::new(DatagramTransport::bind(addr, timeout).await?)
        };
        Ok(Self { transport, config })
    }

    /// Build a client around an already constructed transport.
    pub fn with_transport(transport: Box<dyn Transport>, config: PoloConfig) -> Self {
        Self { transport, config }
    }

    /// Ask the daemon to advertise `name` over multicast discovery.
    ///
    /// An empty group set means "use the daemon's configured defaults".
    /// Returns the daemon's acknowledgement payload (usually the
    /// registered identifier).
    pub async fn publish_service(
        &mut self,
        name: &str,
        multicast_groups: &BTreeSet<String>,
        permanent: bool,
        root: bool,
    ) -> Result<Value, PoloError> {
        let mut envelope = RequestEnvelope::publish(name, multicast_groups, permanent, root);
        envelope.params = self.config.params.clone();
        self.request(envelope).await
    }

    /// Ask the daemon to withdraw `name` from multicast discovery.
    pub async fn unpublish_service(
        &mut self,
        name: &str,
        multicast_groups: &BTreeSet<String>,
        delete_file: bool,
    ) -> Result<Value, PoloError> {
        self.request(RequestEnvelope::unpublish(name, multicast_groups, delete_file))
            .await
    }

    /// Query the daemon's record for `name`.
    pub async fn service_info(&mut self, name: &str) -> Result<Value, PoloError> {
        self.request(RequestEnvelope::info(name)).await
    }

    /// Run one request through the full pipeline.
    ///
    /// The typed operations above delegate here; callers with untyped
    /// input can submit an envelope directly and get the same validation
    /// and classification behavior.
    pub async fn request(&mut self, envelope: RequestEnvelope) -> Result<Value, PoloError> {
        validate::validate_request(&envelope)?;

        let operation = envelope.action;
        let service = envelope.service_label();
        let payload = wire::encode_request(&envelope)?;

        debug!(%operation, service = %service, "sending request");
        let reply = self.transport.round_trip(&payload).await?;

        match wire::decode_response(&reply)? {
            ResponseEnvelope::Ok(value) => {
                debug!(%operation, service = %service, "daemon acknowledged");
                Ok(value)
            }
            ResponseEnvelope::Error(message) => {
                warn!(%operation, service = %service, %message, "daemon rejected request");
                Err(PoloError::Daemon {
                    operation,
                    service,
                    message,
                })
            }
        }
    }
}
