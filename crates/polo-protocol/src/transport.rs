//! Daemon transports: plain UDP datagrams and a TLS-wrapped stream.
//!
//! Both implement [`Transport`], one round-trip per call, so the client
//! never duplicates validation or decode logic per variant. The reply wait
//! is always bounded by the configured timeout; there is no other
//! cancellation primitive.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rustls::pki_types::ServerName;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;
use tracing::{debug, trace};

use crate::error::ProtocolError;
use crate::tls;
use crate::wire::MAX_FRAME_SIZE;

/// One send-then-receive exchange with the daemon.
///
/// A transport owns exactly one socket or connection and is not safe for
/// concurrent calls; `&mut self` enforces one round-trip at a time.
#[async_trait]
pub trait Transport: Send {
    /// Send `payload` and await a single reply, bounded by the transport's
    /// configured timeout.
    async fn round_trip(&mut self, payload: &[u8]) -> Result<Vec<u8>, ProtocolError>;
}

/// Plain transport: connectionless UDP to the daemon's plain port.
pub struct DatagramTransport {
    socket: UdpSocket,
    daemon_addr: SocketAddr,
    timeout: Duration,
}

impl DatagramTransport {
    /// Bind an ephemeral reply socket for requests to `daemon_addr`.
    pub async fn bind(daemon_addr: SocketAddr, timeout: Duration) -> Result<Self, ProtocolError> {
        let bind_addr: SocketAddr = if daemon_addr.is_ipv4() {
            (std::net::Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| ProtocolError::Connection(e.to_string()))?;
        debug!(daemon = %daemon_addr, "datagram transport bound");
        Ok(Self {
            socket,
            daemon_addr,
            timeout,
        })
    }
}

#[async_trait]
impl Transport for DatagramTransport {
    async fn round_trip(&mut self, payload: &[u8]) -> Result<Vec<u8>, ProtocolError> {
        let sent = self
            .socket
            .send_to(payload, self.daemon_addr)
            .await
            .map_err(|e| ProtocolError::Send(e.to_string()))?;
        if sent != payload.len() {
            return Err(ProtocolError::ShortWrite {
                sent,
                expected: payload.len(),
            });
        }

        let mut buf = vec![0u8; MAX_FRAME_SIZE];
        let (len, from) = tokio::time::timeout(self.timeout, self.socket.recv_from(&mut buf))
            .await
            .map_err(|_| ProtocolError::Timeout(self.timeout))?
            .map_err(|e| ProtocolError::Receive(e.to_string()))?;

        trace!(len, from = %from, "received datagram reply");
        buf.truncate(len);
        Ok(buf)
    }
}

/// Secure transport: a TLS-wrapped stream to the daemon's secure port.
#[derive(Debug)]
pub struct TlsTransport {
    stream: TlsStream<TcpStream>,
    timeout: Duration,
}

impl TlsTransport {
    /// Connect and complete the TLS handshake, both bounded by `timeout`.
    ///
    /// `ca_pem` optionally pins the daemon certificate; see
    /// [`tls::client_config`].
    pub async fn connect(
        daemon_addr: SocketAddr,
        server_name: &str,
        ca_pem: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, ProtocolError> {
        // Install the default crypto provider if not already done
        let _ = rustls::crypto::ring::default_provider().install_default();

        let config = tls::client_config(ca_pem)?;
        let connector = TlsConnector::from(Arc::new(config));

        let tcp = tokio::time::timeout(timeout, TcpStream::connect(daemon_addr))
            .await
            .map_err(|_| ProtocolError::Timeout(timeout))?
            .map_err(|e| ProtocolError::Connection(e.to_string()))?;

        let name = ServerName::try_from(server_name.to_string())
            .map_err(|e| ProtocolError::Tls(e.to_string()))?;
        let stream = tokio::time::timeout(timeout, connector.connect(name, tcp))
            .await
            .map_err(|_| ProtocolError::Timeout(timeout))?
            .map_err(|e| ProtocolError::Tls(e.to_string()))?;

        debug!(daemon = %daemon_addr, "TLS transport connected");
        Ok(Self { stream, timeout })
    }
}

#[async_trait]
impl Transport for TlsTransport {
    async fn round_trip(&mut self, payload: &[u8]) -> Result<Vec<u8>, ProtocolError> {
        self.stream
            .write_all(payload)
            .await
            .map_err(|e| ProtocolError::Send(e.to_string()))?;
        self.stream
            .flush()
            .await
            .map_err(|e| ProtocolError::Send(e.to_string()))?;

        let mut buf = vec![0u8; MAX_FRAME_SIZE];
        let len = tokio::time::timeout(self.timeout, self.stream.read(&mut buf))
            .await
            .map_err(|_| ProtocolError::Timeout(self.timeout))?
            .map_err(|e| ProtocolError::Receive(e.to_string()))?;
        if len == 0 {
            return Err(ProtocolError::Receive(
                "connection closed before a reply arrived".to_string(),
            ));
        }

        trace!(len, "received stream reply");
        buf.truncate(len);
        Ok(buf)
    }
}
