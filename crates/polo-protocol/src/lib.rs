//! Transport layer and wire codec for the polod client protocol.
//!
//! This crate handles the daemon round-trip (plain UDP datagrams or a
//! TLS-wrapped stream, behind one [`Transport`] trait), JSON envelope
//! encoding/decoding, and the transport-level error taxonomy.

pub mod error;
#[cfg(feature = "mock")]
pub mod mock;
pub mod tls;
pub mod transport;
pub mod wire;

pub use error::ProtocolError;
pub use transport::{DatagramTransport, TlsTransport, Transport};
