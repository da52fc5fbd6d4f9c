//! Protocol and transport errors.
//!
//! These variants are diagnostic detail only: the client layer collapses
//! every one of them into its single internal-communication error kind.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("send failed: {0}")]
    Send(String),

    #[error("short write: sent {sent} of {expected} bytes")]
    ShortWrite { sent: usize, expected: usize },

    #[error("timed out after {0:?} waiting for a reply")]
    Timeout(Duration),

    #[error("receive failed: {0}")]
    Receive(String),

    #[error("serialisation error: {0}")]
    Serialization(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("TLS error: {0}")]
    Tls(String),
}
