//! Mock transport for testing.
//!
//! Returns scripted replies without touching the network, and records every
//! payload sent so tests can assert on call counts and wire bytes.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::ProtocolError;
use crate::transport::Transport;

/// Shared state for observing what a [`MockTransport`] did.
#[derive(Debug, Default)]
struct MockTransportState {
    calls: usize,
    sent: Vec<Vec<u8>>,
}

/// Scripted transport backend for testing.
pub struct MockTransport {
    script: VecDeque<Result<Vec<u8>, ProtocolError>>,
    repeat: Option<Vec<u8>>,
    state: Arc<Mutex<MockTransportState>>,
}

impl MockTransport {
    /// A transport that answers every round-trip with the same reply.
    pub fn always(reply: impl Into<Vec<u8>>) -> Self {
        Self {
            script: VecDeque::new(),
            repeat: Some(reply.into()),
            state: Arc::new(Mutex::new(MockTransportState::default())),
        }
    }

    /// A transport that plays back `replies` in order, then fails.
    pub fn scripted(replies: Vec<Result<Vec<u8>, ProtocolError>>) -> Self {
        Self {
            script: replies.into_iter().collect(),
            repeat: None,
            state: Arc::new(Mutex::new(MockTransportState::default())),
        }
    }

    /// Get a clonable handle for observing the transport from tests.
    pub fn handle(&self) -> MockTransportHandle {
        MockTransportHandle {
            state: Arc::clone(&self.state),
        }
    }
}

/// Clonable observer handle for [`MockTransport`].
#[derive(Clone)]
pub struct MockTransportHandle {
    state: Arc<Mutex<MockTransportState>>,
}

impl MockTransportHandle {
    /// How many round-trips were attempted.
    pub fn calls(&self) -> usize {
        self.state.lock().unwrap().calls
    }

    /// Snapshot of every payload sent, in order.
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.state.lock().unwrap().sent.clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn round_trip(&mut self, payload: &[u8]) -> Result<Vec<u8>, ProtocolError> {
        {
            let mut state = self.state.lock().unwrap();
            state.calls += 1;
            state.sent.push(payload.to_vec());
        }

        if let Some(reply) = self.script.pop_front() {
            return reply;
        }
        if let Some(reply) = &self.repeat {
            return Ok(reply.clone());
        }
        Err(ProtocolError::Receive(
            "mock transport script exhausted".to_string(),
        ))
    }
}
