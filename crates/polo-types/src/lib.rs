//! Shared types for polo.
//!
//! This crate contains the types shared across the polo workspace: the
//! `Service` value object and the JSON request/response envelopes exchanged
//! with the polod daemon.

pub mod envelope;
pub mod service;

pub use envelope::{Action, RequestEnvelope, ResponseEnvelope};
pub use service::Service;
