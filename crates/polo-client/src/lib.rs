//! # polo-client
//!
//! Client library for the polod service-registration daemon: publish,
//! unpublish, and query services announced over multicast discovery.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use polo_client::{PoloClient, PoloConfig};
//! use std::collections::BTreeSet;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = PoloClient::connect(PoloConfig::default()).await?;
//!
//!     // Announce on the daemon's default groups.
//!     client
//!         .publish_service("my-service", &BTreeSet::new(), false, false)
//!         .await?;
//!
//!     let info = client.service_info("my-service").await?;
//!     println!("registered: {info}");
//!     Ok(())
//! }
//! ```
//!
//! Every call is validated before any I/O happens; transport and decode
//! failures surface as a single internal-communication error kind, while
//! daemon rejections carry the daemon's message with call context.

pub mod client;
pub mod config;
pub mod error;
pub mod validate;

pub use client::PoloClient;
pub use config::PoloConfig;
pub use error::PoloError;
