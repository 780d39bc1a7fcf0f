//! wgadm Client Library
//!
//! Provides a typed, session-authenticated HTTP client for the wg-easy
//! appliance administrative API. The session is cookie-based: one
//! authentication request against `/api/session` fills the cookie store,
//! and every subsequent call rides on the same client.
//!
//! # Example
//!
//! ```rust,no_run
//! use wgadm_client::ApplianceClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), wgadm_client::ApplianceError> {
//!     let client = ApplianceClient::connect("10.0.0.5", "secret").await?;
//!
//!     // List peer configurations
//!     let peers = client.list_peers().await?;
//!
//!     // Create one and resolve its identifier from the listing
//!     let created = client.create_peer("laptop").await?;
//!     let id = client.find_peer_id(&created.address).await?;
//!
//!     // Fetch the scannable config
//!     let qr = client.peer_qrcode(&id).await?;
//!     let _ = (peers, qr);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! The `testing` module provides an in-process mock appliance:
//!
//! ```rust,ignore
//! use wgadm_client::testing::MockAppliance;
//! use wgadm_client::ApplianceClient;
//!
//! let mock = MockAppliance::start().await;
//! let client = ApplianceClient::connect_with_port("127.0.0.1", mock.port(), "secret").await?;
//! ```

mod client;
pub mod testing;

pub use client::{ApplianceClient, ADMIN_PORT};

// Re-export core types for convenience
pub use wgadm_core::{ApplianceError, ApplianceResult, PeerCreated, PeerSummary};
