//! wgadm-core - Core types for the WireGuard appliance admin gateway
//!
//! This crate provides the wire models of the wg-easy appliance API and the
//! error taxonomy shared by the client adapter and the API layer.

pub mod error;
pub mod models;

pub use error::{ApplianceError, ApplianceResult};
pub use models::{PeerCreated, PeerSummary};
