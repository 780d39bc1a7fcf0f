//! Wire models for the wg-easy appliance API
//!
//! The appliance owns all state; these types exist only for the lifetime of
//! a single request/response and mirror the upstream JSON field-for-field.

use serde::{Deserialize, Serialize};

/// One peer configuration as returned by the appliance listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    pub address: String,
    #[serde(default)]
    pub public_key: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    /// Keepalive interval; the appliance reports it as a string ("off", "25")
    #[serde(default)]
    pub persistent_keepalive: Option<String>,
    /// Null until the peer has completed a handshake
    #[serde(default)]
    pub latest_handshake_at: Option<String>,
    #[serde(default)]
    pub transfer_rx: i64,
    #[serde(default)]
    pub transfer_tx: i64,
}

/// The appliance's echo of a freshly created peer
///
/// The private key is only visible here, never in the listing. The echo
/// carries no id; the identifier is resolved afterwards by scanning the
/// listing for the assigned address.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerCreated {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub private_key: String,
    #[serde(default)]
    pub public_key: String,
    #[serde(default)]
    pub pre_shared_key: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub enabled: bool,
}
