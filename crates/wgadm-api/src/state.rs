//! Application state for the admin gateway API

use std::sync::Arc;

use tokio::sync::RwLock;
use wgadm_client::{ApplianceClient, ADMIN_PORT};

use crate::error::ApiError;

/// Application state shared across all handlers
///
/// Holds the single process-wide appliance session. Only Connect writes the
/// slot; every other operation reads it. The lock is never held across an
/// appliance call: readers clone the client out and release the guard.
#[derive(Clone)]
pub struct AppState {
    session: Arc<RwLock<Option<ApplianceClient>>>,
    appliance_port: u16,
}

impl AppState {
    /// Create state targeting the appliance's fixed admin port
    pub fn new() -> Self {
        Self::with_appliance_port(ADMIN_PORT)
    }

    /// Create state targeting a remapped admin port (tests, port forwards)
    pub fn with_appliance_port(appliance_port: u16) -> Self {
        Self {
            session: Arc::new(RwLock::new(None)),
            appliance_port,
        }
    }

    /// Clone the active session, or fail when none has been established
    pub async fn session(&self) -> Result<ApplianceClient, ApiError> {
        self.session.read().await.clone().ok_or_else(|| {
            ApiError::Unauthorized("no active appliance session, connect first".to_string())
        })
    }

    /// Install a freshly established session, replacing any previous one
    pub async fn replace_session(&self, client: ApplianceClient) {
        *self.session.write().await = Some(client);
    }

    /// Whether a session is currently active
    pub async fn has_session(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Admin port used when establishing sessions
    pub fn appliance_port(&self) -> u16 {
        self.appliance_port
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
