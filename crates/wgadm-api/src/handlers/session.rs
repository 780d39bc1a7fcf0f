//! Appliance session handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use wgadm_client::ApplianceClient;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ConnectRequest {
    pub address: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct SessionStatusResponse {
    pub connected: bool,
}

/// POST /wireguard/v1/session
/// Establish the appliance session, replacing any existing one
///
/// A failed attempt leaves the previous session state untouched.
pub async fn connect(
    State(state): State<AppState>,
    Json(request): Json<ConnectRequest>,
) -> Result<StatusCode, ApiError> {
    let client = ApplianceClient::connect_with_port(
        &request.address,
        state.appliance_port(),
        &request.password,
    )
    .await?;

    state.replace_session(client).await;
    tracing::info!(address = %request.address, "connected to appliance");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /wireguard/v1/session
/// Report whether an appliance session is active
pub async fn session_status(State(state): State<AppState>) -> Json<SessionStatusResponse> {
    Json(SessionStatusResponse {
        connected: state.has_session().await,
    })
}
