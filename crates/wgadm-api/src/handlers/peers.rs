//! Peer configuration handlers
//!
//! Each handler forwards exactly one CRUD intent to the appliance (two for
//! create, which chains an address lookup to resolve the new identifier).
//! The appliance owns all state; nothing is cached locally.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use wgadm_core::PeerSummary;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct PeersResponse {
    pub items: Vec<PeerSummary>,
}

#[derive(Serialize)]
pub struct PeerCountResponse {
    pub count: usize,
}

#[derive(Serialize)]
pub struct PeerIdResponse {
    pub id: String,
}

#[derive(Serialize)]
pub struct PeerCreatedResponse {
    pub id: String,
    pub address: String,
}

#[derive(Serialize)]
pub struct PeerConfigurationResponse {
    pub text: String,
}

#[derive(Deserialize)]
pub struct CreatePeerRequest {
    pub name: String,
}

#[derive(Deserialize)]
pub struct LookupQuery {
    pub address: String,
}

/// GET /wireguard/v1/peers
/// List all peer configurations, preserving appliance order
pub async fn list_peers(State(state): State<AppState>) -> Result<Json<PeersResponse>, ApiError> {
    let client = state.session().await?;
    let items = client.list_peers().await?;

    Ok(Json(PeersResponse { items }))
}

/// POST /wireguard/v1/peers
/// Create a peer, then resolve its identifier from the listing
///
/// The appliance's create echo carries no id, so the handler scans the
/// listing for the assigned address and returns the resolved identifier.
pub async fn create_peer(
    State(state): State<AppState>,
    Json(request): Json<CreatePeerRequest>,
) -> Result<Json<PeerCreatedResponse>, ApiError> {
    if request.name.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "peer name must not be empty".to_string(),
        ));
    }

    let client = state.session().await?;
    let created = client.create_peer(&request.name).await?;
    let id = client.find_peer_id(&created.address).await?;

    tracing::info!(name = %request.name, id = %id, "created peer");

    Ok(Json(PeerCreatedResponse {
        id,
        address: created.address,
    }))
}

/// GET /wireguard/v1/peers/count
pub async fn peer_count(
    State(state): State<AppState>,
) -> Result<Json<PeerCountResponse>, ApiError> {
    let client = state.session().await?;
    let count = client.peer_count().await?;

    Ok(Json(PeerCountResponse { count }))
}

/// GET /wireguard/v1/peers/lookup?address=10.8.0.2
/// Resolve a peer identifier from its address
pub async fn lookup_peer(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<PeerIdResponse>, ApiError> {
    let client = state.session().await?;
    let id = client.find_peer_id(&query.address).await?;

    Ok(Json(PeerIdResponse { id }))
}

/// GET /wireguard/v1/peers/{peer_id}/configuration
pub async fn peer_configuration(
    State(state): State<AppState>,
    Path(peer_id): Path<String>,
) -> Result<Json<PeerConfigurationResponse>, ApiError> {
    let client = state.session().await?;
    let text = client.peer_configuration(&peer_id).await?;

    Ok(Json(PeerConfigurationResponse { text }))
}

/// GET /wireguard/v1/peers/{peer_id}/qrcode
/// The SVG bytes from the appliance pass through unmodified
pub async fn peer_qrcode(
    State(state): State<AppState>,
    Path(peer_id): Path<String>,
) -> Result<Response, ApiError> {
    let client = state.session().await?;
    let bytes = client.peer_qrcode(&peer_id).await?;

    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], bytes).into_response())
}

/// POST /wireguard/v1/peers/{peer_id}/enable
pub async fn enable_peer(
    State(state): State<AppState>,
    Path(peer_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let client = state.session().await?;
    client.enable_peer(&peer_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /wireguard/v1/peers/{peer_id}/disable
pub async fn disable_peer(
    State(state): State<AppState>,
    Path(peer_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let client = state.session().await?;
    client.disable_peer(&peer_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /wireguard/v1/peers/{peer_id}
pub async fn delete_peer(
    State(state): State<AppState>,
    Path(peer_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let client = state.session().await?;
    client.delete_peer(&peer_id).await?;

    tracing::info!(id = %peer_id, "deleted peer");

    Ok(StatusCode::NO_CONTENT)
}
