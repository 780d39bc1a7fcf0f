//! wgadm-api - RPC surface for the WireGuard appliance admin gateway
//!
//! This crate provides the HTTP/JSON layer that forwards peer CRUD intents
//! to the appliance through `wgadm-client`. It owns the single process-wide
//! session: Connect establishes or replaces it, every other operation reads
//! it.
//!
//! # Usage
//!
//! ```ignore
//! use wgadm_api::{create_router, AppState};
//!
//! let state = AppState::new();
//! let router = create_router(state);
//! ```

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the admin gateway router with the given application state
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Session routes
        .route(
            "/wireguard/v1/session",
            post(handlers::session::connect).get(handlers::session::session_status),
        )
        // Peer routes
        .route(
            "/wireguard/v1/peers",
            get(handlers::peers::list_peers).post(handlers::peers::create_peer),
        )
        .route("/wireguard/v1/peers/count", get(handlers::peers::peer_count))
        .route(
            "/wireguard/v1/peers/lookup",
            get(handlers::peers::lookup_peer),
        )
        .route(
            "/wireguard/v1/peers/{peer_id}",
            delete(handlers::peers::delete_peer),
        )
        .route(
            "/wireguard/v1/peers/{peer_id}/configuration",
            get(handlers::peers::peer_configuration),
        )
        .route(
            "/wireguard/v1/peers/{peer_id}/qrcode",
            get(handlers::peers::peer_qrcode),
        )
        .route(
            "/wireguard/v1/peers/{peer_id}/enable",
            post(handlers::peers::enable_peer),
        )
        .route(
            "/wireguard/v1/peers/{peer_id}/disable",
            post(handlers::peers::disable_peer),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
