//! Test utilities for wgadm-client
//!
//! Provides an ephemeral-port test server harness and an in-process mock of
//! the wg-easy appliance API, used by the client and API integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use tokio::net::TcpListener;

use wgadm_core::{PeerCreated, PeerSummary};

/// Cookie name the mock appliance issues on session creation
pub const MOCK_SESSION_COOKIE: &str = "connect.sid";

/// A test server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Serve an axum Router on an ephemeral local port
    pub async fn start(router: Router) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        // Give the server a moment to start
        tokio::time::sleep(Duration::from_millis(10)).await;

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Get the base URL of the test server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Behavior knobs for the mock appliance
#[derive(Clone)]
pub struct MockApplianceConfig {
    /// Password the session endpoint accepts
    pub password: String,
    /// When false, a successful session response sets no cookie
    pub issue_cookie: bool,
}

impl Default for MockApplianceConfig {
    fn default() -> Self {
        Self {
            password: "secret".to_string(),
            issue_cookie: true,
        }
    }
}

struct MockState {
    config: MockApplianceConfig,
    peers: Mutex<Vec<PeerSummary>>,
    next_host: Mutex<u8>,
}

/// An in-process wg-easy appliance emulator
///
/// Serves the session and peer CRUD endpoints the real appliance exposes,
/// backed by an in-memory peer list. Sessions are cookie-based: the session
/// endpoint sets [`MOCK_SESSION_COOKIE`] and every other endpoint rejects
/// requests that do not present it.
pub struct MockAppliance {
    server: TestServer,
    state: Arc<MockState>,
}

impl MockAppliance {
    /// Start a mock with the default configuration (password "secret")
    pub async fn start() -> Self {
        Self::with_config(MockApplianceConfig::default()).await
    }

    /// Start a mock with custom behavior
    pub async fn with_config(config: MockApplianceConfig) -> Self {
        let state = Arc::new(MockState {
            config,
            peers: Mutex::new(Vec::new()),
            next_host: Mutex::new(2),
        });

        let server = TestServer::start(mock_router(state.clone()))
            .await
            .expect("failed to start mock appliance");

        Self { server, state }
    }

    /// Port the mock is listening on
    pub fn port(&self) -> u16 {
        self.server.addr.port()
    }

    /// Base URL of the mock
    pub fn base_url(&self) -> String {
        self.server.base_url()
    }

    /// Pre-populate the listing
    pub fn seed_peer(&self, peer: PeerSummary) {
        self.state.peers.lock().push(peer);
    }

    /// Snapshot of the current listing
    pub fn peers(&self) -> Vec<PeerSummary> {
        self.state.peers.lock().clone()
    }
}

/// Build a listing entry with the given identity and placeholder metadata
pub fn sample_peer(id: &str, name: &str, address: &str) -> PeerSummary {
    PeerSummary {
        id: id.to_string(),
        name: name.to_string(),
        enabled: true,
        address: address.to_string(),
        public_key: format!("{}-pub==", name),
        created_at: "2024-01-01T00:00:00.000Z".to_string(),
        updated_at: "2024-01-01T00:00:00.000Z".to_string(),
        persistent_keepalive: Some("off".to_string()),
        latest_handshake_at: None,
        transfer_rx: 0,
        transfer_tx: 0,
    }
}

/// The SVG the mock serves for a peer's QR code
pub fn mock_qr_svg(address: &str) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\"><desc>{}</desc></svg>",
        address
    )
}

fn mock_router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/api/session", post(create_session))
        .route("/api/wireguard/client", get(list_clients).post(create_client))
        .route("/api/wireguard/client/{client_id}", post(delete_client))
        .route(
            "/api/wireguard/client/{client_id}/configuration",
            get(client_configuration),
        )
        .route("/api/wireguard/client/{client_id}/enable", post(enable_client))
        .route(
            "/api/wireguard/client/{client_id}/disable",
            post(disable_client),
        )
        .route(
            "/api/wireguard/client/{client_id}/qrcode.svg",
            get(client_qrcode),
        )
        .with_state(state)
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.contains(MOCK_SESSION_COOKIE))
        .unwrap_or(false)
}

#[derive(serde::Deserialize)]
struct SessionRequest {
    password: String,
}

#[derive(serde::Deserialize)]
struct CreateClientRequest {
    name: String,
}

async fn create_session(
    State(state): State<Arc<MockState>>,
    Json(request): Json<SessionRequest>,
) -> Response {
    if request.password != state.config.password {
        return (StatusCode::FORBIDDEN, "Incorrect password").into_response();
    }

    if !state.config.issue_cookie {
        return StatusCode::NO_CONTENT.into_response();
    }

    (
        StatusCode::NO_CONTENT,
        [(
            header::SET_COOKIE,
            format!("{}=mock-session; Path=/; HttpOnly", MOCK_SESSION_COOKIE),
        )],
    )
        .into_response()
}

async fn list_clients(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "Not logged in").into_response();
    }

    Json(state.peers.lock().clone()).into_response()
}

async fn create_client(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(request): Json<CreateClientRequest>,
) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "Not logged in").into_response();
    }

    let host = {
        let mut next_host = state.next_host.lock();
        let host = *next_host;
        *next_host += 1;
        host
    };

    let address = format!("10.8.0.{}", host);
    let now = "2024-01-01T00:00:00.000Z".to_string();

    state.peers.lock().push(PeerSummary {
        id: format!("mock-peer-{}", host),
        name: request.name.clone(),
        enabled: true,
        address: address.clone(),
        public_key: format!("{}-pub==", request.name),
        created_at: now.clone(),
        updated_at: now.clone(),
        persistent_keepalive: Some("off".to_string()),
        latest_handshake_at: None,
        transfer_rx: 0,
        transfer_tx: 0,
    });

    // The real appliance echoes the created peer without its identifier
    Json(PeerCreated {
        name: request.name.clone(),
        address,
        private_key: format!("{}-priv==", request.name),
        public_key: format!("{}-pub==", request.name),
        pre_shared_key: format!("{}-psk==", request.name),
        created_at: now.clone(),
        updated_at: now,
        enabled: true,
    })
    .into_response()
}

async fn client_configuration(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(client_id): Path<String>,
) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "Not logged in").into_response();
    }

    let peers = state.peers.lock();
    match peers.iter().find(|peer| peer.id == client_id) {
        Some(peer) => format!(
            "[Interface]\nPrivateKey = {}-priv==\nAddress = {}/24\n",
            peer.name, peer.address
        )
        .into_response(),
        None => (StatusCode::NOT_FOUND, "Client not found").into_response(),
    }
}

async fn enable_client(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(client_id): Path<String>,
) -> Response {
    set_enabled(&state, &headers, &client_id, true)
}

async fn disable_client(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(client_id): Path<String>,
) -> Response {
    set_enabled(&state, &headers, &client_id, false)
}

fn set_enabled(state: &MockState, headers: &HeaderMap, client_id: &str, enabled: bool) -> Response {
    if !authorized(headers) {
        return (StatusCode::UNAUTHORIZED, "Not logged in").into_response();
    }

    let mut peers = state.peers.lock();
    match peers.iter_mut().find(|peer| peer.id == client_id) {
        Some(peer) => {
            peer.enabled = enabled;
            StatusCode::NO_CONTENT.into_response()
        }
        None => (StatusCode::NOT_FOUND, "Client not found").into_response(),
    }
}

async fn delete_client(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(client_id): Path<String>,
) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "Not logged in").into_response();
    }

    let mut peers = state.peers.lock();
    let before = peers.len();
    peers.retain(|peer| peer.id != client_id);

    if peers.len() == before {
        (StatusCode::NOT_FOUND, "Client not found").into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}

async fn client_qrcode(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(client_id): Path<String>,
) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "Not logged in").into_response();
    }

    let peers = state.peers.lock();
    match peers.iter().find(|peer| peer.id == client_id) {
        Some(peer) => (
            [(header::CONTENT_TYPE, "image/svg+xml")],
            mock_qr_svg(&peer.address),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "Client not found").into_response(),
    }
}
