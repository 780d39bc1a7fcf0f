//! Integration tests for the admin gateway API
//!
//! Full stack: a plain HTTP client drives the gateway router, which holds
//! the appliance session and forwards every operation to the in-process
//! mock appliance.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wgadm_api::{create_router, AppState};
use wgadm_client::testing::{mock_qr_svg, sample_peer, MockAppliance, TestServer};

struct Gateway {
    mock: MockAppliance,
    server: TestServer,
    http: reqwest::Client,
}

impl Gateway {
    async fn start() -> Self {
        let mock = MockAppliance::start().await;
        let state = AppState::with_appliance_port(mock.port());
        let server = TestServer::start(create_router(state))
            .await
            .expect("failed to start gateway");

        Self {
            mock,
            server,
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.server.base_url(), path)
    }

    async fn connect(&self) {
        let response = self
            .http
            .post(self.url("/wireguard/v1/session"))
            .json(&json!({"address": "127.0.0.1", "password": "secret"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 204);
    }
}

// =============================================================================
// Health / Session Tests
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let gateway = Gateway::start().await;

    let response = gateway.http.get(gateway.url("/health")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_operations_before_connect_are_unauthorized() {
    let gateway = Gateway::start().await;

    for path in [
        "/wireguard/v1/peers",
        "/wireguard/v1/peers/count",
        "/wireguard/v1/peers/abc/configuration",
        "/wireguard/v1/peers/abc/qrcode",
    ] {
        let response = gateway.http.get(gateway.url(path)).send().await.unwrap();
        assert_eq!(response.status().as_u16(), 401, "GET {}", path);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "unauthorized");
    }

    let response = gateway
        .http
        .post(gateway.url("/wireguard/v1/peers/abc/enable"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn test_session_predicate_tracks_connect() {
    let gateway = Gateway::start().await;

    let before: Value = gateway
        .http
        .get(gateway.url("/wireguard/v1/session"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(before["connected"], false);

    gateway.connect().await;

    let after: Value = gateway
        .http
        .get(gateway.url("/wireguard/v1/session"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(after["connected"], true);
}

#[tokio::test]
async fn test_failed_connect_leaves_service_unauthenticated() {
    let gateway = Gateway::start().await;

    let response = gateway
        .http
        .post(gateway.url("/wireguard/v1/session"))
        .json(&json!({"address": "127.0.0.1", "password": "wrong"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 502);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "bad_gateway");

    // A later call still fails with the session-absent class
    let response = gateway
        .http
        .get(gateway.url("/wireguard/v1/peers"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn test_connect_replaces_existing_session() {
    let gateway = Gateway::start().await;

    gateway.connect().await;
    gateway.connect().await;

    let response = gateway
        .http
        .get(gateway.url("/wireguard/v1/peers"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
}

// =============================================================================
// Listing / Count / Lookup Tests
// =============================================================================

#[tokio::test]
async fn test_connect_then_count_over_seeded_listing() {
    let gateway = Gateway::start().await;
    gateway.mock.seed_peer(sample_peer("id-1", "laptop", "10.8.0.2"));
    gateway.mock.seed_peer(sample_peer("id-2", "phone", "10.8.0.3"));
    gateway.mock.seed_peer(sample_peer("id-3", "tablet", "10.8.0.4"));

    gateway.connect().await;

    let body: Value = gateway
        .http
        .get(gateway.url("/wireguard/v1/peers/count"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["count"], 3);
}

#[tokio::test]
async fn test_count_of_empty_listing_is_zero() {
    let gateway = Gateway::start().await;
    gateway.connect().await;

    let body: Value = gateway
        .http
        .get(gateway.url("/wireguard/v1/peers/count"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_listing_preserves_every_upstream_field() {
    let gateway = Gateway::start().await;
    let mut peer = sample_peer("id-1", "laptop", "10.8.0.2");
    peer.enabled = false;
    peer.persistent_keepalive = Some("25".to_string());
    peer.latest_handshake_at = Some("2024-02-01T10:00:00.000Z".to_string());
    peer.transfer_rx = 4096;
    peer.transfer_tx = 8192;
    gateway.mock.seed_peer(peer.clone());

    gateway.connect().await;

    let body: Value = gateway
        .http
        .get(gateway.url("/wireguard/v1/peers"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0], serde_json::to_value(&peer).unwrap());
}

#[tokio::test]
async fn test_lookup_resolves_id_by_address() {
    let gateway = Gateway::start().await;
    gateway.mock.seed_peer(sample_peer("id-1", "laptop", "10.8.0.2"));
    gateway.mock.seed_peer(sample_peer("id-2", "phone", "10.8.0.3"));

    gateway.connect().await;

    let body: Value = gateway
        .http
        .get(gateway.url("/wireguard/v1/peers/lookup?address=10.8.0.3"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["id"], "id-2");
}

#[tokio::test]
async fn test_lookup_unknown_address_is_not_found() {
    let gateway = Gateway::start().await;
    gateway.connect().await;

    let response = gateway
        .http
        .get(gateway.url("/wireguard/v1/peers/lookup?address=10.8.0.99"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}

// =============================================================================
// Create Tests
// =============================================================================

#[tokio::test]
async fn test_create_peer_returns_resolved_id() {
    let gateway = Gateway::start().await;
    gateway.connect().await;

    let response = gateway
        .http
        .post(gateway.url("/wireguard/v1/peers"))
        .json(&json!({"name": "laptop"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["address"], "10.8.0.2");

    // The identifier is resolved from the listing, not left empty
    let listed = gateway.mock.peers();
    assert_eq!(body["id"], listed[0].id.as_str());
    assert_ne!(body["id"], "");
}

#[tokio::test]
async fn test_create_peer_rejects_blank_name() {
    let gateway = Gateway::start().await;
    gateway.connect().await;

    let response = gateway
        .http
        .post(gateway.url("/wireguard/v1/peers"))
        .json(&json!({"name": "  "}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

// =============================================================================
// Configuration / QR Tests
// =============================================================================

#[tokio::test]
async fn test_peer_configuration_text() {
    let gateway = Gateway::start().await;
    gateway.mock.seed_peer(sample_peer("id-1", "laptop", "10.8.0.2"));
    gateway.connect().await;

    let body: Value = gateway
        .http
        .get(gateway.url("/wireguard/v1/peers/id-1/configuration"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let text = body["text"].as_str().unwrap();
    assert!(text.contains("10.8.0.2/24"));
}

#[tokio::test]
async fn test_qrcode_passes_through_byte_for_byte() {
    let gateway = Gateway::start().await;
    gateway.mock.seed_peer(sample_peer("id-1", "laptop", "10.8.0.2"));
    gateway.connect().await;

    let response = gateway
        .http
        .get(gateway.url("/wireguard/v1/peers/id-1/qrcode"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("image/svg+xml")
    );

    let bytes = response.bytes().await.unwrap();
    assert_eq!(bytes.as_ref(), mock_qr_svg("10.8.0.2").as_bytes());
}

// =============================================================================
// Enable / Disable / Delete Tests
// =============================================================================

#[tokio::test]
async fn test_enable_disable_peer() {
    let gateway = Gateway::start().await;
    gateway.mock.seed_peer(sample_peer("id-1", "laptop", "10.8.0.2"));
    gateway.connect().await;

    let response = gateway
        .http
        .post(gateway.url("/wireguard/v1/peers/id-1/disable"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);
    assert!(!gateway.mock.peers()[0].enabled);

    let response = gateway
        .http
        .post(gateway.url("/wireguard/v1/peers/id-1/enable"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);
    assert!(gateway.mock.peers()[0].enabled);
}

#[tokio::test]
async fn test_delete_peer() {
    let gateway = Gateway::start().await;
    gateway.mock.seed_peer(sample_peer("id-1", "laptop", "10.8.0.2"));
    gateway.connect().await;

    let response = gateway
        .http
        .delete(gateway.url("/wireguard/v1/peers/id-1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);
    assert!(gateway.mock.peers().is_empty());
}

#[tokio::test]
async fn test_delete_unknown_peer_maps_upstream_status() {
    let gateway = Gateway::start().await;
    gateway.connect().await;

    let response = gateway
        .http
        .delete(gateway.url("/wireguard/v1/peers/missing"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 502);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "bad_gateway");
}
