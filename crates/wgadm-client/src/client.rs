//! Appliance HTTP client implementation

use std::time::Duration;

use bytes::Bytes;
use reqwest::{header, Client, Response};
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use wgadm_core::{ApplianceError, ApplianceResult, PeerCreated, PeerSummary};

/// Fixed admin port the appliance serves its HTTP API on
pub const ADMIN_PORT: u16 = 51821;

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct SessionRequest<'a> {
    password: &'a str,
}

#[derive(Serialize)]
struct CreatePeerRequest<'a> {
    name: &'a str,
}

/// Session-authenticated client for the wg-easy appliance API
///
/// Construction and authentication are one step: [`ApplianceClient::connect`]
/// issues the session request and only returns a client once the appliance
/// has accepted the password and set a session cookie. Cloning is cheap and
/// shares the cookie store.
#[derive(Debug, Clone)]
pub struct ApplianceClient {
    client: Client,
    base_url: Url,
}

impl ApplianceClient {
    /// Establish a session against the appliance at `address`
    ///
    /// Targets the fixed admin port ([`ADMIN_PORT`]). A single attempt is
    /// made; nothing is retried.
    pub async fn connect(address: &str, password: &str) -> ApplianceResult<Self> {
        Self::connect_with_port(address, ADMIN_PORT, password).await
    }

    /// Establish a session against an appliance on a non-standard port
    pub async fn connect_with_port(
        address: &str,
        port: u16,
        password: &str,
    ) -> ApplianceResult<Self> {
        Self::connect_base_url(
            &format!("http://{}:{}", address, port),
            password,
            DEFAULT_TIMEOUT,
            DEFAULT_CONNECT_TIMEOUT,
        )
        .await
    }

    /// Establish a session with a full base URL and custom timeouts
    #[instrument(skip(password, timeout, connect_timeout))]
    pub async fn connect_base_url(
        base_url: &str,
        password: &str,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> ApplianceResult<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(http_error)?;

        let base_url = Url::parse(base_url).map_err(url_error)?;
        let url = base_url.join("api/session").map_err(url_error)?;

        let response = client
            .post(url)
            .json(&SessionRequest { password })
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApplianceError::upstream(status.as_u16(), body));
        }

        // The session lives in the cookie store; a success response that
        // sets no cookie leaves every later call unauthenticated.
        if response.cookies().next().is_none() {
            return Err(ApplianceError::Unauthenticated(
                "appliance did not set a session cookie".to_string(),
            ));
        }

        debug!(%base_url, "appliance session established");

        Ok(Self { client, base_url })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // =========================================================================
    // Peer Operations
    // =========================================================================

    /// List all peer configurations, in appliance order
    #[instrument(skip(self))]
    pub async fn list_peers(&self) -> ApplianceResult<Vec<PeerSummary>> {
        let response = self.get_raw("api/wireguard/client").await?;
        decode_json(response).await
    }

    /// Create a new peer configuration
    ///
    /// The echo carries the private key but no identifier; use
    /// [`find_peer_id`](Self::find_peer_id) with the assigned address to
    /// resolve it.
    #[instrument(skip(self))]
    pub async fn create_peer(&self, name: &str) -> ApplianceResult<PeerCreated> {
        let response = self
            .post_json("api/wireguard/client", &CreatePeerRequest { name })
            .await?;
        decode_json(response).await
    }

    /// Fetch the rendered configuration text for a peer
    #[instrument(skip(self))]
    pub async fn peer_configuration(&self, peer_id: &str) -> ApplianceResult<String> {
        let response = self
            .get_raw(&format!("api/wireguard/client/{}/configuration", peer_id))
            .await?;
        response.text().await.map_err(http_error)
    }

    /// Enable a peer configuration
    #[instrument(skip(self))]
    pub async fn enable_peer(&self, peer_id: &str) -> ApplianceResult<()> {
        self.post_raw(&format!("api/wireguard/client/{}/enable", peer_id))
            .await
            .map(|_| ())
    }

    /// Disable a peer configuration
    #[instrument(skip(self))]
    pub async fn disable_peer(&self, peer_id: &str) -> ApplianceResult<()> {
        self.post_raw(&format!("api/wireguard/client/{}/disable", peer_id))
            .await
            .map(|_| ())
    }

    /// Delete a peer configuration
    ///
    /// The appliance accepts the deletion as a POST to the id-scoped path.
    /// Idempotency is the appliance's concern, not this layer's.
    #[instrument(skip(self))]
    pub async fn delete_peer(&self, peer_id: &str) -> ApplianceResult<()> {
        self.post_raw(&format!("api/wireguard/client/{}", peer_id))
            .await
            .map(|_| ())
    }

    /// Fetch the QR code (SVG) for a peer, byte-for-byte as served
    #[instrument(skip(self))]
    pub async fn peer_qrcode(&self, peer_id: &str) -> ApplianceResult<Bytes> {
        let response = self
            .get_raw(&format!("api/wireguard/client/{}/qrcode.svg", peer_id))
            .await?;
        response.bytes().await.map_err(http_error)
    }

    /// Resolve a peer identifier from its address
    ///
    /// The appliance offers no lookup-by-address, so this fetches the full
    /// listing and scans for the first matching entry.
    #[instrument(skip(self))]
    pub async fn find_peer_id(&self, address: &str) -> ApplianceResult<String> {
        let peers = self.list_peers().await?;
        peers
            .into_iter()
            .find(|peer| peer.address == address)
            .map(|peer| peer.id)
            .ok_or_else(|| ApplianceError::NotFound(format!("no peer with address {}", address)))
    }

    /// Count the peer configurations on the appliance
    #[instrument(skip(self))]
    pub async fn peer_count(&self) -> ApplianceResult<usize> {
        Ok(self.list_peers().await?.len())
    }

    // =========================================================================
    // Request Helpers
    // =========================================================================

    /// Issue a GET against the session base URL
    async fn get_raw(&self, path: &str) -> ApplianceResult<Response> {
        let url = self.base_url.join(path).map_err(url_error)?;
        let response = self.client.get(url).send().await.map_err(http_error)?;
        check_status(response).await
    }

    /// Issue a bodyless POST against the session base URL
    async fn post_raw(&self, path: &str) -> ApplianceResult<Response> {
        let url = self.base_url.join(path).map_err(url_error)?;
        let response = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(http_error)?;
        check_status(response).await
    }

    /// Issue a JSON POST against the session base URL
    async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> ApplianceResult<Response> {
        let url = self.base_url.join(path).map_err(url_error)?;
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(http_error)?;
        check_status(response).await
    }
}

/// Map any non-success status to an error carrying the response body
async fn check_status(response: Response) -> ApplianceResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ApplianceError::upstream(status.as_u16(), body))
    }
}

/// Decode a JSON response body
async fn decode_json<T: serde::de::DeserializeOwned>(response: Response) -> ApplianceResult<T> {
    response
        .json()
        .await
        .map_err(|e| ApplianceError::Serialization(e.to_string()))
}

fn http_error(err: reqwest::Error) -> ApplianceError {
    if err.is_timeout() {
        ApplianceError::Timeout
    } else if err.is_decode() {
        ApplianceError::Serialization(err.to_string())
    } else {
        ApplianceError::Transport(err.to_string())
    }
}

fn url_error(err: url::ParseError) -> ApplianceError {
    ApplianceError::Transport(format!("invalid url: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_join() {
        let base = Url::parse("http://10.0.0.5:51821").unwrap();
        let url = base.join("api/wireguard/client").unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.5:51821/api/wireguard/client");
    }

    #[test]
    fn test_id_scoped_paths() {
        let base = Url::parse("http://10.0.0.5:51821").unwrap();
        let url = base
            .join(&format!("api/wireguard/client/{}/qrcode.svg", "abc"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://10.0.0.5:51821/api/wireguard/client/abc/qrcode.svg"
        );
    }

    #[tokio::test]
    async fn test_connect_invalid_base_url() {
        let result = ApplianceClient::connect_base_url(
            "not a url",
            "secret",
            DEFAULT_TIMEOUT,
            DEFAULT_CONNECT_TIMEOUT,
        )
        .await;
        assert!(matches!(result, Err(ApplianceError::Transport(_))));
    }
}
