//! Main Aria server client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use aria_playback::types::{Deliverable, StreamProtocol, TrackId};
use aria_playback::{PlaybackError, StreamingApi};

use crate::error::{Result, ServerClientError};
use crate::types::{
    DeliverableDto, ManifestsResponse, PlayStartedRequest, ServerConfig, ServerInfo,
    SignedUrlResponse,
};

/// Client for the Aria Server API.
///
/// Implements the playback engine's [`StreamingApi`] contract over HTTP:
/// manifest resolution, signed fragment URLs, and listening-history writes.
///
/// # Example
///
/// ```ignore
/// use aria_server_client::{AriaServerClient, ServerConfig};
///
/// let config = ServerConfig::new("https://music.example.com");
/// let client = AriaServerClient::new(config)?;
///
/// let info = client.test_connection().await?;
/// println!("Connected to {} v{}", info.name, info.version);
/// ```
#[derive(Debug)]
pub struct AriaServerClient {
    http: Client,
    config: Arc<RwLock<ServerConfig>>,
}

impl AriaServerClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(ServerClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = config.url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ServerClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let normalized_config = ServerConfig {
            url,
            access_token: config.access_token,
        };

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Aria/{} (Client)", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ServerClientError::Request)?;

        Ok(Self {
            http,
            config: Arc::new(RwLock::new(normalized_config)),
        })
    }

    /// Get the server URL.
    pub async fn url(&self) -> String {
        self.config.read().await.url.clone()
    }

    /// Set or replace the bearer token.
    pub async fn set_token(&self, access_token: Option<String>) {
        self.config.write().await.access_token = access_token;
    }

    /// Test the connection to the server.
    ///
    /// This does not require authentication.
    pub async fn test_connection(&self) -> Result<ServerInfo> {
        let url = format!("{}/api/info", self.url().await);

        debug!(url = %url, "Testing server connection");

        let response = self.http.get(&url).send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ServerClientError::ServerUnreachable(e.to_string())
            } else {
                ServerClientError::Request(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServerClientError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let server_info: ServerInfo = response.json().await.map_err(|e| {
            ServerClientError::ParseError(format!("Failed to parse server info: {}", e))
        })?;

        info!(
            name = %server_info.name,
            version = %server_info.version,
            "Connected to server"
        );

        Ok(server_info)
    }

    /// Fetch the deliverable renditions available for a track.
    pub async fn get_manifests(&self, track_id: &str) -> Result<Vec<DeliverableDto>> {
        let url = format!("{}/api/tracks/{}/manifests", self.url().await, track_id);
        debug!(track_id, "Resolving manifests");

        let request = self.authorize(self.http.get(&url)).await;
        let response: ManifestsResponse = Self::read_json(request.send().await?).await?;
        Ok(response.deliverables)
    }

    /// Exchange a relative object path for a time-limited signed URL.
    pub async fn sign_object(&self, object_name: &str) -> Result<String> {
        let url = format!("{}/api/sign", self.url().await);

        let request = self
            .authorize(self.http.get(&url).query(&[("object", object_name)]))
            .await;
        let response: SignedUrlResponse = Self::read_json(request.send().await?).await?;
        Ok(response.url)
    }

    /// Record that playback of a track started.
    pub async fn post_play_started(&self, track_id: &str) -> Result<()> {
        let url = format!("{}/api/history/plays", self.url().await);

        let request = self.authorize(self.http.post(&url)).await.json(
            &PlayStartedRequest {
                track_id: track_id.to_string(),
            },
        );
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServerClientError::ServerError {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.read().await.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServerClientError::ServerError {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json()
            .await
            .map_err(|e| ServerClientError::ParseError(e.to_string()))
    }
}

impl DeliverableDto {
    /// Convert to the engine's deliverable type.
    ///
    /// Returns `None` for protocols this client does not speak.
    fn into_deliverable(self) -> Option<Deliverable> {
        let protocol = match self.protocol.to_ascii_lowercase().as_str() {
            "hls" => StreamProtocol::Hls,
            "dash" => StreamProtocol::Dash,
            "progressive" => StreamProtocol::Progressive,
            other => {
                warn!(protocol = other, "Skipping deliverable with unknown protocol");
                return None;
            }
        };
        Some(Deliverable {
            manifest_url: self.manifest_url,
            protocol,
            codec: self.codec,
        })
    }
}

#[async_trait]
impl StreamingApi for AriaServerClient {
    async fn resolve_manifest(
        &self,
        track: &TrackId,
    ) -> aria_playback::Result<Vec<Deliverable>> {
        let deliverables = self
            .get_manifests(track.as_str())
            .await
            .map_err(|e| PlaybackError::ManifestFetch(e.to_string()))?;

        Ok(deliverables
            .into_iter()
            .filter_map(DeliverableDto::into_deliverable)
            .collect())
    }

    async fn sign_url(&self, object_name: &str) -> aria_playback::Result<String> {
        self.sign_object(object_name)
            .await
            .map_err(|e| PlaybackError::ManifestFetch(e.to_string()))
    }

    async fn notify_play_started(&self, track: &TrackId) -> aria_playback::Result<()> {
        self.post_play_started(track.as_str())
            .await
            .map_err(|e| PlaybackError::Streaming(e.to_string()))
    }
}
