//! Wire types for the Aria Server API.

use serde::{Deserialize, Serialize};

/// Connection configuration for an Aria server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the server (e.g. "https://music.example.com")
    pub url: String,

    /// Bearer token for authenticated endpoints, if any
    pub access_token: Option<String>,
}

impl ServerConfig {
    /// Create a configuration without credentials.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            access_token: None,
        }
    }

    /// Create a configuration with a bearer token.
    pub fn with_token(url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            access_token: Some(access_token.into()),
        }
    }
}

/// Server identification returned by `GET /api/info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Human-readable server name
    pub name: String,

    /// Server version string
    pub version: String,

    /// Feature flags advertised by the server
    #[serde(default)]
    pub features: Vec<String>,
}

/// One deliverable rendition as the server describes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliverableDto {
    /// Manifest URL for this rendition
    pub manifest_url: String,

    /// Protocol identifier ("hls", "dash", "progressive")
    pub protocol: String,

    /// Codec identifier (e.g. "mp4a.40.2")
    pub codec: String,
}

/// Response of `GET /api/tracks/{id}/manifests`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestsResponse {
    pub deliverables: Vec<DeliverableDto>,
}

/// Response of `GET /api/sign/{object}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedUrlResponse {
    /// Time-limited fetchable URL
    pub url: String,

    /// Seconds until the URL expires, if the server reports it
    #[serde(default)]
    pub expires_in_secs: Option<u64>,
}

/// Body of `POST /api/history/plays`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayStartedRequest {
    pub track_id: String,
}
