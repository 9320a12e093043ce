//! Tests for the Aria server client.
//!
//! These use a mock server to verify client behavior without requiring a
//! real server connection.

use aria_playback::types::{StreamProtocol, TrackId};
use aria_playback::StreamingApi;
use aria_server_client::{AriaServerClient, ServerClientError, ServerConfig};
use wiremock::matchers::{body_json_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Client Creation Tests
// =============================================================================

mod client_creation {
    use super::*;

    #[test]
    fn valid_https_url() {
        let config = ServerConfig::new("https://example.com");
        assert!(AriaServerClient::new(config).is_ok());
    }

    #[test]
    fn valid_http_url() {
        let config = ServerConfig::new("http://localhost:8080");
        assert!(AriaServerClient::new(config).is_ok());
    }

    #[test]
    fn empty_url_rejected() {
        let result = AriaServerClient::new(ServerConfig::new(""));
        match result.unwrap_err() {
            ServerClientError::InvalidUrl(msg) => assert!(msg.contains("empty")),
            _ => panic!("Expected InvalidUrl error"),
        }
    }

    #[test]
    fn url_without_scheme_rejected() {
        let result = AriaServerClient::new(ServerConfig::new("example.com"));
        match result.unwrap_err() {
            ServerClientError::InvalidUrl(msg) => {
                assert!(msg.contains("http://") || msg.contains("https://"));
            }
            _ => panic!("Expected InvalidUrl error"),
        }
    }

    #[tokio::test]
    async fn url_normalization_trailing_slash() {
        let client = AriaServerClient::new(ServerConfig::new("https://example.com///")).unwrap();
        assert_eq!(client.url().await, "https://example.com");
    }
}

// =============================================================================
// Connection Tests
// =============================================================================

mod connection {
    use super::*;

    #[tokio::test]
    async fn successful_connection() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Aria Server",
                "version": "1.0.0",
                "features": ["streaming", "history"]
            })))
            .mount(&mock_server)
            .await;

        let client = AriaServerClient::new(ServerConfig::new(mock_server.uri())).unwrap();
        let info = client.test_connection().await.unwrap();

        assert_eq!(info.name, "Aria Server");
        assert_eq!(info.version, "1.0.0");
        assert_eq!(info.features.len(), 2);
    }

    #[tokio::test]
    async fn server_error_is_reported_with_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/info"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&mock_server)
            .await;

        let client = AriaServerClient::new(ServerConfig::new(mock_server.uri())).unwrap();
        match client.test_connection().await.unwrap_err() {
            ServerClientError::ServerError { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            e => panic!("Expected ServerError, got: {:?}", e),
        }
    }
}

// =============================================================================
// Manifest Resolution Tests
// =============================================================================

mod manifests {
    use super::*;

    #[tokio::test]
    async fn fetches_and_parses_deliverables() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/tracks/t-1/manifests"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "deliverables": [
                    {
                        "manifest_url": "https://cdn.example.com/t-1/master.m3u8",
                        "protocol": "hls",
                        "codec": "mp4a.40.2"
                    },
                    {
                        "manifest_url": "https://cdn.example.com/t-1/master.mpd",
                        "protocol": "dash",
                        "codec": "opus"
                    }
                ]
            })))
            .mount(&mock_server)
            .await;

        let client = AriaServerClient::new(ServerConfig::new(mock_server.uri())).unwrap();
        let deliverables = client.get_manifests("t-1").await.unwrap();

        assert_eq!(deliverables.len(), 2);
        assert_eq!(deliverables[0].protocol, "hls");
        assert_eq!(deliverables[1].codec, "opus");
    }

    #[tokio::test]
    async fn streaming_api_impl_skips_unknown_protocols() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/tracks/t-1/manifests"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "deliverables": [
                    {
                        "manifest_url": "https://cdn.example.com/t-1/master.m3u8",
                        "protocol": "HLS",
                        "codec": "flac"
                    },
                    {
                        "manifest_url": "https://cdn.example.com/t-1/stream",
                        "protocol": "smooth-streaming",
                        "codec": "wma"
                    }
                ]
            })))
            .mount(&mock_server)
            .await;

        let client = AriaServerClient::new(ServerConfig::new(mock_server.uri())).unwrap();
        let deliverables = client.resolve_manifest(&TrackId::new("t-1")).await.unwrap();

        assert_eq!(deliverables.len(), 1);
        assert_eq!(deliverables[0].protocol, StreamProtocol::Hls);
    }

    #[tokio::test]
    async fn missing_track_maps_to_manifest_fetch_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/tracks/gone/manifests"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such track"))
            .mount(&mock_server)
            .await;

        let client = AriaServerClient::new(ServerConfig::new(mock_server.uri())).unwrap();
        let result = client.resolve_manifest(&TrackId::new("gone")).await;

        assert!(matches!(
            result,
            Err(aria_playback::PlaybackError::ManifestFetch(_))
        ));
    }

    #[tokio::test]
    async fn sends_bearer_token_when_configured() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/tracks/t-1/manifests"))
            .and(header("authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "deliverables": []
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = AriaServerClient::new(ServerConfig::with_token(
            mock_server.uri(),
            "secret-token",
        ))
        .unwrap();
        client.get_manifests("t-1").await.unwrap();
    }
}

// =============================================================================
// Signed URL Tests
// =============================================================================

mod signing {
    use super::*;

    #[tokio::test]
    async fn exchanges_object_path_for_signed_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/sign"))
            .and(query_param("object", "fragments/t-1/0.m4s"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "url": "https://cdn.example.com/fragments/t-1/0.m4s?sig=xyz",
                "expires_in_secs": 300
            })))
            .mount(&mock_server)
            .await;

        let client = AriaServerClient::new(ServerConfig::new(mock_server.uri())).unwrap();
        let url = client.sign_object("fragments/t-1/0.m4s").await.unwrap();
        assert!(url.contains("sig=xyz"));
    }

    #[tokio::test]
    async fn signing_failure_maps_to_manifest_fetch_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/sign"))
            .respond_with(ResponseTemplate::new(403).set_body_string("expired session"))
            .mount(&mock_server)
            .await;

        let client = AriaServerClient::new(ServerConfig::new(mock_server.uri())).unwrap();
        let result = StreamingApi::sign_url(&client, "fragments/t-1/0.m4s").await;

        assert!(matches!(
            result,
            Err(aria_playback::PlaybackError::ManifestFetch(_))
        ));
    }
}

// =============================================================================
// Listening History Tests
// =============================================================================

mod history {
    use super::*;

    #[tokio::test]
    async fn posts_play_started() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/history/plays"))
            .and(body_json_string(r#"{"track_id":"t-1"}"#))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = AriaServerClient::new(ServerConfig::new(mock_server.uri())).unwrap();
        client
            .notify_play_started(&TrackId::new("t-1"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn history_failure_maps_to_streaming_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/history/plays"))
            .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
            .mount(&mock_server)
            .await;

        let client = AriaServerClient::new(ServerConfig::new(mock_server.uri())).unwrap();
        let result = client.notify_play_started(&TrackId::new("t-1")).await;

        assert!(matches!(
            result,
            Err(aria_playback::PlaybackError::Streaming(_))
        ));
    }
}
