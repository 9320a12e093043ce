//! Streaming loader
//!
//! Opens one adaptive streaming session for a track: resolves deliverables,
//! picks the rendition matching the configured preference, attaches the
//! session with the signed-URL rewriting hook, and waits for it to become
//! ready.
//!
//! The session's error channel has two lifetimes. Until both `MediaAttached`
//! and `ManifestParsed` have arrived, any error fails the open and tears the
//! session down. After that joint condition the open has already resolved;
//! the remaining event stream is handed back to the caller so post-ready
//! faults surface as warnings instead of rejecting a settled load.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::{PlaybackError, Result};
use crate::streaming::{
    AdaptiveStreaming, FragmentSigner, SessionEvent, StreamSession, StreamingApi,
};
use crate::types::{Deliverable, PlayerConfig, Track};

/// A session that reached readiness.
pub struct LoadedStream {
    /// The live session; the caller owns teardown from here on
    pub session: Box<dyn StreamSession>,

    /// Total track duration parsed from the first quality level, in seconds
    pub duration: f64,

    /// The session's remaining event stream (post-ready faults)
    pub late_events: mpsc::UnboundedReceiver<SessionEvent>,
}

/// Opens streaming sessions against the backend API.
pub struct StreamLoader {
    backend: Arc<dyn AdaptiveStreaming>,
    api: Arc<dyn StreamingApi>,
    config: PlayerConfig,
}

/// Adapts the backend API to the narrow signing hook sessions need.
struct ApiSigner {
    api: Arc<dyn StreamingApi>,
}

#[async_trait::async_trait]
impl FragmentSigner for ApiSigner {
    async fn sign_url(&self, object_name: &str) -> Result<String> {
        self.api.sign_url(object_name).await
    }
}

impl StreamLoader {
    pub fn new(
        backend: Arc<dyn AdaptiveStreaming>,
        api: Arc<dyn StreamingApi>,
        config: PlayerConfig,
    ) -> Self {
        Self {
            backend,
            api,
            config,
        }
    }

    /// Open a streaming session for `track` and wait until it is ready.
    ///
    /// Readiness requires both the media-attached and first-level-parsed
    /// events, in either order. Any session error before that point destroys
    /// the session and fails the call.
    pub async fn open(&self, track: &Track) -> Result<LoadedStream> {
        let deliverables = self.api.resolve_manifest(&track.id).await?;
        let deliverable = self
            .select_deliverable(&deliverables)
            .ok_or_else(|| PlaybackError::NoDeliverable(track.id.clone()))?;

        debug!(
            track = %track.id,
            url = %deliverable.manifest_url,
            codec = %deliverable.codec,
            "Opening streaming session"
        );

        let signer: Arc<dyn FragmentSigner> = Arc::new(ApiSigner {
            api: Arc::clone(&self.api),
        });
        let (mut session, mut events) = self
            .backend
            .attach(&deliverable.manifest_url, signer)
            .await?;

        let mut attached = false;
        let mut parsed_duration = None;

        let duration = loop {
            if attached {
                if let Some(duration) = parsed_duration {
                    break duration;
                }
            }

            match events.recv().await {
                Some(SessionEvent::MediaAttached) => attached = true,
                Some(SessionEvent::ManifestParsed { duration }) => {
                    parsed_duration = Some(duration);
                }
                Some(SessionEvent::Error { detail }) => {
                    session.destroy();
                    return Err(PlaybackError::ManifestFetch(detail));
                }
                None => {
                    session.destroy();
                    return Err(PlaybackError::ManifestFetch(
                        "streaming session closed before it became ready".to_string(),
                    ));
                }
            }
        };

        debug!(track = %track.id, duration, "Streaming session ready");

        Ok(LoadedStream {
            session,
            duration,
            late_events: events,
        })
    }

    /// First deliverable matching the preferred protocol and codec order.
    ///
    /// An empty codec preference accepts any codec on the preferred protocol.
    fn select_deliverable<'a>(&self, deliverables: &'a [Deliverable]) -> Option<&'a Deliverable> {
        let on_protocol = || {
            deliverables
                .iter()
                .filter(|d| d.protocol == self.config.preferred_protocol)
        };

        if self.config.preferred_codecs.is_empty() {
            return on_protocol().next();
        }

        self.config
            .preferred_codecs
            .iter()
            .find_map(|codec| on_protocol().find(|d| &d.codec == codec))
    }
}
