//! Streaming capability traits
//!
//! Seams between the engine and its collaborators: the adaptive-streaming
//! implementation that feeds the media element, and the backend API that
//! resolves manifests, signs fragment URLs, and records listening history.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::types::{Deliverable, TrackId};

/// Backend API contracts consumed by the engine.
///
/// Implementations live outside this crate (see `aria-server-client`).
#[async_trait]
pub trait StreamingApi: Send + Sync {
    /// Resolve the deliverable renditions available for a track
    async fn resolve_manifest(&self, track: &TrackId) -> Result<Vec<Deliverable>>;

    /// Exchange a relative object path for a time-limited fetchable URL
    async fn sign_url(&self, object_name: &str) -> Result<String>;

    /// Best-effort listening-history write; failures are never fatal
    async fn notify_play_started(&self, track: &TrackId) -> Result<()>;
}

/// Per-fragment URL rewriting hook handed to the streaming session.
///
/// Narrower than [`StreamingApi`] so session implementations only see the one
/// capability they need.
#[async_trait]
pub trait FragmentSigner: Send + Sync {
    /// Exchange a relative fragment path for a signed URL before fetching
    async fn sign_url(&self, object_name: &str) -> Result<String>;
}

/// Events reported by a streaming session.
///
/// Before the session is ready these drive [`crate::StreamLoader::open`];
/// after readiness the remaining stream carries post-ready faults only.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The decoding pipeline is attached to the media element
    MediaAttached,

    /// The first quality level's metadata has been parsed
    ManifestParsed {
        /// Total duration of the track in seconds
        duration: f64,
    },

    /// A streaming fault. Fatal before readiness, a warning after.
    Error {
        /// Description of the fault
        detail: String,
    },
}

/// A live adaptive-streaming session bound to the media element.
///
/// At most one exists at a time; `destroy` must be idempotent.
pub trait StreamSession: Send {
    /// Tear the session down and detach from the element
    fn destroy(&mut self);
}

/// A freshly attached session together with its event stream.
pub type AttachedSession = (Box<dyn StreamSession>, mpsc::UnboundedReceiver<SessionEvent>);

/// Adaptive-streaming implementation (HLS or similar).
#[async_trait]
pub trait AdaptiveStreaming: Send + Sync {
    /// Open a session for `manifest_url` bound to the application's media
    /// element, rewriting every relative fragment request through `signer`
    /// before the underlying fetch.
    ///
    /// Signing failures must surface as
    /// [`crate::PlaybackError::ManifestFetch`], never as a silent retry.
    async fn attach(
        &self,
        manifest_url: &str,
        signer: std::sync::Arc<dyn FragmentSigner>,
    ) -> Result<AttachedSession>;
}
