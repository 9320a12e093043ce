//! Error types for the playback engine

use thiserror::Error;

use crate::types::TrackId;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// A load is already in flight; the call was rejected, not queued
    #[error("A load is already in progress")]
    Busy,

    /// The requested queue is missing or empty
    #[error("No queue to play from")]
    NoQueue,

    /// The requested track is not in its queue and no fallback was given
    #[error("Track not found in queue")]
    TrackNotFound,

    /// Manifest resolution found no deliverable matching the configured
    /// protocol/codec preference
    #[error("No playable deliverable for track {0}")]
    NoDeliverable(TrackId),

    /// Manifest or segment fetch failed before the session became ready
    #[error("Manifest fetch failed: {0}")]
    ManifestFetch(String),

    /// Streaming fault after the session became ready; observational only
    #[error("Streaming error: {0}")]
    Streaming(String),

    /// The platform refused to start playback (e.g. autoplay policy)
    #[error("Playback rejected: {0}")]
    PlaybackRejected(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
