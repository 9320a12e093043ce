//! Core types for the playback engine

use serde::{Deserialize, Serialize};

/// Unique, stable identifier of a playable track.
///
/// Opaque to the engine; the backend uses it to resolve streaming manifests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(pub String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One playable audio asset.
///
/// `duration` may be unknown until the streaming manifest has been parsed;
/// the load path backfills it exactly once and never overwrites a known value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier from the backend
    pub id: TrackId,

    /// Track title or filename
    pub title: String,

    /// Artist name (optional)
    pub artist: Option<String>,

    /// Album name (optional)
    pub album: Option<String>,

    /// Track duration in seconds, if known
    pub duration: Option<f64>,
}

/// Playback state
///
/// Exactly one value at a time. Transitions are driven either by explicit
/// engine calls or by events from the media element, never by both at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Nothing loaded
    Unloaded,

    /// A streaming session is being opened
    Loading,

    /// Loaded and paused
    Paused,

    /// Loaded and playing
    Playing,
}

/// What is loaded right now: the queue key, the position within that queue at
/// the time it was set, and the track itself.
///
/// The index may go stale when the list under `list_key` is later mutated or
/// removed; staleness is resolved at navigation time, not eagerly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentMedia {
    /// Key of the queue the track was taken from
    pub list_key: String,

    /// Position in that queue when playback started
    pub index: usize,

    /// The loaded track
    pub track: Track,
}

/// Navigation direction for next/previous resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Outcome of a `next`/`previous` call.
///
/// Dead ends (queue gone, track vanished) stop playback and report `Stopped`
/// rather than erroring, so callers can tell "stopped at end of queue" apart
/// from a failed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// A different track was loaded
    Advanced,

    /// Navigation resolved to the already-loaded track; restarted in place
    Restarted,

    /// Nothing left to play; the engine unloaded itself
    Stopped,
}

/// Streaming protocol of a deliverable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamProtocol {
    Hls,
    Dash,
    Progressive,
}

/// One encoded rendition of a track that the backend can serve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deliverable {
    /// URL of the streaming manifest for this rendition
    pub manifest_url: String,

    /// Streaming protocol the manifest speaks
    pub protocol: StreamProtocol,

    /// Audio codec identifier (e.g. "mp4a.40.2", "flac")
    pub codec: String,
}

/// Configuration for the playback engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Streaming protocol to select deliverables for (default: HLS)
    pub preferred_protocol: StreamProtocol,

    /// Codec preference order; a deliverable must match one of these.
    /// Empty means any codec is acceptable.
    pub preferred_codecs: Vec<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            preferred_protocol: StreamProtocol::Hls,
            preferred_codecs: vec!["mp4a.40.2".to_string(), "flac".to_string()],
        }
    }
}
