//! Playback events
//!
//! Event-based communication for UI synchronization. The engine queues events
//! as state changes happen; the host drains them on its own cadence (frame
//! tick, render loop) via [`crate::PlaybackEngine::drain_events`].

use serde::{Deserialize, Serialize};

use crate::types::{PlaybackState, TrackId};

/// Events emitted by the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// A different track was committed as current media
    TrackChanged {
        /// ID of the new (current) track
        track_id: TrackId,
        /// ID of the previous track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// A track with unknown duration got its duration from the manifest
    DurationDiscovered {
        /// ID of the track
        track_id: TrackId,
        /// Discovered duration in seconds
        duration: f64,
    },

    /// Volume or mute changed, as reported by the media element
    VolumeChanged {
        /// New volume (0.0 - 1.0)
        volume: f32,
        /// Whether audio is muted
        muted: bool,
    },

    /// A streaming fault after the session became ready.
    ///
    /// Never changes playback state; surfaced to the UI as a warning.
    StreamWarning {
        /// Description of the fault
        detail: String,
    },
}
