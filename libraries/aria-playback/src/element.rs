//! Media element capability trait
//!
//! Abstracts the single physical media element the application owns. The
//! engine writes commands through this trait; the element's own events (play,
//! pause, ended, volume change) are routed back by the platform driver via
//! [`crate::PlaybackEngine::handle_element_event`] and are the single source
//! of truth for playback state and volume.

use async_trait::async_trait;

use crate::error::Result;

/// The one media element playback is bound to.
///
/// Setters are plain writes; only `play` is asynchronous because the platform
/// may refuse to start playback (autoplay policy), which surfaces as
/// [`crate::PlaybackError::PlaybackRejected`].
#[async_trait]
pub trait MediaElement: Send + Sync {
    /// Request playback to start or resume
    async fn play(&self) -> Result<()>;

    /// Request playback to pause
    fn pause(&self);

    /// Move the playback position, in seconds from the start
    fn seek(&self, position: f64);

    /// Current playback position in seconds
    fn position(&self) -> f64;

    /// Write the volume (0.0 - 1.0)
    fn set_volume(&self, volume: f32);

    /// Write the mute flag
    fn set_muted(&self, muted: bool);
}

/// Events the media element reports back to the engine
#[derive(Debug, Clone, PartialEq)]
pub enum ElementEvent {
    /// Playback actually started or resumed
    Play,

    /// Playback actually paused
    Pause,

    /// The current track played to its end
    Ended,

    /// Volume or mute actually changed on the device
    VolumeChanged {
        /// New volume (0.0 - 1.0)
        volume: f32,
        /// New mute flag
        muted: bool,
    },
}
