//! Aria - Media Playback Engine
//!
//! Platform-agnostic playback management for the Aria streaming client.
//!
//! This crate provides:
//! - The playback state machine (`unloaded -> loading -> playing/paused`)
//! - Queue navigation tolerant of list mutation mid-playback
//! - Adaptive-streaming session loading with signed fragment URLs
//! - A keyed queue registry shared with the UI layer
//! - Best-effort listening-history reporting
//!
//! # Architecture
//!
//! `aria-playback` is completely platform-agnostic: it owns no media element,
//! no HTTP client, and no streaming stack. Those arrive as capability traits
//! ([`MediaElement`], [`AdaptiveStreaming`], [`StreamingApi`]) implemented by
//! the host application (see `aria-server-client` for the HTTP side). Exactly
//! one [`PlaybackEngine`] exists per application, created at startup.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use aria_playback::{PlaybackEngine, PlayerConfig, QueueStore};
//!
//! let queues = QueueStore::new();
//! let engine = PlaybackEngine::new(
//!     PlayerConfig::default(),
//!     queues.clone(),
//!     element,  // Arc<dyn MediaElement>
//!     backend,  // Arc<dyn AdaptiveStreaming>
//!     api,      // Arc<dyn StreamingApi>
//! );
//!
//! // A UI surface registers a queue, then plays from it.
//! queues.set_list("playlist:42", tracks);
//! engine.set_media("playlist:42", 0).await?;
//!
//! // The platform driver routes element events back in:
//! // engine.handle_element_event(event).await;
//! ```

mod element;
mod engine;
mod error;
mod events;
mod loader;
mod queue;
mod resolver;
mod streaming;
pub mod types;

// Public exports
pub use element::{ElementEvent, MediaElement};
pub use engine::PlaybackEngine;
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use loader::{LoadedStream, StreamLoader};
pub use queue::QueueStore;
pub use resolver::resolve_adjacent;
pub use streaming::{
    AdaptiveStreaming, AttachedSession, FragmentSigner, SessionEvent, StreamSession, StreamingApi,
};
pub use types::{
    CurrentMedia, Deliverable, Direction, NavOutcome, PlaybackState, PlayerConfig,
    StreamProtocol, Track, TrackId,
};
