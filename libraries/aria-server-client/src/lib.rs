//! Aria - Server Client
//!
//! HTTP client for the Aria Server API. Implements the playback engine's
//! collaborator contracts (manifest resolution, signed fragment URLs,
//! listening history) so [`AriaServerClient`] can be handed to
//! `aria_playback::PlaybackEngine` as its `StreamingApi`.

mod client;
mod error;
mod types;

// Public exports
pub use client::AriaServerClient;
pub use error::{Result, ServerClientError};
pub use types::{
    DeliverableDto, ManifestsResponse, PlayStartedRequest, ServerConfig, ServerInfo,
    SignedUrlResponse,
};
