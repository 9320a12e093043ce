//! Playback engine - core orchestration
//!
//! Owns current-track identity and playback state, drives the streaming
//! loader, and reacts to media element events. One engine exists per
//! application, created at startup and kept for the application's lifetime.
//!
//! Transitions: `Unloaded -> Loading -> {Playing, Paused} -> Unloaded`,
//! with `Playing <-> Paused` free and every state able to reach `Unloaded`
//! through `unload` or a load failure. `Loading` is non-interruptible: a
//! second load attempt fails with `Busy` instead of queueing or preempting,
//! so two manifests can never race on the one media element.
//!
//! Every load carries a generation number. Async continuations compare it
//! against the engine's current generation before committing anything, so a
//! session that resolves after `unload` (or after a newer load took over) is
//! destroyed instead of clobbering state.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

use crate::element::{ElementEvent, MediaElement};
use crate::error::{PlaybackError, Result};
use crate::events::PlaybackEvent;
use crate::loader::StreamLoader;
use crate::queue::QueueStore;
use crate::resolver::resolve_adjacent;
use crate::streaming::{AdaptiveStreaming, SessionEvent, StreamSession, StreamingApi};
use crate::types::{CurrentMedia, Direction, NavOutcome, PlaybackState, PlayerConfig, Track, TrackId};

struct EngineInner {
    state: PlaybackState,
    current: Option<CurrentMedia>,

    // Mirrored from the element's own change events, never written
    // optimistically.
    volume: f32,
    muted: bool,

    // Bumped by every load and every unload; stale async continuations
    // compare against it before touching state.
    generation: u64,

    // The one live streaming session, if any.
    session: Option<Box<dyn StreamSession>>,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl EngineInner {
    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            debug!(from = ?self.state, to = ?state, "Playback state changed");
            self.state = state;
            self.pending_events
                .push(PlaybackEvent::StateChanged { state });
        }
    }

    fn push(&mut self, event: PlaybackEvent) {
        self.pending_events.push(event);
    }

    /// Tear everything down. Safe from any state.
    fn unload(&mut self) {
        self.generation += 1;
        if let Some(mut session) = self.session.take() {
            session.destroy();
        }
        self.current = None;
        self.set_state(PlaybackState::Unloaded);
    }
}

/// Central playback management.
///
/// Cheap to clone; clones share the same engine. Exposes the operations of
/// the playback state machine and routes media element events back into it
/// via [`PlaybackEngine::handle_element_event`].
#[derive(Clone)]
pub struct PlaybackEngine {
    inner: Arc<Mutex<EngineInner>>,
    queues: QueueStore,
    element: Arc<dyn MediaElement>,
    api: Arc<dyn StreamingApi>,
    loader: Arc<StreamLoader>,
}

impl PlaybackEngine {
    /// Create a new engine bound to the application's media element and
    /// collaborator capabilities.
    pub fn new(
        config: PlayerConfig,
        queues: QueueStore,
        element: Arc<dyn MediaElement>,
        backend: Arc<dyn AdaptiveStreaming>,
        api: Arc<dyn StreamingApi>,
    ) -> Self {
        let loader = Arc::new(StreamLoader::new(backend, Arc::clone(&api), config));

        Self {
            inner: Arc::new(Mutex::new(EngineInner {
                state: PlaybackState::Unloaded,
                current: None,
                volume: 1.0,
                muted: false,
                generation: 0,
                session: None,
                pending_events: Vec::new(),
            })),
            queues,
            element,
            api,
            loader,
        }
    }

    // ===== Loading =====

    /// Play the track at `index` of the list registered under `list_key`.
    ///
    /// If that track is already current, it restarts in place (seek to zero,
    /// resume) without reopening the streaming session. On any load failure
    /// the engine has already unloaded itself before the error is returned.
    pub async fn set_media(&self, list_key: &str, index: usize) -> Result<()> {
        let list = self.queues.get_list(list_key).ok_or(PlaybackError::NoQueue)?;
        if list.is_empty() {
            return Err(PlaybackError::NoQueue);
        }
        let track = list
            .get(index)
            .cloned()
            .ok_or(PlaybackError::TrackNotFound)?;

        {
            let inner = self.inner.lock().await;
            if inner.state == PlaybackState::Loading {
                return Err(PlaybackError::Busy);
            }
            if let Some(current) = &inner.current {
                if current.list_key == list_key && current.track.id == track.id {
                    drop(inner);
                    debug!(track = %track.id, "Requested track already loaded, restarting in place");
                    return self.restart_in_place().await;
                }
            }
        }

        self.load_into(list_key.to_string(), index, track).await
    }

    /// Tear down the streaming session and forget the current track.
    ///
    /// Always succeeds, from any state, and moots any load still in flight.
    pub async fn unload(&self) {
        self.inner.lock().await.unload();
    }

    // ===== Transport =====

    /// Resume playback. A no-op unless currently paused.
    pub async fn play(&self) -> Result<()> {
        let paused = self.inner.lock().await.state == PlaybackState::Paused;
        if paused {
            self.element.play().await?;
        }
        Ok(())
    }

    /// Pause playback. A no-op unless currently playing.
    pub async fn pause(&self) {
        let playing = self.inner.lock().await.state == PlaybackState::Playing;
        if playing {
            self.element.pause();
        }
    }

    /// Toggle between playing and paused; a no-op in any other state.
    pub async fn play_pause_toggle(&self) -> Result<()> {
        let state = self.inner.lock().await.state;
        match state {
            PlaybackState::Playing => {
                self.pause().await;
                Ok(())
            }
            PlaybackState::Paused => self.play().await,
            PlaybackState::Unloaded | PlaybackState::Loading => Ok(()),
        }
    }

    // ===== Navigation =====

    /// Advance to the next track in the current queue.
    pub async fn next(&self) -> Result<NavOutcome> {
        self.step(Direction::Next).await
    }

    /// Go back to the previous track in the current queue.
    pub async fn previous(&self) -> Result<NavOutcome> {
        self.step(Direction::Previous).await
    }

    async fn step(&self, direction: Direction) -> Result<NavOutcome> {
        let current = {
            let inner = self.inner.lock().await;
            if inner.state == PlaybackState::Loading {
                return Err(PlaybackError::Busy);
            }
            inner.current.clone()
        };
        let Some(current) = current else {
            return Ok(NavOutcome::Stopped);
        };

        // Always the live list, never a snapshot from when playback started.
        let Some(list) = self.queues.get_list(&current.list_key) else {
            debug!(key = %current.list_key, "Queue disappeared, unloading");
            self.unload().await;
            return Ok(NavOutcome::Stopped);
        };

        let next_index = match resolve_adjacent(
            &list,
            &current.track.id,
            direction,
            Some(current.index),
        ) {
            Ok(index) => index,
            Err(error) => {
                debug!(%error, key = %current.list_key, "Navigation dead end, unloading");
                self.unload().await;
                return Ok(NavOutcome::Stopped);
            }
        };

        let target = list[next_index].clone();
        if target.id == current.track.id {
            self.restart_in_place().await?;
            return Ok(NavOutcome::Restarted);
        }

        self.load_into(current.list_key, next_index, target).await?;
        Ok(NavOutcome::Advanced)
    }

    // ===== Volume =====

    /// Write a volume (0.0 - 1.0) through to the element.
    ///
    /// The observed [`PlaybackEngine::volume`] updates only once the element
    /// reports the change back.
    pub fn set_volume(&self, volume: f32) {
        self.element.set_volume(volume.clamp(0.0, 1.0));
    }

    /// Write the mute flag through to the element.
    pub fn set_muted(&self, muted: bool) {
        self.element.set_muted(muted);
    }

    /// Volume as last reported by the element
    pub async fn volume(&self) -> f32 {
        self.inner.lock().await.volume
    }

    /// Mute flag as last reported by the element
    pub async fn is_muted(&self) -> bool {
        self.inner.lock().await.muted
    }

    // ===== Seek =====

    /// Current playback position in seconds; 0.0 when nothing is loaded.
    pub async fn position(&self) -> f64 {
        if self.inner.lock().await.current.is_some() {
            self.element.position()
        } else {
            0.0
        }
    }

    /// Move the playback position; a no-op when nothing is loaded.
    pub async fn seek(&self, position: f64) {
        if self.inner.lock().await.current.is_some() {
            self.element.seek(position);
        }
    }

    // ===== State queries =====

    /// Current playback state
    pub async fn state(&self) -> PlaybackState {
        self.inner.lock().await.state
    }

    /// What is loaded right now, if anything
    pub async fn current_media(&self) -> Option<CurrentMedia> {
        self.inner.lock().await.current.clone()
    }

    /// Drain all pending events.
    ///
    /// Returns the events emitted since the last drain; the host calls this
    /// on its own cadence to synchronize UI state.
    pub async fn drain_events(&self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.inner.lock().await.pending_events)
    }

    // ===== Element events =====

    /// Route an event from the media element into the state machine.
    ///
    /// The element is the single source of truth for playing/paused and for
    /// volume/mute; the engine never flips those directly.
    pub async fn handle_element_event(&self, event: ElementEvent) {
        match event {
            ElementEvent::Play => {
                let mut inner = self.inner.lock().await;
                if inner.current.is_some() {
                    inner.set_state(PlaybackState::Playing);
                }
            }
            ElementEvent::Pause => {
                let mut inner = self.inner.lock().await;
                if inner.state == PlaybackState::Playing {
                    inner.set_state(PlaybackState::Paused);
                }
            }
            ElementEvent::Ended => {
                debug!("Track ended, advancing");
                if let Err(error) = self.next().await {
                    warn!(%error, "Auto-advance after track end failed");
                }
            }
            ElementEvent::VolumeChanged { volume, muted } => {
                let mut inner = self.inner.lock().await;
                if inner.volume != volume || inner.muted != muted {
                    inner.volume = volume;
                    inner.muted = muted;
                    inner.push(PlaybackEvent::VolumeChanged { volume, muted });
                }
            }
        }
    }

    // ===== Internal load path =====

    /// Seek to zero and resume without reopening the streaming session.
    async fn restart_in_place(&self) -> Result<()> {
        self.element.seek(0.0);
        if let Err(error) = self.element.play().await {
            self.unload().await;
            return Err(error);
        }
        Ok(())
    }

    /// The one code path that loads a track: used by `set_media` and by
    /// navigation.
    async fn load_into(&self, list_key: String, index: usize, mut track: Track) -> Result<()> {
        let generation = {
            let mut inner = self.inner.lock().await;
            if inner.state == PlaybackState::Loading {
                return Err(PlaybackError::Busy);
            }
            // One session at a time: drop the old one before attaching anew.
            if let Some(mut session) = inner.session.take() {
                session.destroy();
            }
            inner.generation += 1;
            inner.set_state(PlaybackState::Loading);
            inner.generation
        };

        match self.loader.open(&track).await {
            Ok(loaded) => {
                let discovered = track.duration.is_none();
                if discovered {
                    track.duration = Some(loaded.duration);
                }

                {
                    let mut inner = self.inner.lock().await;
                    if inner.generation != generation {
                        // Superseded while the manifest was loading; the
                        // newer command owns the element now.
                        debug!(track = %track.id, "Discarding stale load result");
                        let mut session = loaded.session;
                        session.destroy();
                        return Ok(());
                    }

                    let previous_track_id =
                        inner.current.as_ref().map(|c| c.track.id.clone());
                    inner.session = Some(loaded.session);
                    inner.current = Some(CurrentMedia {
                        list_key: list_key.clone(),
                        index,
                        track: track.clone(),
                    });
                    inner.push(PlaybackEvent::TrackChanged {
                        track_id: track.id.clone(),
                        previous_track_id,
                    });
                    if discovered {
                        inner.push(PlaybackEvent::DurationDiscovered {
                            track_id: track.id.clone(),
                            duration: loaded.duration,
                        });
                    }
                }

                if discovered {
                    self.queues
                        .backfill_duration(&list_key, &track.id, loaded.duration);
                }

                self.spawn_stream_fault_monitor(generation, loaded.late_events);

                if let Err(error) = self.element.play().await {
                    self.unload().await;
                    return Err(error);
                }

                self.spawn_play_notification(track.id);
                Ok(())
            }
            Err(error) => {
                let mut inner = self.inner.lock().await;
                if inner.generation == generation {
                    inner.unload();
                }
                drop(inner);
                Err(error)
            }
        }
    }

    /// Forward post-ready session faults as warnings.
    ///
    /// These never change playback state and can no longer fail the load;
    /// the monitor dies as soon as its session's generation is superseded.
    fn spawn_stream_fault_monitor(
        &self,
        generation: u64,
        mut events: mpsc::UnboundedReceiver<SessionEvent>,
    ) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if let SessionEvent::Error { detail } = event {
                    let mut inner = inner.lock().await;
                    if inner.generation != generation {
                        break;
                    }
                    warn!(%detail, "Streaming fault during playback");
                    inner.push(PlaybackEvent::StreamWarning { detail });
                }
            }
        });
    }

    /// Best-effort listening-history write; failures are logged and dropped.
    fn spawn_play_notification(&self, track: TrackId) {
        let api = Arc::clone(&self.api);
        tokio::spawn(async move {
            if let Err(error) = api.notify_play_started(&track).await {
                warn!(%track, %error, "Listening-history notification failed");
            }
        });
    }
}
