//! Keyed track-list registry
//!
//! Several UI surfaces register candidate queues ("most-played",
//! "playlist:42") without the engine knowing who owns which key. The store is
//! intentionally dumb: wholesale replacement, no validation, no notification.
//! All semantic decisions live in the engine.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::types::{Track, TrackId};

/// Registry mapping opaque list keys to ordered track lists.
///
/// Cheap to clone; clones share the same underlying storage. The engine only
/// reads a list at the moment it needs it and never caches a copy across
/// calls.
#[derive(Debug, Clone, Default)]
pub struct QueueStore {
    lists: Arc<Mutex<HashMap<String, Vec<Track>>>>,
}

impl QueueStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list stored under `key` wholesale
    pub fn set_list(&self, key: impl Into<String>, tracks: Vec<Track>) {
        self.lock().insert(key.into(), tracks);
    }

    /// Get a snapshot of the list stored under `key`
    pub fn get_list(&self, key: &str) -> Option<Vec<Track>> {
        self.lock().get(key).cloned()
    }

    /// Remove the list stored under `key`
    pub fn remove_list(&self, key: &str) {
        self.lock().remove(key);
    }

    /// Number of registered lists
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if no lists are registered
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Write a discovered duration into the stored copy of a track.
    ///
    /// Only fills a missing duration; a known value is never overwritten.
    /// A no-op when the key or track is gone (the list may have been replaced
    /// while the manifest was loading).
    pub fn backfill_duration(&self, key: &str, track: &TrackId, duration: f64) {
        let mut lists = self.lock();
        if let Some(list) = lists.get_mut(key) {
            if let Some(stored) = list.iter_mut().find(|t| &t.id == track) {
                if stored.duration.is_none() {
                    stored.duration = Some(duration);
                }
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<Track>>> {
        self.lists.lock().expect("queue store lock poisoned")
    }
}
