//! Track source resolution
//!
//! Pure computation of the next or previous playable index in a queue that
//! may have changed since the current track started.

use crate::error::{PlaybackError, Result};
use crate::types::{Direction, Track, TrackId};

/// Resolve the adjacent index to play.
///
/// Locates `current` in `list` by id and steps one position in `direction`,
/// wrapping around both ends. If the current track has been removed from the
/// list, `fallback_index` (typically the position the track had when it
/// started) is used as the pivot instead.
///
/// Wrap-around uses mathematical modulo: previous from index 0 of a list of
/// length `n` yields `n - 1`, never a negative number. The returned index may
/// equal the pivot (single-element list); the caller decides whether that
/// means restart or no-op.
pub fn resolve_adjacent(
    list: &[Track],
    current: &TrackId,
    direction: Direction,
    fallback_index: Option<usize>,
) -> Result<usize> {
    if list.is_empty() {
        return Err(PlaybackError::NoQueue);
    }

    let pivot = match list.iter().position(|t| &t.id == current) {
        Some(position) => position,
        None => fallback_index.ok_or(PlaybackError::TrackNotFound)?,
    };

    let len = list.len() as i64;
    let step: i64 = match direction {
        Direction::Next => 1,
        Direction::Previous => -1,
    };

    Ok((pivot as i64 + step).rem_euclid(len) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn track(id: &str) -> Track {
        Track {
            id: TrackId::new(id),
            title: format!("Track {}", id),
            artist: None,
            album: None,
            duration: Some(180.0),
        }
    }

    fn list(ids: &[&str]) -> Vec<Track> {
        ids.iter().map(|id| track(id)).collect()
    }

    #[test]
    fn empty_list_is_no_queue() {
        let result = resolve_adjacent(&[], &TrackId::new("a"), Direction::Next, None);
        assert!(matches!(result, Err(PlaybackError::NoQueue)));
    }

    #[test]
    fn next_steps_forward() {
        let tracks = list(&["a", "b", "c"]);
        let index = resolve_adjacent(&tracks, &"a".into(), Direction::Next, None).unwrap();
        assert_eq!(index, 1);
    }

    #[test]
    fn next_wraps_at_end() {
        let tracks = list(&["a", "b", "c"]);
        let index = resolve_adjacent(&tracks, &"c".into(), Direction::Next, None).unwrap();
        assert_eq!(index, 0);
    }

    #[test]
    fn previous_from_first_wraps_to_last() {
        let tracks = list(&["a", "b", "c"]);
        let index = resolve_adjacent(&tracks, &"a".into(), Direction::Previous, None).unwrap();
        assert_eq!(index, 2);
    }

    #[test]
    fn removed_track_uses_fallback_pivot() {
        let tracks = list(&["a", "b", "c"]);
        let index =
            resolve_adjacent(&tracks, &"gone".into(), Direction::Next, Some(1)).unwrap();
        assert_eq!(index, 2);
    }

    #[test]
    fn removed_track_without_fallback_fails() {
        let tracks = list(&["a", "b", "c"]);
        let result = resolve_adjacent(&tracks, &"gone".into(), Direction::Next, None);
        assert!(matches!(result, Err(PlaybackError::TrackNotFound)));
    }

    #[test]
    fn single_element_list_resolves_to_itself() {
        let tracks = list(&["only"]);
        let next = resolve_adjacent(&tracks, &"only".into(), Direction::Next, None).unwrap();
        let prev = resolve_adjacent(&tracks, &"only".into(), Direction::Previous, None).unwrap();
        assert_eq!(next, 0);
        assert_eq!(prev, 0);
    }

    #[test]
    fn stale_fallback_beyond_list_end_stays_in_range() {
        // The list shrank since the fallback index was recorded.
        let tracks = list(&["a", "b"]);
        let index =
            resolve_adjacent(&tracks, &"gone".into(), Direction::Next, Some(5)).unwrap();
        assert_eq!(index, 0); // (5 + 1) mod 2
    }

    proptest! {
        #[test]
        fn resolved_index_always_in_range(
            len in 1usize..64,
            pivot in 0usize..64,
            forward in proptest::bool::ANY,
        ) {
            let ids: Vec<String> = (0..len).map(|i| format!("t{}", i)).collect();
            let tracks: Vec<Track> =
                ids.iter().map(|id| track(id)).collect();
            let direction = if forward { Direction::Next } else { Direction::Previous };

            let index = resolve_adjacent(
                &tracks,
                &TrackId::new("not-present"),
                direction,
                Some(pivot),
            ).unwrap();

            prop_assert!(index < len);
        }

        #[test]
        fn previous_from_head_is_last(len in 2usize..64) {
            let tracks: Vec<Track> =
                (0..len).map(|i| track(&format!("t{}", i))).collect();
            let head = tracks[0].id.clone();
            let index =
                resolve_adjacent(&tracks, &head, Direction::Previous, None).unwrap();

            prop_assert_eq!(index, len - 1);
        }
    }
}
