//! Track registry - the fixed track list of the disc

use std::sync::Arc;
use serde::Deserialize;

/// A playable audio item
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Track {
    pub name: String,
    pub path: String,
}

impl Track {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Built-in track list used when the config does not provide one
pub fn default_tracks() -> Vec<Track> {
    vec![
        Track::new("TRACK 01 :: DIGITAL BATH", "audio/track01.mp3"),
        Track::new("TRACK 02 :: ELITE", "audio/track02.mp3"),
        Track::new("TRACK 03 :: RX QUEEN", "audio/track03.mp3"),
        Track::new("TRACK 04 :: STREET CARP", "audio/track04.mp3"),
        Track::new("TRACK 05 :: TEENAGER", "audio/track05.mp3"),
    ]
}

/// Immutable, ordered list of tracks. Cheap to clone.
#[derive(Clone, Debug)]
pub struct TrackRegistry {
    tracks: Arc<[Track]>,
}

impl TrackRegistry {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks: tracks.into(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Index of the last track, `None` for an empty disc
    pub fn last_index(&self) -> Option<usize> {
        self.tracks.len().checked_sub(1)
    }
}

impl Default for TrackRegistry {
    fn default() -> Self {
        Self::new(default_tracks())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_disc_has_five_tracks_in_order() {
        let registry = TrackRegistry::default();
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.last_index(), Some(4));
        assert_eq!(registry.get(0).map(|t| t.name.as_str()), Some("TRACK 01 :: DIGITAL BATH"));
        assert_eq!(registry.get(4).map(|t| t.path.as_str()), Some("audio/track05.mp3"));
        assert!(registry.get(5).is_none());
    }

    #[test]
    fn empty_registry_has_no_last_index() {
        let registry = TrackRegistry::new(Vec::new());
        assert!(registry.is_empty());
        assert_eq!(registry.last_index(), None);
    }

    #[test]
    fn clones_share_the_same_tracks() {
        let registry = TrackRegistry::default();
        let clone = registry.clone();
        assert_eq!(clone.len(), registry.len());
        assert_eq!(clone.get(4), registry.get(4));
        assert!(Arc::ptr_eq(&clone.tracks, &registry.tracks));
    }
}
