use crate::library::Track;

/// Flags and pointer the sequencer keeps next to the playlist.
///
/// `current_index` is `None` exactly when the playlist is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackState {
    pub current_index: Option<usize>,
    pub repeat: bool,
    pub shuffle: bool,
    pub is_playing: bool,
}

/// Ordered, append-only list of tracks. Duplicates are kept.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub(super) fn push(&mut self, track: Track) {
        self.tracks.push(track);
    }
}
