use std::path::Path;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    NoDevice(String),

    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("no track loaded")]
    NothingLoaded,

    #[error("audio thread stopped")]
    Disconnected,
}

/// The playback operations the sequencer needs from an audio backend.
///
/// "Busy" means audio is actually being output: a paused, stopped or
/// finished track is not busy.
pub trait AudioEngine: Send + Sync {
    /// Load `path`, replacing whatever was loaded before. The new track starts paused.
    fn load(&self, path: &Path) -> Result<(), AudioError>;
    /// Start output of the loaded track.
    fn play(&self) -> Result<(), AudioError>;
    fn pause(&self);
    fn resume(&self);
    fn stop(&self);
    fn is_busy(&self) -> bool;
    /// True while a loaded, unfinished track is held paused.
    fn is_paused(&self) -> bool;
    /// Playback position of the current track.
    fn elapsed(&self) -> Duration;
}
