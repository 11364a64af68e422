//! Audio-related small types and handles.
//!
//! This module defines the commands sent to the audio thread and the
//! playback snapshot it shares back.

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::engine::AudioError;

/// Channel the audio thread answers a request on.
pub(super) type Reply = Sender<Result<(), AudioError>>;

#[derive(Debug)]
pub(super) enum AudioCmd {
    /// Decode the file into a fresh paused sink, dropping the previous one.
    Load(PathBuf, Reply),
    /// Start output of the loaded sink.
    Play(Reply),
    /// Pause output.
    Pause(Reply),
    /// Resume paused output.
    Resume(Reply),
    /// Stop and drop the current sink.
    Stop(Reply),
    /// Quit the audio thread, fading out over `fade_out` first.
    Quit { fade_out: Duration },
}

/// Runtime playback information shared with other threads.
#[derive(Debug, Clone, Default)]
pub struct PlaybackInfo {
    /// Audio is being output right now.
    pub busy: bool,
    /// A loaded, unfinished track is paused.
    pub paused: bool,
    /// Position within the current track.
    pub elapsed: Duration,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
