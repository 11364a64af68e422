use std::path::Path;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use super::engine::{AudioEngine, AudioError};
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo, Reply};

/// `AudioEngine` that forwards every operation to a rodio audio thread.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let audio_handle = spawn_audio_thread(rx, playback_info.clone());

        Self {
            tx,
            playback: playback_info,
            join: Mutex::new(Some(audio_handle)),
        }
    }

    /// Send a request and block until the audio thread has handled it.
    fn request(&self, cmd: impl FnOnce(Reply) -> AudioCmd) -> Result<(), AudioError> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.tx
            .send(cmd(reply_tx))
            .map_err(|_| AudioError::Disconnected)?;
        reply_rx.recv().map_err(|_| AudioError::Disconnected)?
    }

    fn snapshot(&self) -> PlaybackInfo {
        self.playback
            .lock()
            .map(|info| info.clone())
            .unwrap_or_default()
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.tx.send(AudioCmd::Quit { fade_out });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Default for AudioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioEngine for AudioPlayer {
    fn load(&self, path: &Path) -> Result<(), AudioError> {
        self.request(|reply| AudioCmd::Load(path.to_path_buf(), reply))
    }

    fn play(&self) -> Result<(), AudioError> {
        self.request(AudioCmd::Play)
    }

    fn pause(&self) {
        if let Err(e) = self.request(AudioCmd::Pause) {
            log::warn!("pause failed: {e}");
        }
    }

    fn resume(&self) {
        if let Err(e) = self.request(AudioCmd::Resume) {
            log::warn!("resume failed: {e}");
        }
    }

    fn stop(&self) {
        if let Err(e) = self.request(AudioCmd::Stop) {
            log::warn!("stop failed: {e}");
        }
    }

    fn is_busy(&self) -> bool {
        self.snapshot().busy
    }

    fn is_paused(&self) -> bool {
        self.snapshot().paused
    }

    fn elapsed(&self) -> Duration {
        self.snapshot().elapsed
    }
}
