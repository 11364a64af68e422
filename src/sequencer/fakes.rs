//! In-memory collaborators for exercising the sequencer without audio hardware.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::audio::{AudioEngine, AudioError};
use crate::library::{MetadataError, MetadataReader};
use crate::waveform::{Waveform, WaveformError, WaveformRenderer};

use super::{Collaborators, PlayerEvent, Sequencer, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Load(PathBuf),
    Play,
    Pause,
    Resume,
    Stop,
}

#[derive(Debug, Default)]
struct EngineState {
    calls: Vec<EngineCall>,
    refused: Vec<PathBuf>,
    busy: bool,
    paused: bool,
    elapsed: Duration,
    end_on_pause: bool,
}

/// Engine that records calls and lets tests decide when a track ends.
#[derive(Debug, Default)]
pub struct FakeEngine {
    state: Mutex<EngineState>,
}

impl FakeEngine {
    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Make every later `load` of `path` fail.
    pub fn refuse(&self, path: impl Into<PathBuf>) {
        self.lock().refused.push(path.into());
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.lock().calls.clone()
    }

    pub fn loads(&self) -> Vec<PathBuf> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                EngineCall::Load(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    /// Pretend the current track ran out of audio.
    pub fn finish_track(&self) {
        let mut s = self.lock();
        s.busy = false;
        s.paused = false;
    }

    /// The next `pause` arrives just after the track ran out of audio.
    pub fn end_on_next_pause(&self) {
        self.lock().end_on_pause = true;
    }

    pub fn set_elapsed(&self, elapsed: Duration) {
        self.lock().elapsed = elapsed;
    }
}

impl AudioEngine for FakeEngine {
    fn load(&self, path: &Path) -> Result<(), AudioError> {
        let mut s = self.lock();
        s.calls.push(EngineCall::Load(path.to_path_buf()));
        s.busy = false;
        s.paused = false;
        s.elapsed = Duration::ZERO;
        if s.refused.iter().any(|p| p == path) {
            return Err(AudioError::Decode {
                path: path.display().to_string(),
                reason: "unsupported format".to_string(),
            });
        }
        s.paused = true;
        Ok(())
    }

    fn play(&self) -> Result<(), AudioError> {
        let mut s = self.lock();
        s.calls.push(EngineCall::Play);
        if !s.paused {
            return Err(AudioError::NothingLoaded);
        }
        s.busy = true;
        s.paused = false;
        Ok(())
    }

    fn pause(&self) {
        let mut s = self.lock();
        s.calls.push(EngineCall::Pause);
        if std::mem::take(&mut s.end_on_pause) {
            s.busy = false;
            s.paused = false;
            return;
        }
        if s.busy {
            s.busy = false;
            s.paused = true;
        }
    }

    fn resume(&self) {
        let mut s = self.lock();
        s.calls.push(EngineCall::Resume);
        if s.paused {
            s.busy = true;
            s.paused = false;
        }
    }

    fn stop(&self) {
        let mut s = self.lock();
        s.calls.push(EngineCall::Stop);
        s.busy = false;
        s.paused = false;
        s.elapsed = Duration::ZERO;
    }

    fn is_busy(&self) -> bool {
        self.lock().busy
    }

    fn is_paused(&self) -> bool {
        self.lock().paused
    }

    fn elapsed(&self) -> Duration {
        self.lock().elapsed
    }
}

/// Reports the same duration for every file, or fails for every file.
pub struct FakeMetadata(pub Option<Duration>);

impl MetadataReader for FakeMetadata {
    fn duration(&self, path: &Path) -> Result<Duration, MetadataError> {
        self.0.ok_or_else(|| MetadataError::Unreadable {
            path: path.display().to_string(),
            reason: "corrupt header".to_string(),
        })
    }
}

/// Pretends to write a thumbnail, or fails.
pub struct FakeRenderer {
    pub fail: bool,
}

impl WaveformRenderer for FakeRenderer {
    fn render(&self, audio: &Path, current: &dyn Fn() -> bool) -> Result<Waveform, WaveformError> {
        if !current() {
            return Err(WaveformError::Superseded(audio.display().to_string()));
        }
        if self.fail {
            return Err(WaveformError::Empty(audio.display().to_string()));
        }
        Ok(Waveform {
            image: PathBuf::from("waveform.png"),
            columns: vec![0.25, 1.0, 0.5],
        })
    }
}

pub struct Harness {
    pub sequencer: Sequencer,
    pub engine: Arc<FakeEngine>,
    pub events: Receiver<PlayerEvent>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(FakeMetadata(Some(Duration::from_secs(180))), None)
    }

    pub fn with(metadata: FakeMetadata, renderer: Option<FakeRenderer>) -> Self {
        let engine = Arc::new(FakeEngine::default());
        let (tx, rx) = mpsc::channel();
        let collaborators = Collaborators {
            engine: engine.clone(),
            metadata: Arc::new(metadata),
            waveform: renderer.map(|r| Arc::new(r) as Arc<dyn WaveformRenderer>),
        };
        let sequencer = Sequencer::new(collaborators, tx, Duration::from_millis(1))
            .with_rng(StdRng::seed_from_u64(7));

        Self {
            sequencer,
            engine,
            events: rx,
        }
    }

    /// Playlist of `names` under a fake music directory.
    pub fn with_tracks(names: &[&str]) -> Self {
        let mut h = Self::new();
        h.sequencer.add_tracks(names.iter().map(|n| PathBuf::from("/music").join(n)));
        h
    }

    pub fn index(&self) -> Option<usize> {
        self.sequencer.state().current_index
    }

    /// Status texts received so far, in order.
    pub fn statuses(&self) -> Vec<String> {
        self.events
            .try_iter()
            .filter_map(|e| match e {
                PlayerEvent::Status(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    /// Wait for the first event matching `pick`, skipping everything else.
    pub fn wait_for<T>(&self, mut pick: impl FnMut(PlayerEvent) -> Option<T>) -> Option<T> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while let Some(left) = deadline.checked_duration_since(Instant::now()) {
            match self.events.recv_timeout(left) {
                Ok(event) => {
                    if let Some(found) = pick(event) {
                        return Some(found);
                    }
                }
                Err(_) => return None,
            }
        }
        None
    }

    pub fn wait_for_track_end(&self) -> Option<SessionId> {
        self.wait_for(|e| match e {
            PlayerEvent::TrackEnded { session } => Some(session),
            _ => None,
        })
    }
}
