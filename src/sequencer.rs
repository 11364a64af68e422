//! Playback sequencing: the playlist, the current-track pointer, the
//! repeat/shuffle flags and what plays next.
//!
//! The `Sequencer` is owned by the event loop and only mutated there. Each
//! successful start of a track opens a session with its own progress loop and
//! waveform job; both report back through `PlayerEvent`s, and the event loop
//! hands `TrackEnded` back to `Sequencer::on_track_end` so the end-of-track
//! policy always runs on the same thread as user actions.

mod events;
mod progress;
mod session;
mod state;
mod thumbnail;

#[cfg(test)]
pub(crate) mod fakes;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::AudioEngine;
use crate::library::{MetadataReader, Track};
use crate::waveform::WaveformRenderer;

pub use events::PlayerEvent;
pub use session::SessionId;
pub use state::{PlaybackState, Playlist};

use progress::{ProgressJob, spawn_progress_loop};
use session::Sessions;
use thumbnail::spawn_waveform_job;

/// The external components the sequencer drives.
pub struct Collaborators {
    pub engine: Arc<dyn AudioEngine>,
    pub metadata: Arc<dyn MetadataReader>,
    /// `None` disables waveform thumbnails.
    pub waveform: Option<Arc<dyn WaveformRenderer>>,
}

pub struct Sequencer {
    playlist: Playlist,
    state: PlaybackState,
    engine: Arc<dyn AudioEngine>,
    metadata: Arc<dyn MetadataReader>,
    waveform: Option<Arc<dyn WaveformRenderer>>,
    events: Sender<PlayerEvent>,
    sessions: Sessions,
    progress_interval: Duration,
    rng: StdRng,
}

impl Sequencer {
    pub fn new(
        collaborators: Collaborators,
        events: Sender<PlayerEvent>,
        progress_interval: Duration,
    ) -> Self {
        Self {
            playlist: Playlist::default(),
            state: PlaybackState::default(),
            engine: collaborators.engine,
            metadata: collaborators.metadata,
            waveform: collaborators.waveform,
            events,
            sessions: Sessions::default(),
            progress_interval,
            rng: StdRng::from_entropy(),
        }
    }

    /// Replace the random source used for shuffle picks.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.state.current_index.and_then(|i| self.playlist.get(i))
    }

    /// Whether a session-scoped event still belongs to the running session.
    pub fn accepts(&self, event: &PlayerEvent) -> bool {
        event
            .session()
            .is_none_or(|session| self.sessions.is_current(session))
    }

    pub fn repeat_label(&self) -> String {
        format!("Repeat: {}", on_off(self.state.repeat))
    }

    pub fn shuffle_label(&self) -> String {
        format!("Shuffle: {}", on_off(self.state.shuffle))
    }

    /// Append tracks for `paths`. Playback is left alone; the first tracks
    /// added to an empty playlist become current.
    pub fn add_tracks<I>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let before = self.playlist.len();
        for path in paths {
            self.playlist.push(Track::new(path));
        }
        let added = self.playlist.len() - before;

        if added > 0 {
            log::info!("added {added} tracks ({} total)", self.playlist.len());
            if self.state.current_index.is_none() {
                self.state.current_index = Some(0);
            }
        }
        added
    }

    /// Make `index` current and play it. Callers only pass rows of the playlist.
    pub fn select(&mut self, index: usize) {
        debug_assert!(index < self.playlist.len(), "select({index}) out of range");
        if index >= self.playlist.len() {
            log::error!(
                "ignoring select({index}) on a playlist of {}",
                self.playlist.len()
            );
            return;
        }
        self.state.current_index = Some(index);
        self.play();
    }

    /// Load and start the current track in a new session.
    pub fn play(&mut self) {
        let Some(track) = self.current_track().cloned() else {
            return;
        };

        let token = self.sessions.begin();
        let started = self
            .engine
            .load(track.path())
            .and_then(|()| self.engine.play());

        if let Err(e) = started {
            log::error!("cannot play {}: {e}", track.path().display());
            self.state.is_playing = false;
            self.notify(PlayerEvent::ProgressReset);
            self.notify(PlayerEvent::Status(format!("Error: {e}")));
            return;
        }

        log::info!("session {} playing {}", token.id(), track.path().display());
        self.state.is_playing = true;
        self.notify(PlayerEvent::ProgressReset);
        self.notify(PlayerEvent::Status(now_playing(&track)));

        if let Some(renderer) = &self.waveform {
            spawn_waveform_job(
                renderer.clone(),
                track.path().to_path_buf(),
                token.clone(),
                self.events.clone(),
            );
        }

        spawn_progress_loop(ProgressJob {
            engine: self.engine.clone(),
            metadata: self.metadata.clone(),
            path: track.path().to_path_buf(),
            token,
            events: self.events.clone(),
            interval: self.progress_interval,
        });
    }

    pub fn pause(&mut self) {
        if !self.engine.is_busy() {
            return;
        }
        self.engine.pause();
        // The track may have run out between the check and the pause; its
        // end is then left to the progress loop.
        if !self.engine.is_paused() {
            return;
        }
        self.state.is_playing = false;
        self.notify(PlayerEvent::Status("Paused".to_string()));
    }

    pub fn resume(&mut self) {
        if !self.engine.is_paused() {
            return;
        }
        self.engine.resume();
        self.state.is_playing = true;
        if let Some(track) = self.current_track() {
            let status = now_playing(track);
            self.notify(PlayerEvent::Status(status));
        }
    }

    /// Pause when playing, resume when paused, otherwise start the current track.
    pub fn toggle_pause(&mut self) {
        if self.engine.is_busy() {
            self.pause();
        } else if self.engine.is_paused() {
            self.resume();
        } else {
            self.play();
        }
    }

    pub fn stop(&mut self) {
        self.sessions.invalidate();
        self.engine.stop();
        self.state.is_playing = false;
        self.notify(PlayerEvent::ProgressReset);
        self.notify(PlayerEvent::Status("Stopped".to_string()));
    }

    pub fn next(&mut self) {
        let len = self.playlist.len();
        if len == 0 {
            return;
        }
        let index = if self.state.shuffle {
            self.rng.gen_range(0..len)
        } else {
            self.state.current_index.map_or(0, |i| (i + 1) % len)
        };
        self.state.current_index = Some(index);
        self.play();
    }

    /// Step back one track, wrapping to the end. Shuffle does not apply.
    pub fn previous(&mut self) {
        let len = self.playlist.len();
        if len == 0 {
            return;
        }
        let index = self.state.current_index.map_or(0, |i| (i + len - 1) % len);
        self.state.current_index = Some(index);
        self.play();
    }

    pub fn toggle_repeat(&mut self) {
        self.state.repeat = !self.state.repeat;
        log::info!("{}", self.repeat_label());
    }

    pub fn toggle_shuffle(&mut self) {
        self.state.shuffle = !self.state.shuffle;
        log::info!("{}", self.shuffle_label());
    }

    /// End-of-track policy: repeat the track, else pick a shuffled one, else stop.
    ///
    /// Ends of superseded sessions are ignored. With both flags off nothing
    /// advances.
    pub fn on_track_end(&mut self, session: SessionId) {
        if !self.sessions.is_current(session) {
            log::debug!("ignoring end of superseded session {session}");
            return;
        }

        self.state.is_playing = false;
        if self.state.repeat {
            self.play();
        } else if self.state.shuffle {
            self.next();
        } else if let Some(track) = self.current_track() {
            let status = format!("Finished: {}", track.name());
            self.notify(PlayerEvent::Status(status));
        }
    }

    fn notify(&self, event: PlayerEvent) {
        if self.events.send(event).is_err() {
            log::debug!("player event dropped: event loop is gone");
        }
    }
}

impl Drop for Sequencer {
    fn drop(&mut self) {
        // Lets background loops of the last session wind down.
        self.sessions.invalidate();
    }
}

fn now_playing(track: &Track) -> String {
    format!("Now playing: {}", track.name())
}

fn on_off(flag: bool) -> &'static str {
    if flag { "On" } else { "Off" }
}
