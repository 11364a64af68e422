//! Per-session progress polling.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::audio::AudioEngine;
use crate::library::MetadataReader;

use super::events::{PlayerEvent, progress_fraction};
use super::session::SessionToken;

pub(super) struct ProgressJob {
    pub engine: Arc<dyn AudioEngine>,
    pub metadata: Arc<dyn MetadataReader>,
    pub path: PathBuf,
    pub token: SessionToken,
    pub events: Sender<PlayerEvent>,
    pub interval: Duration,
}

pub(super) fn spawn_progress_loop(job: ProgressJob) -> JoinHandle<()> {
    thread::spawn(move || job.run())
}

impl ProgressJob {
    fn run(self) {
        // Without a duration there is no fraction to show, but the loop still
        // has to notice the end of the track.
        let total = match self.metadata.duration(&self.path) {
            Ok(total) => Some(total),
            Err(e) => {
                log::debug!("no progress for {}: {e}", self.path.display());
                None
            }
        };
        let session = self.token.id();

        loop {
            if !self.token.is_current() {
                return;
            }

            if self.engine.is_busy() {
                if let Some(total) = total {
                    let elapsed = self.engine.elapsed();
                    let event = PlayerEvent::Progress {
                        session,
                        fraction: progress_fraction(elapsed, total),
                        elapsed,
                        total,
                    };
                    if self.events.send(event).is_err() {
                        return;
                    }
                }
            } else if !self.engine.is_paused() {
                // Neither playing nor paused: the track ran out.
                if self.token.is_current() {
                    log::debug!("session {session} reached the end of {}", self.path.display());
                    let _ = self.events.send(PlayerEvent::TrackEnded { session });
                }
                return;
            }

            thread::sleep(self.interval);
        }
    }
}
