//! View-model types: `App`, `ProgressView` and `WaveformView`.
//!
//! The `App` struct holds everything the UI shows that does not live in the
//! sequencer: the list cursor, the last status line, progress, the waveform
//! thumbnail and the add prompt.

use std::time::Duration;

use crate::sequencer::PlayerEvent;

/// Last published progress of the current track.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProgressView {
    pub fraction: f64,
    pub elapsed: Duration,
    pub total: Option<Duration>,
}

/// Thumbnail of the current track.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveformView {
    pub image_ref: String,
    pub columns: Vec<f32>,
}

/// The main view model.
pub struct App {
    pub selected: usize,
    pub follow_playback: bool,
    pub status: String,
    pub progress: ProgressView,
    pub waveform: Option<WaveformView>,
    /// Text typed into the add prompt, `Some` while the prompt is open.
    pub prompt: Option<String>,
    last_current: Option<usize>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            selected: 0,
            follow_playback: true,
            status: "No song playing".to_string(),
            progress: ProgressView::default(),
            waveform: None,
            prompt: None,
            last_current: None,
        }
    }

    /// Fold a sequencer notification into the view.
    ///
    /// Callers filter out events of superseded sessions first.
    pub fn apply(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::Status(text) => self.status = text,
            PlayerEvent::Progress {
                fraction,
                elapsed,
                total,
                ..
            } => {
                self.progress = ProgressView {
                    fraction: fraction.clamp(0.0, 1.0),
                    elapsed,
                    total: Some(total),
                };
            }
            PlayerEvent::ProgressReset => {
                self.progress = ProgressView::default();
                self.waveform = None;
            }
            PlayerEvent::WaveformReady {
                image_ref, columns, ..
            } => {
                self.waveform = Some(WaveformView { image_ref, columns });
            }
            PlayerEvent::WaveformFailed { .. } | PlayerEvent::TrackEnded { .. } => {}
        }
    }

    /// Move the cursor onto the current track when that track changes.
    pub fn follow_current(&mut self, current: Option<usize>) {
        if current == self.last_current {
            return;
        }
        self.last_current = current;
        if let Some(idx) = current {
            self.follow_playback = true;
            self.selected = idx;
        }
    }

    /// Keep the cursor on a row after the playlist length changed.
    pub fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// Move the cursor down one row, wrapping to the top.
    pub fn next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.follow_playback = false;
        self.selected = (self.selected + 1) % len;
    }

    /// Move the cursor up one row, wrapping to the bottom.
    pub fn prev(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.follow_playback = false;
        self.selected = (self.selected + len - 1) % len;
    }

    pub fn first(&mut self) {
        self.follow_playback = false;
        self.selected = 0;
    }

    pub fn last(&mut self, len: usize) {
        self.follow_playback = false;
        self.selected = len.saturating_sub(1);
    }

    /// Put the cursor back on the current track (`zz`).
    pub fn jump_to_current(&mut self) {
        if let Some(idx) = self.last_current {
            self.follow_playback = true;
            self.selected = idx;
        }
    }

    pub fn open_prompt(&mut self) {
        self.prompt = Some(String::new());
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    pub fn push_prompt_char(&mut self, c: char) {
        if let Some(p) = self.prompt.as_mut() {
            p.push(c);
        }
    }

    pub fn pop_prompt_char(&mut self) {
        if let Some(p) = self.prompt.as_mut() {
            p.pop();
        }
    }

    /// Close the prompt and return what was typed, if anything.
    pub fn submit_prompt(&mut self) -> Option<String> {
        self.prompt
            .take()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
    }

    pub fn prompt_open(&self) -> bool {
        self.prompt.is_some()
    }
}
