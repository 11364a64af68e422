use std::time::Duration;

use super::session::SessionId;

/// Notifications flowing from the sequencer and its background work to the
/// event loop that owns the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Status line text ("Now playing: …", "Paused", "Error: …").
    Status(String),
    /// Periodic position report for the playing track.
    Progress {
        session: SessionId,
        fraction: f64,
        elapsed: Duration,
        total: Duration,
    },
    /// Progress goes back to zero (stop, or a new track starting).
    ProgressReset,
    /// The engine ran out of audio for this session.
    TrackEnded { session: SessionId },
    /// A thumbnail for this session's track was written.
    WaveformReady {
        session: SessionId,
        /// Image path with a `?t=<millis>` suffix so viewers reload it.
        image_ref: String,
        columns: Vec<f32>,
    },
    /// Thumbnail generation failed; diagnostic only.
    WaveformFailed { session: SessionId, reason: String },
}

impl PlayerEvent {
    /// The session the event belongs to, if it is session-scoped.
    pub fn session(&self) -> Option<SessionId> {
        match self {
            Self::Progress { session, .. }
            | Self::TrackEnded { session }
            | Self::WaveformReady { session, .. }
            | Self::WaveformFailed { session, .. } => Some(*session),
            Self::Status(_) | Self::ProgressReset => None,
        }
    }
}

/// `elapsed / total`, clamped to 0..=1. A zero total reports no progress.
pub fn progress_fraction(elapsed: Duration, total: Duration) -> f64 {
    if total.is_zero() {
        return 0.0;
    }
    (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_fraction_is_clamped() {
        let total = Duration::from_secs(200);
        assert_eq!(progress_fraction(Duration::from_secs(50), total), 0.25);
        assert_eq!(progress_fraction(Duration::from_secs(500), total), 1.0);
        assert_eq!(progress_fraction(Duration::from_secs(5), Duration::ZERO), 0.0);
    }
}
