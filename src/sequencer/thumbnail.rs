//! Fire-and-forget waveform rendering for a freshly started track.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::waveform::{WaveformError, WaveformRenderer};

use super::events::PlayerEvent;
use super::session::SessionToken;

/// Render the thumbnail for `audio` on its own thread. Once `token` goes
/// stale the image on disk is left alone and nothing is reported.
pub(super) fn spawn_waveform_job(
    renderer: Arc<dyn WaveformRenderer>,
    audio: PathBuf,
    token: SessionToken,
    events: Sender<PlayerEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let session = token.id();
        let event = match renderer.render(&audio, &|| token.is_current()) {
            Ok(waveform) => PlayerEvent::WaveformReady {
                session,
                image_ref: cache_busted(&waveform.image),
                columns: waveform.columns,
            },
            Err(WaveformError::Superseded(_)) => {
                log::debug!("dropping waveform for {}: track changed", audio.display());
                return;
            }
            Err(e) => {
                log::warn!("waveform for {} failed: {e}", audio.display());
                PlayerEvent::WaveformFailed {
                    session,
                    reason: e.to_string(),
                }
            }
        };
        let _ = events.send(event);
    })
}

/// `path?t=<unix millis>`, so a viewer caching by reference reloads the new image.
fn cache_busted(image: &Path) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("{}?t={millis}", image.display())
}
