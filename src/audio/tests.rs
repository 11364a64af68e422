use super::thread::{fade_step, publish};
use super::types::{PlaybackHandle, PlaybackInfo};
use super::{AudioEngine, AudioError, AudioPlayer};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[test]
fn publish_without_sink_reports_idle() {
    let handle: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo {
        busy: true,
        paused: true,
        elapsed: Duration::from_secs(42),
    }));

    publish(&handle, None);

    let info = handle.lock().unwrap();
    assert!(!info.busy);
    assert!(!info.paused);
    assert_eq!(info.elapsed, Duration::ZERO);
}

// Works with or without an output device: either the device is missing or
// the file is, and both must come back as errors rather than panics.
#[test]
fn loading_a_missing_file_is_an_error_not_a_panic() {
    let player = AudioPlayer::new();

    let err = player
        .load(Path::new("/nonexistent/legato/missing.mp3"))
        .unwrap_err();
    assert!(matches!(
        err,
        AudioError::Open { .. } | AudioError::NoDevice(_)
    ));
    assert!(!player.is_busy());
    assert!(!player.is_paused());

    player.quit_softly(Duration::ZERO);
}

#[test]
fn play_without_load_never_reports_busy() {
    let player = AudioPlayer::new();

    assert!(player.play().is_err());
    player.pause();
    player.stop();
    assert!(!player.is_busy());
    assert_eq!(player.elapsed(), Duration::ZERO);

    player.quit_softly(Duration::ZERO);
}

#[test]
fn requests_after_quit_report_disconnected() {
    let player = AudioPlayer::new();
    player.quit_softly(Duration::ZERO);

    assert!(matches!(player.play(), Err(AudioError::Disconnected)));
}

#[test]
fn fade_steps_keep_long_fades_intact() {
    assert_eq!(fade_step(Duration::from_millis(300)), Duration::from_millis(15));
    assert_eq!(fade_step(Duration::from_millis(5)), Duration::from_millis(1));
    // a fade longer than u64 milliseconds is not cut down to a short one
    assert_eq!(fade_step(Duration::MAX), Duration::MAX / 20);
}

#[test]
fn quit_with_an_enormous_fade_and_nothing_loaded_returns() {
    let player = AudioPlayer::new();
    player.quit_softly(Duration::MAX);

    assert!(matches!(player.load(Path::new("/nope.mp3")), Err(AudioError::Disconnected)));
}
