use super::*;
use crate::sequencer::{PlayerEvent, SessionId};
use std::time::Duration;

fn session() -> SessionId {
    SessionId::from_raw(3)
}

#[test]
fn starts_with_no_song_playing() {
    let app = App::new();
    assert_eq!(app.status, "No song playing");
    assert_eq!(app.progress, ProgressView::default());
    assert!(app.waveform.is_none());
    assert!(!app.prompt_open());
}

#[test]
fn status_events_replace_the_status_line() {
    let mut app = App::new();
    app.apply(PlayerEvent::Status("Now playing: a.mp3".into()));
    app.apply(PlayerEvent::Status("Paused".into()));
    assert_eq!(app.status, "Paused");
}

#[test]
fn progress_is_clamped_and_reset() {
    let mut app = App::new();
    app.apply(PlayerEvent::Progress {
        session: session(),
        fraction: 1.2,
        elapsed: Duration::from_secs(61),
        total: Duration::from_secs(60),
    });
    assert_eq!(app.progress.fraction, 1.0);
    assert_eq!(app.progress.total, Some(Duration::from_secs(60)));

    app.apply(PlayerEvent::WaveformReady {
        session: session(),
        image_ref: "waveform.png?t=1".into(),
        columns: vec![0.5],
    });
    app.apply(PlayerEvent::ProgressReset);
    assert_eq!(app.progress, ProgressView::default());
    assert!(app.waveform.is_none());
}

#[test]
fn waveform_failure_leaves_the_view_alone() {
    let mut app = App::new();
    app.apply(PlayerEvent::Status("Now playing: a.mp3".into()));
    app.apply(PlayerEvent::WaveformFailed {
        session: session(),
        reason: "no samples".into(),
    });
    assert_eq!(app.status, "Now playing: a.mp3");
    assert!(app.waveform.is_none());
}

#[test]
fn cursor_wraps_both_ways() {
    let mut app = App::new();
    app.prev(3);
    assert_eq!(app.selected, 2);
    app.next(3);
    assert_eq!(app.selected, 0);
    assert!(!app.follow_playback);

    app.next(0);
    assert_eq!(app.selected, 0);
}

#[test]
fn first_and_last_rows() {
    let mut app = App::new();
    app.last(5);
    assert_eq!(app.selected, 4);
    app.first();
    assert_eq!(app.selected, 0);
    app.last(0);
    assert_eq!(app.selected, 0);
}

#[test]
fn cursor_follows_only_when_current_changes() {
    let mut app = App::new();
    app.follow_current(Some(2));
    assert_eq!(app.selected, 2);

    // user roams away; same current index does not pull the cursor back
    app.next(5);
    app.follow_current(Some(2));
    assert_eq!(app.selected, 3);

    app.follow_current(Some(4));
    assert_eq!(app.selected, 4);
    assert!(app.follow_playback);
}

#[test]
fn jump_to_current_returns_to_the_playing_row() {
    let mut app = App::new();
    app.jump_to_current();
    assert_eq!(app.selected, 0);

    app.follow_current(Some(1));
    app.last(4);
    app.jump_to_current();
    assert_eq!(app.selected, 1);
}

#[test]
fn clamp_selection_after_shrinking() {
    let mut app = App::new();
    app.selected = 7;
    app.clamp_selection(3);
    assert_eq!(app.selected, 2);
    app.clamp_selection(0);
    assert_eq!(app.selected, 0);
}

#[test]
fn prompt_editing_and_submit() {
    let mut app = App::new();
    app.push_prompt_char('x');
    assert!(app.prompt.is_none());

    app.open_prompt();
    for c in " ~/Music/a.flac ".chars() {
        app.push_prompt_char(c);
    }
    app.push_prompt_char('!');
    app.pop_prompt_char();
    assert_eq!(app.submit_prompt().as_deref(), Some("~/Music/a.flac"));
    assert!(!app.prompt_open());
}

#[test]
fn blank_or_cancelled_prompt_yields_nothing() {
    let mut app = App::new();
    app.open_prompt();
    app.push_prompt_char(' ');
    assert_eq!(app.submit_prompt(), None);

    app.open_prompt();
    app.push_prompt_char('a');
    app.cancel_prompt();
    assert_eq!(app.submit_prompt(), None);
}
