use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::config;
use crate::library::expand_paths;
use crate::sequencer::{PlayerEvent, Sequencer};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Two-key prefix state used for `gg` handling.
    pending_gg: bool,
    /// Two-key prefix state used for `zz` handling.
    pending_zz: bool,
}

/// What the loop should do after a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Main terminal event loop: drains player events, draws, and handles input.
/// Returns `Ok(())` when the user quits.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    sequencer: &mut Sequencer,
    events: &Receiver<PlayerEvent>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        drain_events(events, app, sequencer);

        app.clamp_selection(sequencer.playlist().len());
        app.follow_current(sequencer.state().current_index);

        terminal.draw(|f| ui::draw(f, app, sequencer, &settings.ui))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, sequencer, state) == Flow::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Route pending player events: track ends go back to the sequencer, the rest
/// update the view unless they belong to a superseded session.
pub fn drain_events(events: &Receiver<PlayerEvent>, app: &mut App, sequencer: &mut Sequencer) {
    while let Ok(event) = events.try_recv() {
        match event {
            PlayerEvent::TrackEnded { session } => sequencer.on_track_end(session),
            other => {
                if sequencer.accepts(&other) {
                    app.apply(other);
                }
            }
        }
    }
}

pub fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    sequencer: &mut Sequencer,
    state: &mut EventLoopState,
) -> Flow {
    if app.prompt_open() {
        handle_prompt_key(key, settings, app, sequencer);
        return Flow::Continue;
    }

    let len = sequencer.playlist().len();
    if !matches!(key.code, KeyCode::Char('g')) {
        state.pending_gg = false;
    }
    if !matches!(key.code, KeyCode::Char('z')) {
        state.pending_zz = false;
    }

    match key.code {
        KeyCode::Char('q') => return Flow::Quit,
        KeyCode::Char('a') => app.open_prompt(),
        KeyCode::Char('j') | KeyCode::Down => app.next(len),
        KeyCode::Char('k') | KeyCode::Up => app.prev(len),
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.last(len),
        KeyCode::Char('z') => {
            if state.pending_zz {
                state.pending_zz = false;
                app.jump_to_current();
            } else {
                state.pending_zz = true;
            }
        }
        KeyCode::Enter => {
            if app.selected < len {
                sequencer.select(app.selected);
                app.follow_playback = true;
            }
        }
        KeyCode::Char('p') => sequencer.play(),
        KeyCode::Char(' ') => sequencer.toggle_pause(),
        KeyCode::Char('x') => sequencer.stop(),
        KeyCode::Char('l') | KeyCode::Char('n') => sequencer.next(),
        KeyCode::Char('h') | KeyCode::Char('b') => sequencer.previous(),
        KeyCode::Char('r') => sequencer.toggle_repeat(),
        KeyCode::Char('s') => sequencer.toggle_shuffle(),
        _ => {}
    }

    Flow::Continue
}

fn handle_prompt_key(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    sequencer: &mut Sequencer,
) {
    match key.code {
        KeyCode::Esc => app.cancel_prompt(),
        KeyCode::Backspace => app.pop_prompt_char(),
        KeyCode::Enter => {
            let Some(input) = app.submit_prompt() else {
                return;
            };
            let paths = expand_paths([input.as_str()], &settings.library);
            if paths.is_empty() {
                app.status = format!("Nothing to add from {input}");
                return;
            }
            let added = sequencer.add_tracks(paths);
            app.status = format!("Added {added} tracks");
        }
        KeyCode::Char(c) if !c.is_control() => app.push_prompt_char(c),
        _ => {}
    }
}
