use std::env;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::library::LoftyReader;
use crate::sequencer::{Collaborators, PlayerEvent, Sequencer};
use crate::waveform::{PngWaveform, WaveformRenderer};

mod event_loop;
mod logging;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    if let Err(e) = logging::init_logging(&settings.log) {
        eprintln!("legato: logging disabled: {e}");
    }

    let args: Vec<String> = env::args().skip(1).collect();

    let audio_player = Arc::new(AudioPlayer::new());
    let (events_tx, events_rx) = mpsc::channel::<PlayerEvent>();
    let collaborators = Collaborators {
        engine: audio_player.clone(),
        metadata: Arc::new(LoftyReader),
        waveform: PngWaveform::from_settings(&settings.waveform)
            .map(|w| Arc::new(w) as Arc<dyn WaveformRenderer>),
    };
    let mut sequencer = Sequencer::new(
        collaborators,
        events_tx,
        Duration::from_millis(settings.playback.progress_interval_ms),
    );
    startup::apply_playback_defaults(&mut sequencer, &settings, &args);

    let mut app = App::new();

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &mut sequencer,
            &events_rx,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    drop(sequencer);
    audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
    log::info!("bye");

    run_result
}
