use crate::config;
use crate::library::expand_paths;
use crate::sequencer::Sequencer;

/// Apply configured repeat/shuffle and add the command-line paths.
pub fn apply_playback_defaults(
    sequencer: &mut Sequencer,
    settings: &config::Settings,
    args: &[String],
) {
    if settings.playback.repeat != sequencer.state().repeat {
        sequencer.toggle_repeat();
    }
    if settings.playback.shuffle != sequencer.state().shuffle {
        sequencer.toggle_shuffle();
    }

    if !args.is_empty() {
        let added = sequencer.add_tracks(expand_paths(args, &settings.library));
        log::info!("{added} tracks from the command line");
    }
}
