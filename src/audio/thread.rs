use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStreamBuilder, Sink};

use super::engine::AudioError;
use super::sink::create_sink;
use super::types::{AudioCmd, PlaybackHandle, Reply};

/// How often the shared playback snapshot is refreshed while idle.
const TICK: Duration = Duration::from_millis(50);

pub(super) fn spawn_audio_thread(rx: Receiver<AudioCmd>, playback_info: PlaybackHandle) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                log::error!("no audio output device: {e}");
                serve_without_device(&rx, &e.to_string());
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let mut sink: Option<Sink> = None;

        loop {
            let (reply, result): (Option<Reply>, Result<(), AudioError>) =
                match rx.recv_timeout(TICK) {
                    Ok(AudioCmd::Load(path, reply)) => {
                        if let Some(old) = sink.take() {
                            old.stop();
                        }
                        let result = create_sink(&stream, &path).map(|new_sink| {
                            log::debug!("loaded {}", path.display());
                            sink = Some(new_sink);
                        });
                        (Some(reply), result)
                    }
                    Ok(AudioCmd::Play(reply)) => {
                        let result = match sink.as_ref() {
                            Some(s) => {
                                s.play();
                                Ok(())
                            }
                            None => Err(AudioError::NothingLoaded),
                        };
                        (Some(reply), result)
                    }
                    Ok(AudioCmd::Pause(reply)) => {
                        if let Some(s) = sink.as_ref() {
                            s.pause();
                        }
                        (Some(reply), Ok(()))
                    }
                    Ok(AudioCmd::Resume(reply)) => {
                        if let Some(s) = sink.as_ref() {
                            s.play();
                        }
                        (Some(reply), Ok(()))
                    }
                    Ok(AudioCmd::Stop(reply)) => {
                        if let Some(s) = sink.take() {
                            s.stop();
                        }
                        (Some(reply), Ok(()))
                    }
                    Ok(AudioCmd::Quit { fade_out }) => {
                        if let Some(s) = sink.take() {
                            // Fade out gently before stopping.
                            if !s.is_paused() {
                                fade_out_sink(&s, fade_out);
                            }
                            s.stop();
                        }
                        publish(&playback_info, None);
                        break;
                    }
                    Err(RecvTimeoutError::Timeout) => (None, Ok(())),
                    Err(RecvTimeoutError::Disconnected) => break,
                };

            // Publish before answering so the caller observes the new state.
            publish(&playback_info, sink.as_ref());
            if let Some(reply) = reply {
                let _ = reply.send(result);
            }
        }
    })
}

/// Refresh the shared snapshot from the current sink.
pub(super) fn publish(playback_info: &PlaybackHandle, sink: Option<&Sink>) {
    let (busy, paused, elapsed) = match sink {
        Some(s) if !s.empty() => (!s.is_paused(), s.is_paused(), s.get_pos()),
        Some(s) => (false, false, s.get_pos()),
        None => (false, false, Duration::ZERO),
    };

    if let Ok(mut info) = playback_info.lock() {
        info.busy = busy;
        info.paused = paused;
        info.elapsed = elapsed;
    }
}

/// Answer every request with an error until the player is dropped or quits.
fn serve_without_device(rx: &Receiver<AudioCmd>, reason: &str) {
    while let Ok(cmd) = rx.recv() {
        let reply = match cmd {
            AudioCmd::Load(_, reply)
            | AudioCmd::Play(reply)
            | AudioCmd::Pause(reply)
            | AudioCmd::Resume(reply)
            | AudioCmd::Stop(reply) => reply,
            AudioCmd::Quit { .. } => break,
        };
        let _ = reply.send(Err(AudioError::NoDevice(reason.to_string())));
    }
}

const FADE_STEPS: u32 = 20;

/// Sleep between volume steps of a fade lasting `fade_out`.
pub(super) fn fade_step(fade_out: Duration) -> Duration {
    (fade_out / FADE_STEPS).max(Duration::from_millis(1))
}

fn fade_out_sink(sink: &Sink, fade_out: Duration) {
    if fade_out.is_zero() {
        sink.set_volume(0.0);
        return;
    }
    let step = fade_step(fade_out);
    let start = sink.volume();
    for i in 1..=FADE_STEPS {
        let t = i as f32 / FADE_STEPS as f32;
        sink.set_volume(start * (1.0 - t));
        thread::sleep(step);
    }
    sink.set_volume(0.0);
}
