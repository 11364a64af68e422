//! Audio playback: the `AudioEngine` seam the sequencer drives, and the
//! rodio-backed `AudioPlayer` that implements it on a dedicated thread.

mod engine;
mod player;
mod sink;
mod thread;
mod types;

pub use engine::{AudioEngine, AudioError};
pub use player::AudioPlayer;

#[cfg(test)]
mod tests;
