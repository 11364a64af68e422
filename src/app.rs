//! Application module: exposes the view model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the list cursor, the status
//! line, progress and waveform state folded from `PlayerEvent`s.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
