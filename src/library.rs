//! Playlist entries and the helpers that turn user-supplied paths into them.
//!
//! `Track` is the immutable playlist entry, `expand_paths` resolves files and
//! directories picked by the user, and `MetadataReader` reads track durations.

mod metadata;
mod model;
mod scan;

pub use metadata::{LoftyReader, MetadataError, MetadataReader};
pub use model::Track;
pub use scan::expand_paths;
