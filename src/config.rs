//! Settings: serde types with defaults, loaded from an optional TOML file
//! and `LEGATO__*` environment overrides.

mod load;
mod schema;

pub use schema::*;
