use std::path::Path;
use std::time::Duration;

use lofty::prelude::*;

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("failed to read {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("{0} reports no duration")]
    NoDuration(String),
}

/// Reads the properties the player needs from an audio file.
pub trait MetadataReader: Send + Sync {
    fn duration(&self, path: &Path) -> Result<Duration, MetadataError>;
}

/// `MetadataReader` backed by lofty's tag/property parsers.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyReader;

impl MetadataReader for LoftyReader {
    fn duration(&self, path: &Path) -> Result<Duration, MetadataError> {
        let tagged = lofty::read_from_path(path).map_err(|e| MetadataError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let duration = tagged.properties().duration();
        if duration.is_zero() {
            return Err(MetadataError::NoDuration(path.display().to_string()));
        }
        Ok(duration)
    }
}
