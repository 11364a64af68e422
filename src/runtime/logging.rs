use std::env;
use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

use simplelog::{Config, WriteLogger};

use crate::config::{LogLevelSetting, LogSettings};

pub fn log_path(settings: &LogSettings) -> PathBuf {
    settings
        .file
        .clone()
        .unwrap_or_else(|| env::temp_dir().join("legato.log"))
}

/// File logger; stdout belongs to the terminal UI.
pub fn init_logging(settings: &LogSettings) -> Result<(), Box<dyn Error>> {
    if settings.level == LogLevelSetting::Off {
        return Ok(());
    }

    let path = log_path(settings);
    WriteLogger::init(
        settings.level.to_level_filter(),
        Config::default(),
        File::create(&path)?,
    )?;
    log::info!("legato {} logging to {}", env!("CARGO_PKG_VERSION"), path.display());
    Ok(())
}
