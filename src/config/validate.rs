// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile, WatchSettings};
use crate::errors::{Result, WatchmuxError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = WatchmuxError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_watch_settings(&raw.watch)?;
        Ok(ConfigFile::new_unchecked(raw.watch))
    }
}

pub fn validate_watch_settings(settings: &WatchSettings) -> Result<()> {
    if settings.project_markers.is_empty() {
        return Err(WatchmuxError::ConfigError(
            "[watch].project_markers must name at least one file".to_string(),
        ));
    }

    for marker in settings.project_markers.iter() {
        if marker.trim().is_empty() || marker == "." || marker == ".." {
            return Err(WatchmuxError::ConfigError(format!(
                "invalid project marker '{}'",
                marker
            )));
        }
        if marker.contains(|c: char| c == '/' || c == '\\') {
            return Err(WatchmuxError::ConfigError(format!(
                "project marker '{}' must be a bare file name",
                marker
            )));
        }
    }
    Ok(())
}
