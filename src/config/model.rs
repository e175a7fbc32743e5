// src/config/model.rs

use serde::Deserialize;

use crate::watch::DEFAULT_PROJECT_MARKER;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [watch]
/// project_markers = ["package.json", "Cargo.toml"]
/// case_sensitive = false
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSettings,
}

/// `[watch]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSettings {
    /// File names whose presence marks a directory as a project root.
    /// Subscriptions are rooted at the nearest such directory.
    #[serde(default = "default_project_markers")]
    pub project_markers: Vec<String>,

    /// Overrides the filesystem's own answer about case sensitivity.
    #[serde(default)]
    pub case_sensitive: Option<bool>,
}

fn default_project_markers() -> Vec<String> {
    vec![DEFAULT_PROJECT_MARKER.to_string()]
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            project_markers: default_project_markers(),
            case_sensitive: None,
        }
    }
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub watch: WatchSettings,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(watch: WatchSettings) -> Self {
        Self { watch }
    }
}
