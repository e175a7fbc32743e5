use watchmux::config::{ConfigFile, RawConfigFile, WatchSettings};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts with no project markers; add at least one before `build()`.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                watch: WatchSettings {
                    project_markers: Vec::new(),
                    case_sensitive: None,
                },
            },
        }
    }

    pub fn with_marker(mut self, marker: &str) -> Self {
        self.config.watch.project_markers.push(marker.to_string());
        self
    }

    pub fn case_sensitive(mut self, val: bool) -> Self {
        self.config.watch.case_sensitive = Some(val);
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }

    /// Shortcut for the `[watch]` section of the built config.
    pub fn settings(self) -> WatchSettings {
        self.build().watch
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
