//! Guidance settings loading
//!
//! Settings are read from a TOML file owned by the front end. The engine
//! never writes them back. A missing file yields the defaults.

use std::path::{Path, PathBuf};

use guidance_types::GuidanceSettings;

use crate::error::SettingsError;

/// Default settings location: `~/.config/guidance/settings.toml` (or platform equivalent)
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("guidance").join("settings.toml"))
}

/// Load settings from a TOML file
pub fn load_settings(path: &Path) -> Result<GuidanceSettings, SettingsError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No settings file, using defaults");
        return Ok(GuidanceSettings::default());
    }

    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_settings(&content).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse settings from TOML text; absent keys take their defaults
pub fn parse_settings(content: &str) -> Result<GuidanceSettings, toml::de::Error> {
    toml::from_str(content)
}
