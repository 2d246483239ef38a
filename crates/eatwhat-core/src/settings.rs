//! Per-user client settings, read once at startup and passed by value.
//!
//! Nothing here is global: callers load a [`Settings`] value, hand it to the
//! components that need it, and write changes back with [`save_settings`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::SettingsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapTheme {
    #[default]
    Standard,
    Dark,
    Retro,
    Satellite,
    Hybrid,
    Silver,
    Aubergine,
}

impl MapTheme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MapTheme::Standard => "standard",
            MapTheme::Dark => "dark",
            MapTheme::Retro => "retro",
            MapTheme::Satellite => "satellite",
            MapTheme::Hybrid => "hybrid",
            MapTheme::Silver => "silver",
            MapTheme::Aubergine => "aubergine",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Whether the first-run welcome has been dismissed.
    pub seen_welcome: bool,
    /// Wheel tick volume, 0.0 (silent) to 1.0.
    pub wheel_volume: f64,
    pub map_theme: MapTheme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seen_welcome: false,
            wheel_volume: 0.5,
            map_theme: MapTheme::Standard,
        }
    }
}

impl Settings {
    #[must_use]
    pub fn with_welcome_seen(self) -> Self {
        Self {
            seen_welcome: true,
            ..self
        }
    }

    #[must_use]
    pub fn with_map_theme(self, map_theme: MapTheme) -> Self {
        Self { map_theme, ..self }
    }

    #[must_use]
    pub fn with_wheel_volume(self, wheel_volume: f64) -> Self {
        Self {
            wheel_volume: wheel_volume.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Volume clamped into `0.0..=1.0`.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.wheel_volume.clamp(0.0, 1.0)
    }
}

/// Loads settings from a YAML file. A missing file yields the defaults.
///
/// # Errors
///
/// Returns `SettingsError` if the file exists but cannot be read or parsed.
pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(e) => {
            return Err(SettingsError::Io {
                path: path.display().to_string(),
                source: e,
            })
        }
    };

    if content.trim().is_empty() {
        return Ok(Settings::default());
    }

    Ok(serde_yaml::from_str(&content)?)
}

/// Writes settings as YAML, creating parent directories as needed.
///
/// # Errors
///
/// Returns `SettingsError` if serialization or the write fails.
pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    let io_err = |source: std::io::Error| SettingsError::Io {
        path: path.display().to_string(),
        source,
    };
    let yaml = serde_yaml::to_string(settings)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, yaml).map_err(io_err)
}
