//! Persisted colour theme preference.

use std::{fmt, fs, path::PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

const PREFERENCES_FILE: &str = "preferences.toml";

/// Colour theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light background (default).
    #[default]
    Light,
    /// Dark background.
    Dark,
}

impl Theme {
    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Value stored under the `theme` key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferencesFile {
    #[serde(default)]
    theme: Option<Theme>,
}

/// Reads and writes the theme preference under the fixed `theme` key.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    /// Preference file at an explicit location.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Preference file next to the default configuration file.
    #[must_use]
    pub fn default_location() -> Option<Self> {
        crate::config::default_config_path()
            .and_then(|config| config.parent().map(|dir| Self::new(dir.join(PREFERENCES_FILE))))
    }

    /// Stored theme, or [`Theme::Light`] when nothing usable is stored.
    #[must_use]
    pub fn load_theme(&self) -> Theme {
        match self.read() {
            Ok(prefs) => prefs.theme.unwrap_or_default(),
            Err(err) => {
                warn!("ignoring unreadable preferences {}: {err:#}", self.path.display());
                Theme::default()
            }
        }
    }

    /// Persist `theme`.
    ///
    /// # Errors
    /// Returns an error when the file or its directory cannot be written.
    pub fn save_theme(&self, theme: Theme) -> Result<()> {
        let prefs = PreferencesFile { theme: Some(theme) };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let contents = toml::to_string(&prefs)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }

    /// Flip the stored theme and return the new value.
    ///
    /// # Errors
    /// Returns an error when the new theme cannot be saved.
    pub fn toggle_theme(&self) -> Result<Theme> {
        let theme = self.load_theme().toggled();
        self.save_theme(theme)?;
        Ok(theme)
    }

    fn read(&self) -> Result<PreferencesFile> {
        if !self.path.exists() {
            return Ok(PreferencesFile::default());
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&contents)?)
    }
}
