use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use tasklist_core::FilterCriteria;

use crate::filter_util::CriteriaBuilder;

const CONFIG_DIR: &str = "tasklist";
const CONFIG_FILE: &str = "config.toml";

/// Default location of the configuration file (`<config_dir>/tasklist/config.toml`).
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Start-up behaviour.
    #[serde(default)]
    pub startup: StartupConfig,
    /// Initial filter and sort criteria.
    #[serde(default)]
    pub view: ViewConfig,
    /// Export destination.
    #[serde(default)]
    pub export: ExportConfig,
}

impl AppConfig {
    /// Load configuration from the default location, falling back to defaults.
    ///
    /// # Errors
    /// Returns an error when an existing file cannot be read or parsed.
    pub fn load_default() -> Result<Self> {
        match default_config_path() {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from `path`. A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    /// Returns an error on malformed TOML or unknown view tokens.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.view.criteria().map(|_| ())
    }

    /// Initial filter criteria.
    ///
    /// # Errors
    /// Returns an error when a view token is unknown.
    pub fn initial_criteria(&self) -> Result<FilterCriteria> {
        self.view.criteria()
    }
}

/// `[startup]` block.
#[derive(Debug, Clone, Deserialize)]
pub struct StartupConfig {
    /// Seed the store with the sample tasks.
    #[serde(default = "default_true")]
    pub sample_data: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self { sample_data: true }
    }
}

const fn default_true() -> bool {
    true
}

/// `[view]` block: initial criteria as user-facing tokens.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ViewConfig {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    sort: Option<String>,
}

impl ViewConfig {
    fn criteria(&self) -> Result<FilterCriteria> {
        let builder = CriteriaBuilder::new()
            .with_status(self.status.as_deref())
            .and_then(|builder| builder.with_priority(self.priority.as_deref()))
            .and_then(|builder| builder.with_sort(self.sort.as_deref()))
            .map_err(|err| anyhow!("[view] {}", err.describe_user_facing()))?;
        Ok(builder.build())
    }
}

/// `[export]` block.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Directory export files are written to.
    #[serde(default = "default_export_dir")]
    pub dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
        }
    }
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}
