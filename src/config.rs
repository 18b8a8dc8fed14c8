use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::report::{ExportOptions, DEFAULT_FILE_NAME, DEFAULT_TITLE};
use crate::sheet::Session;

const APP_NAME: &str = "feature-sheet";
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_PORT: u16 = 17010;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Port the HTTP API listens on (bound to 127.0.0.1).
    pub port: u16,
    /// File name offered for the exported report.
    pub file_name: String,
    /// Title printed at the top of the report. `null` omits it.
    pub report_title: Option<String>,
    /// Logo drawn on the first page of the report.
    pub logo_path: Option<PathBuf>,
    /// Whether stale indices are reported as errors (`true`) or ignored.
    /// Unset means strict in debug builds and lenient in release builds.
    pub strict_indices: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            file_name: DEFAULT_FILE_NAME.to_string(),
            report_title: Some(DEFAULT_TITLE.to_string()),
            logo_path: None,
            strict_indices: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the user's config directory.
    /// Returns default config if file doesn't exist or fails to parse.
    pub fn load() -> Self {
        match get_config_path() {
            Ok(path) => Self::load_from(&path),
            Err(e) => {
                tracing::warn!("Failed to locate config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit path, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;

        let config = serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save the current configuration to disk.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Write the default configuration to `path`.
    ///
    /// An existing file is left alone unless `force` is set.
    pub fn init_at(path: &Path, force: bool) -> Result<Self> {
        if path.exists() && !force {
            anyhow::bail!("Config file already exists: {}", path.display());
        }
        let config = Self::default();
        config.save_to(path)?;
        tracing::info!(path = %path.display(), "wrote default config");
        Ok(config)
    }

    pub fn strict_indices(&self) -> bool {
        self.strict_indices
            .unwrap_or_else(Session::default_strictness)
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            file_name: self.file_name.clone(),
            title: self.report_title.clone(),
            logo: self.logo_path.clone(),
        }
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}
