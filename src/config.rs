//! User configuration
//!
//! Loaded from `<config_dir>/config.toml` (or JSON, by extension). The
//! `RETRO_DRAW_CONFIG` variable points at an alternative file.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::canvas::{Pen, PreviewMode};
use crate::errors::{Result, RetroError};

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "RETRO_DRAW_CONFIG";

/// Drawing defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default ink index (0-7)
    pub ink: u8,

    /// Default paper index (0-7)
    pub paper: u8,

    /// Default to the bright palette
    pub bright: bool,

    /// Extension used when `render` is given no explicit format
    pub image_format: String,

    /// Terminal preview style
    pub preview: PreviewMode,

    /// Cap on preview width in terminal columns
    pub preview_width: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        let pen = Pen::default();
        Self {
            ink: pen.ink,
            paper: pen.paper,
            bright: pen.palette == 1,
            image_format: "png".to_string(),
            preview: PreviewMode::Auto,
            preview_width: None,
        }
    }
}

impl Config {
    /// Configuration directory
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "retro-draw", "retro-draw").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Path of the config file, honouring `RETRO_DRAW_CONFIG`
    pub fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Default pen built from the configured colors
    pub fn pen(&self) -> Pen {
        Pen::new(self.ink, self.paper, u8::from(self.bright))
    }

    fn validate(&self) -> Result<()> {
        self.pen()
            .validate()
            .map_err(|e| RetroError::Config(format!("default pen: {e}")))?;
        if self.image_format.trim().is_empty() {
            return Err(RetroError::Config("image_format must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Load configuration from the default location
pub fn load_config() -> Result<Config> {
    match Config::config_path() {
        Some(path) => load_config_from(&path),
        None => Ok(Config::default()),
    }
}

/// Load configuration from a file; a missing file yields defaults
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!("No config at {:?}, using defaults", path);
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| RetroError::Config(format!("Failed to read config: {e}")))?;

    // TOML unless the file says JSON
    let config: Config = if path.extension().is_some_and(|e| e == "json") {
        serde_json::from_str(&content)
            .map_err(|e| RetroError::Config(format!("Invalid JSON config: {e}")))?
    } else {
        toml::from_str(&content).map_err(|e| RetroError::Config(format!("Invalid TOML config: {e}")))?
    };

    config.validate()?;
    debug!("Loaded config from {:?}", path);
    Ok(config)
}

/// Save configuration to a file
pub fn save_config_to(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| RetroError::Config(format!("Failed to create config dir: {e}")))?;
    }

    let content = if path.extension().is_some_and(|e| e == "json") {
        serde_json::to_string_pretty(config)
            .map_err(|e| RetroError::Config(format!("Failed to serialize config: {e}")))?
    } else {
        toml::to_string_pretty(config)
            .map_err(|e| RetroError::Config(format!("Failed to serialize config: {e}")))?
    };

    fs::write(path, content).map_err(|e| RetroError::Config(format!("Failed to write config: {e}")))?;

    Ok(())
}
