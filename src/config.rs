//! Application configuration for profile-manager.
//!
//! Stored as YAML at `<config_dir>/profile-manager/config.yaml`. Missing
//! fields take their defaults, and a missing file is created with defaults on
//! first load. Saves are atomic (temp file + rename).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Log level as written in the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Command lines used to drive the editor's component manager.
///
/// Each line is split like a POSIX shell would split it. `{id}` in an
/// argument is replaced by the component identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentCommands {
    pub list: String,
    pub install: String,
    pub uninstall: String,
}

impl Default for ComponentCommands {
    fn default() -> Self {
        Self {
            list: "code --list-extensions".to_string(),
            install: "code --install-extension {id}".to_string(),
            uninstall: "code --uninstall-extension {id}".to_string(),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Live settings file holding user settings and the profile envelope.
    pub settings_path: PathBuf,
    pub component_commands: ComponentCommands,
    /// Components shipped with the editor; never listed as installed.
    pub builtin_components: Vec<String>,
    /// This tool's own component identifier, if it is installed as one.
    pub self_id: Option<String>,
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            settings_path: Self::default_settings_path(),
            component_commands: ComponentCommands::default(),
            builtin_components: Vec::new(),
            self_id: None,
            log_level: LogLevel::default(),
        }
    }
}

impl AppConfig {
    /// Load from the default location, creating it when missing.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path`, creating it with defaults when missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        log::info!("Config path: {:?}", path);

        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {:?}", path))?;
            if contents.trim().is_empty() {
                return Ok(Self::default());
            }
            let config: AppConfig = serde_yaml_ng::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {:?}", path))?;
            Ok(config)
        } else {
            log::info!("Config file not found, creating default at {:?}", path);
            let config = Self::default();
            if let Err(e) = config.save_to(path) {
                log::error!("Failed to save default config: {}", e);
                return Err(e);
            }
            Ok(config)
        }
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let yaml = serde_yaml_ng::to_string(self).context("Failed to serialize config")?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml)
            .with_context(|| format!("Failed to write config file {:?}", temp_path))?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to replace config file {:?}", path))?;

        Ok(())
    }

    /// Configuration directory (`<config_dir>/profile-manager`).
    pub fn config_dir() -> PathBuf {
        match dirs::config_dir() {
            Some(dir) => dir.join("profile-manager"),
            None => PathBuf::from("."),
        }
    }

    /// Configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// The editor's user settings file for this platform.
    pub fn default_settings_path() -> PathBuf {
        match dirs::config_dir() {
            Some(dir) => dir.join("Code").join("User").join("settings.json"),
            None => PathBuf::from("settings.json"),
        }
    }
}
