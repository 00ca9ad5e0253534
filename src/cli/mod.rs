//! Command-line interface for profile-manager.
//!
//! This module handles argument parsing and wiring the concrete store and
//! component manager together. Subcommand implementations live in the
//! [`commands`] submodule and run against any [`ProfileManager`].

pub mod commands;

use crate::components::CommandComponentManager;
use crate::config::AppConfig;
use crate::settings_file::SettingsFile;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use profile_manager_core::{ProfileManager, ProfilePath};
use std::path::PathBuf;

/// profile-manager - Save and restore editor settings and extensions as named profiles
#[derive(Parser, Debug)]
#[command(name = "profile-manager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Application config file (default: <config dir>/profile-manager/config.yaml)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Live settings file (overrides settings_path from the config)
    #[arg(long, value_name = "FILE", global = true)]
    pub settings: Option<PathBuf>,

    /// Set debug log level (overrides config and RUST_LOG)
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevelArg>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Save the current settings and extensions as a profile
    Save {
        /// Dotted path of the profile to create (its parent must exist)
        #[arg(
            value_name = "NAME",
            required_unless_present_any = ["update", "child"],
            conflicts_with_all = ["update", "child"]
        )]
        name: Option<ProfilePath>,

        /// Re-save the active profile
        #[arg(long, conflicts_with = "child")]
        update: bool,

        /// Save as a child of the active profile
        #[arg(long, value_name = "NAME")]
        child: Option<String>,
    },

    /// Apply a profile's settings and extensions
    Load {
        /// Dotted profile path
        #[arg(value_name = "PATH")]
        path: ProfilePath,
    },

    /// Print a profile's effective settings and extensions as JSON
    Show {
        /// Dotted profile path
        #[arg(value_name = "PATH")]
        path: ProfilePath,
    },

    /// List all profiles, marking the active one
    List,

    /// Exit with status 0 if the profile exists, 1 otherwise
    Exists {
        /// Dotted profile path
        #[arg(value_name = "PATH")]
        path: ProfilePath,
    },

    /// Print the active profile
    Active,
}

/// Process exit codes.
pub mod exit {
    pub const SUCCESS: i32 = 0;
    /// Command ran but reported a negative result or partial failure.
    pub const FAILURE: i32 = 1;
}

/// Load the app config, build the collaborators and run the command.
///
/// Returns the process exit code.
pub fn run(cli: Cli) -> Result<i32> {
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .context("Failed to load profile-manager config")?;
    crate::debug::apply_config_level(config.log_level.to_level_filter());

    let settings_path = cli
        .settings
        .clone()
        .unwrap_or_else(|| config.settings_path.clone());
    log::info!("Settings file: {:?}", settings_path);

    let mut manager = ProfileManager::new(
        SettingsFile::new(settings_path),
        CommandComponentManager::from_config(&config),
    );
    let stdout = std::io::stdout();
    commands::execute(&cli.command, &mut manager, &mut stdout.lock())
}
