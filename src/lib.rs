// Library exports for testing and potential library use
//
// The profile engine lives in `profile-manager-core`; this crate adds the
// concrete collaborators (settings file, command-driven extensions), the
// application config, logging and the CLI.

/// Application version (root crate version).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod debug;

pub mod cli;
pub mod components;
pub mod config;
pub mod settings_file;
