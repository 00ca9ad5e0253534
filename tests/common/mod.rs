//! Shared integration test helpers for profile-manager.
//!
//! Include this module at the top of each test file that needs it:
//!
//! ```ignore
//! mod common;
//! use common::{memory_manager, settings, path};
//! ```
//!
//! The `#![allow(dead_code)]` attribute suppresses warnings when only a
//! subset of helpers is used per file.

#![allow(dead_code)]

use profile_manager::settings_file::SettingsFile;
use profile_manager_core::memory::{MemoryComponents, MemoryStore};
use profile_manager_core::{Components, Profile, ProfileManager, ProfilePath, Settings};
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

pub type MemoryManager = ProfileManager<MemoryStore, MemoryComponents>;

/// Parse a dotted profile path.
pub fn path(s: &str) -> ProfilePath {
    s.parse().expect("valid profile path")
}

/// Settings from a JSON object literal.
pub fn settings(value: Value) -> Settings {
    serde_json::from_value(value).expect("settings must be a JSON object")
}

pub fn components(ids: &[&str]) -> Components {
    ids.iter().map(|id| id.to_string()).collect()
}

pub fn profile(settings_value: Value, ids: &[&str]) -> Profile {
    Profile {
        settings: settings(settings_value),
        components: components(ids),
    }
}

/// Manager over in-memory collaborators with the given live state.
pub fn memory_manager(live: Value, installed: &[&str]) -> MemoryManager {
    ProfileManager::new(
        MemoryStore::with_live(settings(live)),
        MemoryComponents::new(installed.iter().copied()),
    )
}

/// Replace the live state of an in-memory manager, keeping its envelope.
pub fn set_live(manager: MemoryManager, live: Value, installed: &[&str]) -> MemoryManager {
    let (mut store, _) = manager.into_parts();
    store.live = settings(live);
    ProfileManager::new(store, MemoryComponents::new(installed.iter().copied()))
}

/// Creates a temporary directory holding `settings.json` with `contents`.
///
/// The `TempDir` must be kept alive for the duration of the test.
pub fn settings_file_with(contents: &Value) -> (SettingsFile, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("settings.json");
    fs::write(
        &file_path,
        serde_json::to_string_pretty(contents).expect("serializable settings"),
    )
    .expect("Failed to write settings file");
    (SettingsFile::new(file_path), temp_dir)
}

/// Parsed contents of a settings file.
pub fn read_json(file: &SettingsFile) -> Value {
    let contents = fs::read_to_string(file.path()).expect("Failed to read settings file");
    serde_json::from_str(&contents).expect("settings file is valid JSON")
}
