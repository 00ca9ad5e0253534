//! The persisted envelope holding the profile tree and its metadata.
//!
//! Inside a settings document the envelope lives under reserved, namespaced
//! keys (see [`keys`]) so it never collides with ordinary user settings.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

use crate::error::StoreError;
use crate::path::ProfilePath;
use crate::tree::ProfileTree;
use crate::value::key_is_ignored;

/// Reserved setting keys owned by this tool.
pub mod keys {
    /// Configuration section every reserved key is namespaced under.
    pub const SECTION: &str = "profile-manager";

    pub const ACTIVE_PROFILE: &str = "profile-manager.active-profile";
    pub const PROFILES_LIST: &str = "profile-manager.profiles";
    pub const IGNORE_EXTENSIONS: &str = "profile-manager.ignore-extensions";
    pub const IGNORE_SETTINGS: &str = "profile-manager.ignore-settings";

    /// All reserved keys.
    pub const ALL: [&str; 4] = [
        ACTIVE_PROFILE,
        PROFILES_LIST,
        IGNORE_EXTENSIONS,
        IGNORE_SETTINGS,
    ];

    /// True when `key` belongs to this tool rather than to the user.
    pub fn is_reserved(key: &str) -> bool {
        ALL.contains(&key)
    }
}

/// Process-wide persisted configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExtensionConfig {
    /// Path of the most recently saved or loaded profile.
    #[serde(default, with = "active_profile_serde")]
    pub active_profile: Option<ProfilePath>,

    /// The profile tree.
    #[serde(default)]
    pub profiles_list: ProfileTree,

    /// Component identifiers never stored in, installed or removed by a profile.
    #[serde(default)]
    pub ignore_extensions: BTreeSet<String>,

    /// Setting keys (or dotted key prefixes) never stored in or written by a profile.
    #[serde(default)]
    pub ignore_settings: BTreeSet<String>,
}

impl ExtensionConfig {
    /// True when the setting `key` is excluded from profiles.
    pub fn ignores_setting(&self, key: &str) -> bool {
        key_is_ignored(key, &self.ignore_settings)
    }

    /// True when the component `id` is excluded from profiles.
    ///
    /// Identifiers are matched case-insensitively.
    pub fn ignores_component(&self, id: &str) -> bool {
        self.ignore_extensions
            .iter()
            .any(|ignored| ignored.eq_ignore_ascii_case(id))
    }

    /// Decode the envelope from the reserved keys of a settings document.
    ///
    /// Missing keys take their defaults; present keys of the wrong shape fail.
    pub fn from_reserved(document: &Map<String, Value>) -> Result<Self, StoreError> {
        let mut config = Self::default();

        if let Some(value) = document.get(keys::ACTIVE_PROFILE) {
            config.active_profile = match value {
                Value::Null => None,
                Value::String(s) if s.trim().is_empty() => None,
                Value::String(s) => Some(
                    ProfilePath::parse(s).map_err(|e| malformed(keys::ACTIVE_PROFILE, e))?,
                ),
                other => {
                    return Err(malformed(
                        keys::ACTIVE_PROFILE,
                        format!("expected a string, found {other}"),
                    ));
                }
            };
        }
        if let Some(value) = document.get(keys::PROFILES_LIST) {
            config.profiles_list = decode(keys::PROFILES_LIST, value)?;
        }
        if let Some(value) = document.get(keys::IGNORE_EXTENSIONS) {
            config.ignore_extensions = decode(keys::IGNORE_EXTENSIONS, value)?;
        }
        if let Some(value) = document.get(keys::IGNORE_SETTINGS) {
            config.ignore_settings = decode(keys::IGNORE_SETTINGS, value)?;
        }
        Ok(config)
    }

    /// Encode the envelope into the reserved keys of a settings document,
    /// leaving every other key untouched.
    pub fn write_reserved(&self, document: &mut Map<String, Value>) -> Result<(), StoreError> {
        let active = self
            .active_profile
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        document.insert(keys::ACTIVE_PROFILE.to_string(), Value::String(active));
        document.insert(
            keys::PROFILES_LIST.to_string(),
            serde_json::to_value(&self.profiles_list).map_err(StoreError::Serialize)?,
        );
        document.insert(
            keys::IGNORE_EXTENSIONS.to_string(),
            serde_json::to_value(&self.ignore_extensions).map_err(StoreError::Serialize)?,
        );
        document.insert(
            keys::IGNORE_SETTINGS.to_string(),
            serde_json::to_value(&self.ignore_settings).map_err(StoreError::Serialize)?,
        );
        Ok(())
    }
}

fn decode<T: serde::de::DeserializeOwned + Default>(
    key: &'static str,
    value: &Value,
) -> Result<T, StoreError> {
    if value.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(value.clone()).map_err(|e| malformed(key, e))
}

fn malformed(key: &'static str, reason: impl ToString) -> StoreError {
    StoreError::Malformed {
        key,
        reason: reason.to_string(),
    }
}

/// `ActiveProfile` is persisted as a string where `""` means "none".
mod active_profile_serde {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<ProfilePath>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(path) => serializer.collect_str(path),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<ProfilePath>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        if raw.trim().is_empty() {
            return Ok(None);
        }
        ProfilePath::parse(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}
