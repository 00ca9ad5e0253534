//! JSON settings file backing the configuration store.
//!
//! One JSON object holds both the user's live settings and, under the
//! reserved `profile-manager.*` keys, the profile envelope. The file is read
//! as JSONC (comments and trailing commas allowed) and a missing file reads
//! as an empty object. Writes are atomic, keep the existing key order and
//! use the indentation configured through `editor.tabSize`. Comments are
//! not carried over into the rewritten file.

use jsonc_parser::ParseOptions;
use profile_manager_core::keys;
use profile_manager_core::{ConfigurationStore, ExtensionConfig, Settings, StoreError, WriteMode};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Indent width used when `editor.tabSize` is absent or unusable.
pub const DEFAULT_INDENT: usize = 3;

/// Widest indent a settings file is written with.
pub const MAX_INDENT: usize = 10;

/// Setting that controls the file's indentation.
const TAB_SIZE_KEY: &str = "editor.tabSize";

/// A settings file on disk.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The whole document, reserved keys included.
    pub fn read_document(&self) -> Result<Map<String, Value>, StoreError> {
        if !self.path.exists() {
            log::debug!("Settings file {:?} not found, reading as empty", self.path);
            return Ok(Map::new());
        }
        let contents = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_document(&contents).map_err(|reason| StoreError::Parse {
            path: self.path.clone(),
            reason,
        })
    }

    /// Replace the whole document.
    pub fn write_document(&self, document: &Map<String, Value>) -> Result<(), StoreError> {
        let indent = vec![b' '; indent_width(document)];
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&indent));
        document
            .serialize(&mut serializer)
            .map_err(StoreError::Serialize)?;
        buf.push(b'\n');

        let io_error = |path: &Path| {
            let path = path.to_path_buf();
            move |source| StoreError::Io { path, source }
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &buf).map_err(io_error(&temp_path))?;
        fs::rename(&temp_path, &self.path).map_err(io_error(&self.path))?;
        log::debug!("Wrote {} keys to {:?}", document.len(), self.path);
        Ok(())
    }
}

/// Parse JSONC text into a settings object. Blank text is an empty object.
pub fn parse_document(text: &str) -> Result<Map<String, Value>, String> {
    match jsonc_parser::parse_to_serde_value(text, &ParseOptions::default()) {
        Ok(Some(Value::Object(map))) => Ok(map),
        Ok(None) => Ok(Map::new()),
        Ok(Some(other)) => Err(format!("expected an object, found {other}")),
        Err(e) => Err(e.to_string()),
    }
}

/// Indent width taken from `editor.tabSize`, capped at [`MAX_INDENT`].
pub fn indent_width(document: &Map<String, Value>) -> usize {
    document
        .get(TAB_SIZE_KEY)
        .and_then(Value::as_u64)
        .filter(|size| *size > 0)
        .map_or(DEFAULT_INDENT, |size| (size as usize).min(MAX_INDENT))
}

impl ConfigurationStore for SettingsFile {
    fn read_live_settings(&self) -> Result<Settings, StoreError> {
        Ok(self
            .read_document()?
            .into_iter()
            .filter(|(key, _)| !keys::is_reserved(key))
            .collect())
    }

    fn write_live_settings(
        &mut self,
        settings: &Settings,
        mode: WriteMode,
    ) -> Result<(), StoreError> {
        let mut document = self.read_document()?;
        if mode == WriteMode::Overwrite {
            document.retain(|key, _| keys::is_reserved(key));
        }
        for (key, value) in settings {
            if keys::is_reserved(key) {
                log::warn!("Refusing to write reserved key \"{}\" as a setting", key);
                continue;
            }
            document.insert(key.clone(), value.clone());
        }
        self.write_document(&document)
    }

    fn read_extension_config(&self) -> Result<ExtensionConfig, StoreError> {
        ExtensionConfig::from_reserved(&self.read_document()?)
    }

    fn write_extension_config(&mut self, config: &ExtensionConfig) -> Result<(), StoreError> {
        let mut document = self.read_document()?;
        config.write_reserved(&mut document)?;
        self.write_document(&document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn document(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn test_indent_width() {
        assert_eq!(indent_width(&Map::new()), DEFAULT_INDENT);
        assert_eq!(indent_width(&document(json!({"editor.tabSize": 2}))), 2);
        assert_eq!(indent_width(&document(json!({"editor.tabSize": 24}))), MAX_INDENT);
        assert_eq!(indent_width(&document(json!({"editor.tabSize": 0}))), DEFAULT_INDENT);
        assert_eq!(
            indent_width(&document(json!({"editor.tabSize": "wide"}))),
            DEFAULT_INDENT
        );
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let temp = TempDir::new().unwrap();
        let file = SettingsFile::new(temp.path().join("settings.json"));
        assert!(file.read_document().unwrap().is_empty());
        assert!(file.read_live_settings().unwrap().is_empty());
        assert_eq!(file.read_extension_config().unwrap(), ExtensionConfig::default());
    }

    #[test]
    fn test_write_uses_tab_size() {
        let temp = TempDir::new().unwrap();
        let file = SettingsFile::new(temp.path().join("settings.json"));
        file.write_document(&document(json!({"editor.tabSize": 2, "a": {"b": 1}})))
            .unwrap();

        let contents = fs::read_to_string(file.path()).unwrap();
        assert!(contents.contains("\n  \"a\": {\n    \"b\": 1\n  }"));
        assert!(contents.ends_with("}\n"));
        assert!(!temp.path().join("settings.json.tmp").exists());
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let err = SettingsFile::new(&path).read_live_settings().unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }
}
