//! Typed error variants for the profile-manager-core crate.
//!
//! Callers at the crate boundary (the CLI, tests) match on these instead of
//! opaque strings. The application crate folds them into `anyhow` with `?`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by profile resolution, saving and loading.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// A path segment does not exist in the tree.
    ///
    /// `prefix` is the dotted path up to and including the first segment
    /// that failed to resolve.
    #[error("Profile item at path \"{prefix}\" does not exist")]
    NodeNotFound {
        /// Dotted prefix of the unresolved segment.
        prefix: String,
    },

    /// The profile tree is empty, so no path can resolve.
    #[error("No profiles exist")]
    NoProfilesExist,

    /// The path string is not a valid dotted profile path.
    #[error("Invalid profile path \"{path}\": {reason}")]
    InvalidPath {
        /// The rejected input.
        path: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// An update or child save was requested while no profile is active.
    #[error("No profile is currently active")]
    NoActiveProfile,

    /// The configuration store failed to read or write.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The component manager could not list installed components.
    #[error(transparent)]
    Component(#[from] ComponentError),
}

impl ProfileError {
    /// True for the failures that mean "this path does not resolve".
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            ProfileError::NodeNotFound { .. } | ProfileError::NoProfilesExist
        )
    }
}

/// Errors produced by a configuration store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("Settings file I/O failed for {path:?}: {source}")]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not a valid JSON object.
    #[error("Settings file {path:?} is not valid JSON: {reason}")]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Parser message, with position when known.
        reason: String,
    },

    /// Settings could not be serialized.
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A reserved key holds a value of the wrong shape.
    #[error("Reserved setting \"{key}\" is malformed: {reason}")]
    Malformed {
        /// Reserved key that failed to decode.
        key: &'static str,
        /// Decoder message.
        reason: String,
    },
}

/// Errors produced by a component manager.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ComponentError {
    /// Installing one component failed.
    #[error("Failed to install \"{id}\": {reason}")]
    InstallFailure {
        /// Component identifier.
        id: String,
        /// Failure detail reported by the manager.
        reason: String,
    },

    /// Uninstalling one component failed.
    #[error("Failed to uninstall \"{id}\": {reason}")]
    UninstallFailure {
        /// Component identifier.
        id: String,
        /// Failure detail reported by the manager.
        reason: String,
    },

    /// The installed component list could not be obtained.
    #[error("Failed to list installed components: {reason}")]
    ListFailed {
        /// Failure detail reported by the manager.
        reason: String,
    },

    /// A component command could not be started at all.
    #[error("Failed to run component command \"{command}\": {reason}")]
    Spawn {
        /// Command line that failed to start.
        command: String,
        /// Failure detail.
        reason: String,
    },
}

impl ComponentError {
    /// Identifier of the component this failure concerns, if any.
    pub fn component_id(&self) -> Option<&str> {
        match self {
            ComponentError::InstallFailure { id, .. }
            | ComponentError::UninstallFailure { id, .. } => Some(id),
            ComponentError::ListFailed { .. } | ComponentError::Spawn { .. } => None,
        }
    }
}

pub type Result<T, E = ProfileError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_not_found_message_names_prefix() {
        let err = ProfileError::NodeNotFound {
            prefix: "work.backend".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Profile item at path \"work.backend\" does not exist"
        );
        assert!(err.is_resolution_failure());
    }

    #[test]
    fn test_store_error_is_not_resolution_failure() {
        let err = ProfileError::from(StoreError::Malformed {
            key: "profile-manager.profiles",
            reason: "expected a map".to_string(),
        });
        assert!(!err.is_resolution_failure());
        assert!(err.to_string().contains("profile-manager.profiles"));
    }

    #[test]
    fn test_component_id() {
        let err = ComponentError::InstallFailure {
            id: "ms-python.python".to_string(),
            reason: "offline".to_string(),
        };
        assert_eq!(err.component_id(), Some("ms-python.python"));
        let err = ComponentError::ListFailed {
            reason: "boom".to_string(),
        };
        assert_eq!(err.component_id(), None);
    }
}
