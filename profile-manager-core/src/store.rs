//! Collaborator seams: the configuration store and the component manager.
//!
//! The engine never reaches for global state. Both collaborators are handed
//! to [`crate::ProfileManager`] at construction, which keeps every operation
//! testable against the in-memory fakes in [`crate::memory`].

use crate::error::{ComponentError, StoreError};
use crate::extension_config::ExtensionConfig;
use crate::value::{Components, Settings};

/// How live settings are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Shallow-override the given keys onto the current live settings.
    #[default]
    Merge,
    /// Replace the live settings wholesale.
    Overwrite,
}

/// Access to the host's live settings and to this tool's persisted envelope.
pub trait ConfigurationStore {
    /// Current live settings, excluding this tool's reserved keys.
    fn read_live_settings(&self) -> Result<Settings, StoreError>;

    /// Persist live settings using `mode`.
    fn write_live_settings(&mut self, settings: &Settings, mode: WriteMode)
    -> Result<(), StoreError>;

    /// Read the whole envelope, with defaults for anything missing.
    fn read_extension_config(&self) -> Result<ExtensionConfig, StoreError>;

    /// Replace the whole envelope.
    fn write_extension_config(&mut self, config: &ExtensionConfig) -> Result<(), StoreError>;
}

/// Installs, removes and lists components.
pub trait ComponentManager {
    /// Installed, removable components (built-ins and this tool excluded).
    fn list_installed(&self) -> Result<Components, ComponentError>;

    fn install(&mut self, id: &str) -> Result<(), ComponentError>;

    fn uninstall(&mut self, id: &str) -> Result<(), ComponentError>;
}

impl<T: ConfigurationStore + ?Sized> ConfigurationStore for &mut T {
    fn read_live_settings(&self) -> Result<Settings, StoreError> {
        (**self).read_live_settings()
    }

    fn write_live_settings(
        &mut self,
        settings: &Settings,
        mode: WriteMode,
    ) -> Result<(), StoreError> {
        (**self).write_live_settings(settings, mode)
    }

    fn read_extension_config(&self) -> Result<ExtensionConfig, StoreError> {
        (**self).read_extension_config()
    }

    fn write_extension_config(&mut self, config: &ExtensionConfig) -> Result<(), StoreError> {
        (**self).write_extension_config(config)
    }
}

impl<T: ComponentManager + ?Sized> ComponentManager for &mut T {
    fn list_installed(&self) -> Result<Components, ComponentError> {
        (**self).list_installed()
    }

    fn install(&mut self, id: &str) -> Result<(), ComponentError> {
        (**self).install(id)
    }

    fn uninstall(&mut self, id: &str) -> Result<(), ComponentError> {
        (**self).uninstall(id)
    }
}
