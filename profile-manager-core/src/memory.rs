//! In-memory collaborators for tests and dry runs.

use std::cell::RefCell;
use std::collections::BTreeSet;

use crate::error::{ComponentError, StoreError};
use crate::extension_config::ExtensionConfig;
use crate::store::{ComponentManager, ConfigurationStore, WriteMode};
use crate::value::{Components, Settings, override_merge};

/// A configuration store held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Live settings (never contains reserved keys).
    pub live: Settings,
    /// Persisted envelope.
    pub config: ExtensionConfig,
    /// Number of envelope writes performed.
    pub config_writes: usize,
    /// Number of live-settings writes performed.
    pub settings_writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with live settings.
    pub fn with_live(live: Settings) -> Self {
        Self {
            live,
            ..Self::default()
        }
    }
}

impl ConfigurationStore for MemoryStore {
    fn read_live_settings(&self) -> Result<Settings, StoreError> {
        Ok(self.live.clone())
    }

    fn write_live_settings(
        &mut self,
        settings: &Settings,
        mode: WriteMode,
    ) -> Result<(), StoreError> {
        match mode {
            WriteMode::Merge => override_merge(&mut self.live, settings),
            WriteMode::Overwrite => self.live = settings.clone(),
        }
        self.settings_writes += 1;
        Ok(())
    }

    fn read_extension_config(&self) -> Result<ExtensionConfig, StoreError> {
        Ok(self.config.clone())
    }

    fn write_extension_config(&mut self, config: &ExtensionConfig) -> Result<(), StoreError> {
        self.config = config.clone();
        self.config_writes += 1;
        Ok(())
    }
}

/// A recorded component manager call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentCall {
    List,
    Install(String),
    Uninstall(String),
}

/// A component manager backed by a set, with injectable failures.
#[derive(Debug, Default)]
pub struct MemoryComponents {
    installed: Components,
    fail_install: BTreeSet<String>,
    fail_uninstall: BTreeSet<String>,
    calls: RefCell<Vec<ComponentCall>>,
}

impl MemoryComponents {
    pub fn new<I, S>(installed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            installed: installed.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Make every install of `id` fail.
    pub fn fail_install(mut self, id: &str) -> Self {
        self.fail_install.insert(id.to_string());
        self
    }

    /// Make every uninstall of `id` fail.
    pub fn fail_uninstall(mut self, id: &str) -> Self {
        self.fail_uninstall.insert(id.to_string());
        self
    }

    pub fn installed(&self) -> &Components {
        &self.installed
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<ComponentCall> {
        self.calls.borrow().clone()
    }
}

impl ComponentManager for MemoryComponents {
    fn list_installed(&self) -> Result<Components, ComponentError> {
        self.calls.borrow_mut().push(ComponentCall::List);
        Ok(self.installed.clone())
    }

    fn install(&mut self, id: &str) -> Result<(), ComponentError> {
        self.calls
            .borrow_mut()
            .push(ComponentCall::Install(id.to_string()));
        if self.fail_install.contains(id) {
            return Err(ComponentError::InstallFailure {
                id: id.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        self.installed.insert(id.to_string());
        Ok(())
    }

    fn uninstall(&mut self, id: &str) -> Result<(), ComponentError> {
        self.calls
            .borrow_mut()
            .push(ComponentCall::Uninstall(id.to_string()));
        if self.fail_uninstall.contains(id) {
            return Err(ComponentError::UninstallFailure {
                id: id.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        self.installed.remove(id);
        Ok(())
    }
}
