//! Loading profiles: converging the live state onto an effective profile.

use crate::error::{ComponentError, Result};
use crate::extension_config::ExtensionConfig;
use crate::manager::ProfileManager;
use crate::navigator::resolve_stack;
use crate::path::ProfilePath;
use crate::store::{ComponentManager, ConfigurationStore, WriteMode};
use crate::value::{Components, Settings};

/// Outcome of a load.
///
/// Component failures do not abort a load; they are collected here while the
/// remaining components and the settings write still go ahead.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub path: ProfilePath,
    pub uninstalled: Vec<String>,
    pub installed: Vec<String>,
    pub failures: Vec<ComponentError>,
    /// Number of settings written to the live store.
    pub settings_written: usize,
    /// The host must reload for the changes to take effect.
    pub reload_required: bool,
}

impl LoadReport {
    /// True when every component operation succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Installed components the profile does not want, skipping ignored ones.
pub fn plan_uninstall(
    installed: &Components,
    target: &Components,
    config: &ExtensionConfig,
) -> Vec<String> {
    installed
        .difference(target)
        .filter(|id| !config.ignores_component(id))
        .cloned()
        .collect()
}

/// Profile components that are not installed, skipping ignored ones.
pub fn plan_install(
    installed: &Components,
    target: &Components,
    config: &ExtensionConfig,
) -> Vec<String> {
    target
        .difference(installed)
        .filter(|id| !config.ignores_component(id))
        .cloned()
        .collect()
}

impl<S, C> ProfileManager<S, C>
where
    S: ConfigurationStore,
    C: ComponentManager,
{
    /// Make the live state match the effective profile at `path`.
    ///
    /// Uninstalls run first; the installed list is queried again before the
    /// install pass. Settings are merged over the live settings, so keys the
    /// profile does not mention are left alone. The active profile becomes
    /// `path`. Reloading the host is left to the caller.
    pub fn load_profile(&mut self, path: &ProfilePath) -> Result<LoadReport> {
        let mut config = self.store.read_extension_config()?;
        let effective = resolve_stack(&config.profiles_list, path)?.resolve();

        let mut report = LoadReport {
            path: path.clone(),
            uninstalled: Vec::new(),
            installed: Vec::new(),
            failures: Vec::new(),
            settings_written: 0,
            reload_required: false,
        };

        let before = self.components.list_installed()?;
        for id in plan_uninstall(&before, &effective.components, &config) {
            match self.components.uninstall(&id) {
                Ok(()) => report.uninstalled.push(id),
                Err(e) => {
                    log::warn!("{}", e);
                    report.failures.push(e);
                }
            }
        }

        let after = self.components.list_installed()?;
        for id in plan_install(&after, &effective.components, &config) {
            match self.components.install(&id) {
                Ok(()) => report.installed.push(id),
                Err(e) => {
                    log::warn!("{}", e);
                    report.failures.push(e);
                }
            }
        }

        let settings: Settings = effective
            .settings
            .into_iter()
            .filter(|(key, _)| !config.ignores_setting(key))
            .collect();
        self.store.write_live_settings(&settings, WriteMode::Merge)?;
        report.settings_written = settings.len();

        config.active_profile = Some(path.clone());
        self.store.write_extension_config(&config)?;
        report.reload_required = true;

        log::info!(
            "Loaded profile \"{}\": {} uninstalled, {} installed, {} setting(s), {} failure(s)",
            path,
            report.uninstalled.len(),
            report.installed.len(),
            report.settings_written,
            report.failures.len()
        );
        Ok(report)
    }
}
