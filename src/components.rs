//! Component manager driven by external commands.
//!
//! Runs the configured list/install/uninstall command lines (by default the
//! `code` CLI) and maps their exit status onto [`ComponentError`].

use crate::config::{AppConfig, ComponentCommands};
use profile_manager_core::{ComponentError, ComponentManager, Components};
use std::process::{Command, Output};

/// Placeholder replaced by the component identifier.
pub const ID_PLACEHOLDER: &str = "{id}";

/// Runs component commands as child processes.
#[derive(Debug, Clone, Default)]
pub struct CommandComponentManager {
    commands: ComponentCommands,
    /// Lowercased identifiers hidden from listings.
    hidden: Vec<String>,
}

impl CommandComponentManager {
    pub fn new(commands: ComponentCommands) -> Self {
        Self {
            commands,
            hidden: Vec::new(),
        }
    }

    /// Manager configured from the application config.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut manager = Self::new(config.component_commands.clone());
        manager.hide(config.builtin_components.iter().map(String::as_str));
        if let Some(self_id) = &config.self_id {
            manager.hide([self_id.as_str()]);
        }
        manager
    }

    /// Never report these identifiers as installed.
    pub fn hide<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        self.hidden
            .extend(ids.into_iter().map(|id| id.to_ascii_lowercase()));
    }

    fn is_hidden(&self, id: &str) -> bool {
        self.hidden.iter().any(|hidden| hidden.eq_ignore_ascii_case(id))
    }
}

/// Split `template` into program and arguments, substituting `id`.
pub fn command_line(template: &str, id: Option<&str>) -> Result<Vec<String>, ComponentError> {
    let spawn_error = |reason: String| ComponentError::Spawn {
        command: template.to_string(),
        reason,
    };
    let mut argv = shell_words::split(template).map_err(|e| spawn_error(e.to_string()))?;
    if argv.is_empty() {
        return Err(spawn_error("empty command".to_string()));
    }
    if let Some(id) = id {
        for arg in &mut argv {
            *arg = arg.replace(ID_PLACEHOLDER, id);
        }
    }
    Ok(argv)
}

fn run(template: &str, id: Option<&str>) -> Result<Output, ComponentError> {
    let argv = command_line(template, id)?;
    log::debug!("Running component command: {:?}", argv);
    Command::new(&argv[0])
        .args(&argv[1..])
        .output()
        .map_err(|e| ComponentError::Spawn {
            command: argv.join(" "),
            reason: e.to_string(),
        })
}

/// Trimmed stderr, or the exit status when stderr is empty.
fn failure_reason(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("command exited with {}", output.status)
    } else {
        stderr.to_string()
    }
}

impl ComponentManager for CommandComponentManager {
    fn list_installed(&self) -> Result<Components, ComponentError> {
        let output = run(&self.commands.list, None)?;
        if !output.status.success() {
            return Err(ComponentError::ListFailed {
                reason: failure_reason(&output),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|id| !id.is_empty() && !self.is_hidden(id))
            .map(str::to_string)
            .collect())
    }

    fn install(&mut self, id: &str) -> Result<(), ComponentError> {
        let output = run(&self.commands.install, Some(id))?;
        if !output.status.success() {
            return Err(ComponentError::InstallFailure {
                id: id.to_string(),
                reason: failure_reason(&output),
            });
        }
        log::info!("Installed component {}", id);
        Ok(())
    }

    fn uninstall(&mut self, id: &str) -> Result<(), ComponentError> {
        let output = run(&self.commands.uninstall, Some(id))?;
        if !output.status.success() {
            return Err(ComponentError::UninstallFailure {
                id: id.to_string(),
                reason: failure_reason(&output),
            });
        }
        log::info!("Uninstalled component {}", id);
        Ok(())
    }
}
