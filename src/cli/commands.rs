//! Subcommand implementations.
//!
//! Each command runs against a [`ProfileManager`] and prints to the given
//! writer, so the same code drives the real settings file and the in-memory
//! collaborators used by tests.

use super::{Commands, exit};
use anyhow::{Context, Result};
use profile_manager_core::{
    ComponentManager, ConfigurationStore, LoadReport, ProfileManager, SaveSummary, SaveTarget,
};
use std::io::Write;

/// Run `command` and return the process exit code.
pub fn execute<S, C, W>(
    command: &Commands,
    manager: &mut ProfileManager<S, C>,
    out: &mut W,
) -> Result<i32>
where
    S: ConfigurationStore,
    C: ComponentManager,
    W: Write,
{
    match command {
        Commands::Save {
            name,
            update,
            child,
        } => {
            let target = if *update {
                SaveTarget::UpdateActive
            } else if let Some(child) = child {
                SaveTarget::ChildOfActive(child.clone())
            } else if let Some(name) = name {
                SaveTarget::New(name.clone())
            } else {
                anyhow::bail!("save needs a profile name, --update or --child");
            };
            let summary = manager.save(&target)?;
            print_save_summary(&summary, out)?;
            Ok(exit::SUCCESS)
        }
        Commands::Load { path } => {
            let report = manager.load_profile(path)?;
            print_load_report(&report, out)?;
            Ok(if report.is_clean() {
                exit::SUCCESS
            } else {
                exit::FAILURE
            })
        }
        Commands::Show { path } => {
            let profile = manager.get_profile(path)?;
            let json =
                serde_json::to_string_pretty(&profile).context("Failed to format profile")?;
            writeln!(out, "{json}")?;
            Ok(exit::SUCCESS)
        }
        Commands::List => {
            list_profiles(manager, out)?;
            Ok(exit::SUCCESS)
        }
        Commands::Exists { path } => Ok(if manager.profile_exists(path)? {
            exit::SUCCESS
        } else {
            exit::FAILURE
        }),
        Commands::Active => match manager.active_profile()? {
            Some(path) => {
                writeln!(out, "{path}")?;
                Ok(exit::SUCCESS)
            }
            None => Ok(exit::FAILURE),
        },
    }
}

fn print_save_summary<W: Write>(summary: &SaveSummary, out: &mut W) -> Result<()> {
    writeln!(
        out,
        "{} profile \"{}\" ({} setting(s), {} extension(s))",
        if summary.created { "Saved" } else { "Updated" },
        summary.path,
        summary.settings_stored,
        summary.components_stored
    )?;
    let cleanup = summary.cleanup;
    if cleanup.settings_removed + cleanup.components_removed > 0 {
        writeln!(
            out,
            "Removed {} setting(s) and {} extension(s) from child profiles that now inherit them",
            cleanup.settings_removed, cleanup.components_removed
        )?;
    }
    Ok(())
}

fn print_load_report<W: Write>(report: &LoadReport, out: &mut W) -> Result<()> {
    for id in &report.uninstalled {
        writeln!(out, "Uninstalled {id}")?;
    }
    for id in &report.installed {
        writeln!(out, "Installed {id}")?;
    }
    for failure in &report.failures {
        writeln!(out, "Error: {failure}")?;
    }
    writeln!(
        out,
        "Loaded profile \"{}\" ({} setting(s) applied)",
        report.path, report.settings_written
    )?;
    if report.reload_required {
        writeln!(out, "Reload the editor window to apply the changes.")?;
    }
    Ok(())
}

fn list_profiles<S, C, W>(manager: &ProfileManager<S, C>, out: &mut W) -> Result<()>
where
    S: ConfigurationStore,
    C: ComponentManager,
    W: Write,
{
    let config = manager.config()?;
    let tree = &config.profiles_list;
    if tree.is_empty() {
        writeln!(out, "No profiles saved")?;
        return Ok(());
    }
    let active = config.active_profile.as_ref().map(ToString::to_string);
    for (path, depth, id) in tree.walk() {
        let marker = if active.as_deref() == Some(path.as_str()) {
            '*'
        } else {
            ' '
        };
        writeln!(
            out,
            "{marker} {}{}",
            "  ".repeat(depth),
            tree.node(id).name()
        )?;
    }
    Ok(())
}
