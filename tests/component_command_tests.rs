//! Tests for the command-driven component manager using real `sh` processes.

#![cfg(unix)]

mod common;

use common::{components, path, profile};
use profile_manager::components::CommandComponentManager;
use profile_manager::config::{AppConfig, ComponentCommands};
use profile_manager_core::memory::MemoryStore;
use profile_manager_core::{ComponentError, ComponentManager, ProfileManager};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn shell(script: &str) -> String {
    format!("sh -c '{script}' {{id}}")
}

#[test]
fn test_list_trims_and_hides_builtin_and_self() {
    let config = AppConfig {
        component_commands: ComponentCommands {
            list: r#"sh -c 'printf "  ext.a\n\nVSCode.Git\next.b  \nme.profile-manager\n"'"#
                .to_string(),
            ..ComponentCommands::default()
        },
        builtin_components: vec!["vscode.git".to_string()],
        self_id: Some("me.profile-manager".to_string()),
        ..AppConfig::default()
    };
    let manager = CommandComponentManager::from_config(&config);

    assert_eq!(
        manager.list_installed().unwrap(),
        components(&["ext.a", "ext.b"])
    );
}

#[test]
fn test_list_failure_uses_stderr() {
    let manager = CommandComponentManager::new(ComponentCommands {
        list: r#"sh -c 'echo "  no editor found " >&2; exit 2'"#.to_string(),
        ..ComponentCommands::default()
    });

    assert_eq!(
        manager.list_installed().unwrap_err(),
        ComponentError::ListFailed {
            reason: "no editor found".to_string()
        }
    );
}

#[test]
fn test_install_and_uninstall_pass_identifier() {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("calls.log");
    let log = log.display();
    let mut manager = CommandComponentManager::new(ComponentCommands {
        list: "true".to_string(),
        install: shell(&format!("echo install $0 >> {log}")),
        uninstall: shell(&format!("echo uninstall $0 >> {log}")),
    });

    manager.install("ms-python.python").unwrap();
    manager.uninstall("vscodevim.vim").unwrap();

    let calls = fs::read_to_string(temp.path().join("calls.log")).unwrap();
    assert_eq!(calls, "install ms-python.python\nuninstall vscodevim.vim\n");
    assert!(manager.list_installed().unwrap().is_empty());
}

#[test]
fn test_install_failure_without_stderr_reports_status() {
    let mut manager = CommandComponentManager::new(ComponentCommands {
        install: shell("exit 3"),
        ..ComponentCommands::default()
    });

    match manager.install("ext.bad").unwrap_err() {
        ComponentError::InstallFailure { id, reason } => {
            assert_eq!(id, "ext.bad");
            assert!(reason.contains('3'), "reason was {reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_load_with_real_commands_reports_partial_failure() {
    let temp = TempDir::new().unwrap();
    let installed = temp.path().join("installed");
    fs::write(&installed, "ext.old\next.keep\n").unwrap();
    let installed = installed.display();
    let manager_commands = ComponentCommands {
        list: format!("cat {installed}"),
        install: shell(&format!(
            "if [ \"$0\" = ext.bad ]; then echo broken >&2; exit 1; fi; echo $0 >> {installed}"
        )),
        uninstall: shell(&format!(
            "grep -v -x \"$0\" {installed} > {installed}.new; mv {installed}.new {installed}"
        )),
    };

    let mut store = MemoryStore::new();
    store.config.profiles_list.upsert(
        None,
        "work",
        profile(json!({"x": 1}), &["ext.keep", "ext.new", "ext.bad"]),
    );
    let mut manager = ProfileManager::new(store, CommandComponentManager::new(manager_commands));

    let report = manager.load_profile(&path("work")).unwrap();

    assert_eq!(report.uninstalled, vec!["ext.old"]);
    assert_eq!(report.installed, vec!["ext.new"]);
    assert_eq!(
        report.failures,
        vec![ComponentError::InstallFailure {
            id: "ext.bad".into(),
            reason: "broken".into(),
        }]
    );
    assert_eq!(
        manager.components().list_installed().unwrap(),
        components(&["ext.keep", "ext.new"])
    );
}
