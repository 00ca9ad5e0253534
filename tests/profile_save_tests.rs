//! Tests for saving profiles through `ProfileManager` with in-memory
//! collaborators: delta storage, idempotence, descendant de-duplication and
//! the three save entry points.

mod common;

use common::{MemoryManager, components, memory_manager, path, set_live, settings};
use profile_manager_core::{Profile, ProfileError, SaveTarget, get_profile, resolve_chain};
use serde_json::json;

/// Profile stored on the node at `p` (its own delta, not the effective view).
fn stored(manager: &MemoryManager, p: &str) -> Profile {
    let config = manager.config().unwrap();
    let chain = resolve_chain(&config.profiles_list, &path(p)).unwrap();
    config.profiles_list.profile(*chain.last().unwrap()).clone()
}

/// Build `work` ({x:1, y:2}, [a]) then `work.rust` on top of it.
fn work_and_rust() -> MemoryManager {
    let mut manager = memory_manager(json!({"x": 1, "y": 2}), &["a"]);
    manager.save_profile(&path("work")).unwrap();
    let mut manager = set_live(manager, json!({"x": 1, "y": 3, "z": 4}), &["a", "b"]);
    manager.save_profile(&path("work.rust")).unwrap();
    manager
}

#[test]
fn test_top_level_save_then_resolve_returns_live_state() {
    let live = json!({"editor.fontSize": 14, "files.exclude": {"target": true}});
    let mut manager = memory_manager(
        live.clone(),
        &["rust-lang.rust-analyzer", "vadimcn.vscode-lldb"],
    );

    let summary = manager.save_profile(&path("work")).unwrap();

    assert!(summary.created);
    let effective = manager.get_profile(&path("work")).unwrap();
    assert_eq!(effective.settings, settings(live));
    assert_eq!(
        effective.components,
        components(&["rust-lang.rust-analyzer", "vadimcn.vscode-lldb"])
    );
}

#[test]
fn test_save_marks_profile_active() {
    let mut manager = memory_manager(json!({"x": 1}), &[]);
    manager.save_profile(&path("work")).unwrap();
    assert_eq!(manager.active_profile().unwrap(), Some(path("work")));
    assert_eq!(manager.store().config_writes, 1);
}

#[test]
fn test_save_twice_is_idempotent() {
    let mut manager = work_and_rust();
    let before = manager.config().unwrap().profiles_list;

    manager.save_profile(&path("work.rust")).unwrap();

    assert_eq!(manager.config().unwrap().profiles_list, before);
}

#[test]
fn test_nested_save_stores_only_delta() {
    let manager = work_and_rust();

    let rust = stored(&manager, "work.rust");
    assert_eq!(rust.settings, settings(json!({"y": 3, "z": 4})));
    assert_eq!(rust.components, components(&["b"]));

    let effective = manager.get_profile(&path("work.rust")).unwrap();
    assert_eq!(effective.settings, settings(json!({"x": 1, "y": 3, "z": 4})));
    assert_eq!(effective.components, components(&["a", "b"]));
}

#[test]
fn test_nested_object_values_compare_structurally() {
    let mut manager = memory_manager(json!({"obj": {"a": 1, "b": [1, 2]}}), &[]);
    manager.save_profile(&path("work")).unwrap();
    let mut manager = set_live(manager, json!({"obj": {"b": [1, 2], "a": 1.0}}), &[]);

    manager.save_profile(&path("work.child")).unwrap();

    assert!(stored(&manager, "work.child").is_empty());
}

#[test]
fn test_resave_of_parent_prunes_inherited_duplicates() {
    let manager = work_and_rust();
    // Parent now carries what only the child had before.
    let mut manager = set_live(manager, json!({"x": 1, "y": 3, "z": 4}), &["a", "b"]);
    manager.save_profile(&path("work")).unwrap();

    let rust = stored(&manager, "work.rust");
    assert!(rust.settings.is_empty());
    assert!(rust.components.is_empty());

    // The child still resolves to the same effective state.
    let effective = manager.get_profile(&path("work.rust")).unwrap();
    assert_eq!(effective.settings, settings(json!({"x": 1, "y": 3, "z": 4})));
}

#[test]
fn test_dedup_stops_at_first_definition_on_a_branch() {
    let mut manager = memory_manager(json!({"k": 0}), &[]);
    manager.save_profile(&path("root")).unwrap();
    let mut manager = set_live(manager, json!({"k": 2}), &[]);
    manager.save_profile(&path("root.a")).unwrap();
    let mut manager = set_live(manager, json!({"k": 1}), &["ext.deep"]);
    manager.save_profile(&path("root.a.b")).unwrap();
    let mut manager = set_live(manager, json!({"k": 1}), &[]);
    manager.save_profile(&path("root.c")).unwrap();

    let mut manager = set_live(manager, json!({"k": 1}), &["ext.deep"]);
    let summary = manager.save_profile(&path("root")).unwrap();

    // `a` overrides with a different value, so `b` below it is not searched.
    assert_eq!(stored(&manager, "root.a").settings, settings(json!({"k": 2})));
    assert_eq!(stored(&manager, "root.a.b").settings, settings(json!({"k": 1})));
    // `c` duplicated the new value and loses it.
    assert!(stored(&manager, "root.c").settings.is_empty());
    // Components are stripped at every depth.
    assert!(stored(&manager, "root.a.b").components.is_empty());
    assert_eq!(summary.cleanup.settings_removed, 1);
    assert_eq!(summary.cleanup.components_removed, 1);
}

#[test]
fn test_no_descendant_duplicates_after_save() {
    let manager = work_and_rust();
    let mut manager = set_live(manager, json!({"x": 1, "y": 3, "z": 5}), &["a", "b"]);
    manager.save_profile(&path("work")).unwrap();

    let config = manager.config().unwrap();
    let tree = &config.profiles_list;
    let work = resolve_chain(tree, &path("work")).unwrap()[0];
    let saved = tree.profile(work).clone();
    for id in tree.descendants(work) {
        let descendant = tree.profile(id);
        for (key, value) in &saved.settings {
            assert_ne!(descendant.settings.get(key), Some(value), "duplicate {key}");
        }
        assert!(descendant.components.is_disjoint(&saved.components));
    }
    // Overridden value survives.
    assert_eq!(stored(&manager, "work.rust").settings, settings(json!({"z": 4})));
}

#[test]
fn test_resave_keeps_children() {
    let manager = work_and_rust();
    let mut manager = set_live(manager, json!({"x": 9}), &[]);

    let summary = manager.save_profile(&path("work")).unwrap();

    assert!(!summary.created);
    assert!(manager.profile_exists(&path("work.rust")).unwrap());
}

#[test]
fn test_save_with_broken_parent_changes_nothing() {
    let mut manager = work_and_rust();
    let before = manager.config().unwrap();
    let writes = manager.store().config_writes;

    let err = manager.save_profile(&path("play.chess")).unwrap_err();

    match err {
        ProfileError::NodeNotFound { prefix } => assert_eq!(prefix, "play"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(manager.config().unwrap(), before);
    assert_eq!(manager.store().config_writes, writes);
}

#[test]
fn test_nested_save_into_empty_tree() {
    let mut manager = memory_manager(json!({}), &[]);
    let err = manager.save_profile(&path("work.rust")).unwrap_err();
    assert!(matches!(err, ProfileError::NoProfilesExist));
}

#[test]
fn test_save_targets_follow_active_profile() {
    let mut manager = memory_manager(json!({"x": 1}), &[]);
    assert!(matches!(
        manager.save(&SaveTarget::UpdateActive),
        Err(ProfileError::NoActiveProfile)
    ));
    assert!(matches!(
        manager.save(&SaveTarget::ChildOfActive("rust".into())),
        Err(ProfileError::NoActiveProfile)
    ));

    manager.save(&SaveTarget::New(path("work"))).unwrap();
    let summary = manager
        .save(&SaveTarget::ChildOfActive("rust".into()))
        .unwrap();
    assert_eq!(summary.path, path("work.rust"));
    assert_eq!(manager.active_profile().unwrap(), Some(path("work.rust")));

    let summary = manager.save(&SaveTarget::UpdateActive).unwrap();
    assert_eq!(summary.path, path("work.rust"));
    assert!(!summary.created);
}

#[test]
fn test_child_name_must_be_single_segment() {
    let mut manager = memory_manager(json!({"x": 1}), &[]);
    manager.save_profile(&path("work")).unwrap();
    let err = manager
        .save(&SaveTarget::ChildOfActive("a.b".into()))
        .unwrap_err();
    assert!(matches!(err, ProfileError::InvalidPath { .. }));
}

#[test]
fn test_ignore_lists_filter_saved_delta() {
    let mut manager = memory_manager(
        json!({"editor.fontSize": 14, "editor": {"tabSize": 2}, "window.zoomLevel": 1}),
        &["ms-python.python", "rust-lang.rust-analyzer"],
    );
    {
        let mut store_config = manager.config().unwrap();
        store_config.ignore_settings.insert("editor".into());
        store_config.ignore_extensions.insert("MS-Python.Python".into());
        let (mut store, components) = manager.into_parts();
        store.config = store_config;
        manager = profile_manager_core::ProfileManager::new(store, components);
    }

    manager.save_profile(&path("work")).unwrap();

    let work = stored(&manager, "work");
    assert_eq!(work.settings, settings(json!({"window.zoomLevel": 1})));
    assert_eq!(work.components, components(&["rust-lang.rust-analyzer"]));
}

#[test]
fn test_get_profile_free_function_matches_manager() {
    let manager = work_and_rust();
    let config = manager.config().unwrap();
    assert_eq!(
        get_profile(&config.profiles_list, &path("work.rust")).unwrap(),
        manager.get_profile(&path("work.rust")).unwrap()
    );
}
