//! Saving profiles.
//!
//! A save stores only the delta between the live state and what the target's
//! ancestors already imply, then strips any descendant override that has
//! become a duplicate of the freshly saved values.

use crate::error::{ProfileError, Result};
use crate::extension_config::ExtensionConfig;
use crate::manager::ProfileManager;
use crate::navigator::resolve_parent_chain;
use crate::path::ProfilePath;
use crate::resolver::{EffectiveProfile, resolve_nodes};
use crate::store::{ComponentManager, ConfigurationStore};
use crate::tree::{NodeId, Profile, ProfileTree};
use crate::value::{Components, Settings, values_equal};

/// Where a save lands, relative to the active profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    /// Save at an explicit path (a new top-level name, or any path whose
    /// parent exists).
    New(ProfilePath),
    /// Re-save the active profile.
    UpdateActive,
    /// Save as a direct child of the active profile.
    ChildOfActive(String),
}

impl SaveTarget {
    /// Concrete path for this target given the active profile.
    pub fn resolve(&self, active: Option<&ProfilePath>) -> Result<ProfilePath> {
        match self {
            SaveTarget::New(path) => Ok(path.clone()),
            SaveTarget::UpdateActive => active.cloned().ok_or(ProfileError::NoActiveProfile),
            SaveTarget::ChildOfActive(name) => {
                active.ok_or(ProfileError::NoActiveProfile)?.child(name)
            }
        }
    }
}

/// Counts of entries pruned from descendants after a save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupStats {
    pub settings_removed: usize,
    pub components_removed: usize,
}

/// Outcome of a save.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveSummary {
    pub path: ProfilePath,
    /// True when the node did not exist before.
    pub created: bool,
    pub settings_stored: usize,
    pub components_stored: usize,
    pub cleanup: CleanupStats,
}

/// Entries of the live state that the ancestors do not already imply.
///
/// Keys and identifiers excluded by the envelope's ignore lists are dropped.
pub fn compute_delta(
    ancestors: &EffectiveProfile,
    live_settings: &Settings,
    live_components: &Components,
    config: &ExtensionConfig,
) -> Profile {
    let settings = live_settings
        .iter()
        .filter(|(key, _)| !config.ignores_setting(key))
        .filter(|(key, value)| {
            !ancestors
                .settings
                .get(*key)
                .is_some_and(|inherited| values_equal(value, inherited))
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let components = live_components
        .difference(&ancestors.components)
        .filter(|id| !config.ignores_component(id))
        .cloned()
        .collect();

    Profile {
        settings,
        components,
    }
}

/// A save whose parent chain has already been resolved.
///
/// Building the plan is the only step that can fail, so a broken parent
/// chain is reported before anything is read from the collaborators or
/// written to the tree. A plan must be applied to the tree it was built from.
#[derive(Debug, Clone)]
pub struct SavePlan {
    path: ProfilePath,
    parent: Option<NodeId>,
    ancestors: EffectiveProfile,
}

impl SavePlan {
    pub fn new(tree: &ProfileTree, path: &ProfilePath) -> Result<Self> {
        let chain = resolve_parent_chain(tree, path)?;
        Ok(Self {
            path: path.clone(),
            parent: chain.last().copied(),
            ancestors: resolve_nodes(tree, &chain),
        })
    }

    /// Effective profile of the target's ancestors.
    pub fn ancestors(&self) -> &EffectiveProfile {
        &self.ancestors
    }

    /// Store the delta, dedup descendants and mark the target active.
    pub fn apply(
        self,
        config: &mut ExtensionConfig,
        live_settings: &Settings,
        live_components: &Components,
    ) -> SaveSummary {
        let delta = compute_delta(&self.ancestors, live_settings, live_components, config);
        let settings_stored = delta.settings.len();
        let components_stored = delta.components.len();

        let tree = &mut config.profiles_list;
        let created = tree.child(self.parent, self.path.name()).is_none();
        let id = tree.upsert(self.parent, self.path.name(), delta);
        let cleanup = cleanup_child_profiles(tree, id);

        config.active_profile = Some(self.path.clone());

        SaveSummary {
            path: self.path,
            created,
            settings_stored,
            components_stored,
            cleanup,
        }
    }
}

/// Save `live_*` at `path` inside `config` without any collaborator.
pub fn save_into(
    config: &mut ExtensionConfig,
    path: &ProfilePath,
    live_settings: &Settings,
    live_components: &Components,
) -> Result<SaveSummary> {
    let plan = SavePlan::new(&config.profiles_list, path)?;
    Ok(plan.apply(config, live_settings, live_components))
}

/// Remove from every descendant of `saved` the components and settings it
/// now inherits from `saved` unchanged.
///
/// Components are stripped at every depth. Each setting key is searched
/// depth-first: the first descendant on a branch that defines the key ends
/// the search on that branch, and loses the key only if its value is equal.
pub fn cleanup_child_profiles(tree: &mut ProfileTree, saved: NodeId) -> CleanupStats {
    let source = tree.profile(saved).clone();
    let children: Vec<NodeId> = tree.node(saved).children().values().copied().collect();

    let mut stats = CleanupStats::default();
    for child in children {
        stats.components_removed += strip_components(tree, child, &source.components);
        for (key, value) in &source.settings {
            stats.settings_removed += strip_setting(tree, child, key, value);
        }
    }
    stats
}

fn strip_components(tree: &mut ProfileTree, start: NodeId, components: &Components) -> usize {
    if components.is_empty() {
        return 0;
    }
    let mut removed = 0;
    let targets: Vec<NodeId> = std::iter::once(start).chain(tree.descendants(start)).collect();
    for id in targets {
        let before = tree.profile(id).components.len();
        tree.node_mut(id)
            .profile
            .components
            .retain(|component| !components.contains(component));
        let pruned = before - tree.profile(id).components.len();
        if pruned > 0 {
            log::debug!(
                "Pruned {} inherited component(s) from \"{}\"",
                pruned,
                tree.path_of(id)
            );
        }
        removed += pruned;
    }
    removed
}

fn strip_setting(
    tree: &mut ProfileTree,
    start: NodeId,
    key: &str,
    value: &serde_json::Value,
) -> usize {
    let mut removed = 0;
    let mut pending = vec![start];
    while let Some(id) = pending.pop() {
        match tree.profile(id).settings.get(key) {
            Some(existing) if values_equal(existing, value) => {
                tree.node_mut(id).profile.settings.remove(key);
                removed += 1;
                log::debug!(
                    "Pruned duplicated setting \"{}\" from \"{}\"",
                    key,
                    tree.path_of(id)
                );
            }
            Some(_) => {}
            None => pending.extend(tree.node(id).children().values().copied()),
        }
    }
    removed
}

impl<S, C> ProfileManager<S, C>
where
    S: ConfigurationStore,
    C: ComponentManager,
{
    /// Save the live state as the profile at `path`.
    ///
    /// The whole envelope is re-read, modified and written back. Nothing is
    /// written when the parent chain of `path` does not resolve.
    pub fn save_profile(&mut self, path: &ProfilePath) -> Result<SaveSummary> {
        let mut config = self.store.read_extension_config()?;
        let plan = SavePlan::new(&config.profiles_list, path)?;

        let live_settings = self.store.read_live_settings()?;
        let live_components = self.components.list_installed()?;

        let summary = plan.apply(&mut config, &live_settings, &live_components);
        self.store.write_extension_config(&config)?;

        log::info!(
            "Saved profile \"{}\" ({} setting(s), {} component(s); pruned {} setting(s) and {} component(s) from descendants)",
            summary.path,
            summary.settings_stored,
            summary.components_stored,
            summary.cleanup.settings_removed,
            summary.cleanup.components_removed
        );
        Ok(summary)
    }

    /// Save to a target expressed relative to the active profile.
    pub fn save(&mut self, target: &SaveTarget) -> Result<SaveSummary> {
        let active = self.active_profile()?;
        let path = target.resolve(active.as_ref())?;
        self.save_profile(&path)
    }
}
