//! Profile resolution: folding an ancestor chain into one effective profile.
//!
//! Settings use shallow last-writer-wins override (a nested object under a key
//! is an atomic value); components are a plain union with no precedence.

use serde::Serialize;

use crate::error::Result;
use crate::navigator::{ProfileStack, resolve_stack};
use crate::path::ProfilePath;
use crate::tree::{NodeId, Profile, ProfileTree};
use crate::value::{Components, Settings, override_merge};

/// What a session running a profile looks like once every ancestor is applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EffectiveProfile {
    pub settings: Settings,
    pub components: Components,
}

impl EffectiveProfile {
    /// Fold one more (deeper) profile into the accumulator.
    pub fn apply(&mut self, profile: &Profile) {
        override_merge(&mut self.settings, &profile.settings);
        self.components.extend(profile.components.iter().cloned());
    }
}

/// Fold profiles given root to leaf. An empty chain yields an empty profile.
pub fn resolve_effective<'a, I>(chain: I) -> EffectiveProfile
where
    I: IntoIterator<Item = &'a Profile>,
{
    let mut effective = EffectiveProfile::default();
    for profile in chain {
        effective.apply(profile);
    }
    effective
}

/// Fold the nodes of a resolved chain.
pub fn resolve_nodes(tree: &ProfileTree, chain: &[NodeId]) -> EffectiveProfile {
    resolve_effective(chain.iter().map(|id| tree.profile(*id)))
}

impl ProfileStack {
    /// Fold this stack into its effective profile.
    pub fn resolve(&self) -> EffectiveProfile {
        resolve_effective(self.iter().map(|frame| &frame.profile))
    }
}

/// Effective profile at `path`.
pub fn get_profile(tree: &ProfileTree, path: &ProfilePath) -> Result<EffectiveProfile> {
    Ok(resolve_stack(tree, path)?.resolve())
}
