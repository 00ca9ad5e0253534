//! `ProfileManager`: the engine bound to its two collaborators.
//!
//! Saving lives in [`crate::writer`], loading in [`crate::loader`]; this
//! module holds construction and the read-only queries.

use crate::error::Result;
use crate::extension_config::ExtensionConfig;
use crate::navigator::{self, ProfileStack};
use crate::path::ProfilePath;
use crate::resolver::EffectiveProfile;
use crate::store::{ComponentManager, ConfigurationStore};

/// Profile operations over an explicit configuration store and component manager.
///
/// Every operation reads the envelope fresh from the store and, when it
/// mutates, writes the whole envelope back. Only one session is expected to
/// drive a given store at a time.
#[derive(Debug)]
pub struct ProfileManager<S, C> {
    pub(crate) store: S,
    pub(crate) components: C,
}

impl<S, C> ProfileManager<S, C>
where
    S: ConfigurationStore,
    C: ComponentManager,
{
    pub fn new(store: S, components: C) -> Self {
        Self { store, components }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn components(&self) -> &C {
        &self.components
    }

    /// Give the collaborators back.
    pub fn into_parts(self) -> (S, C) {
        (self.store, self.components)
    }

    /// Current persisted envelope.
    pub fn config(&self) -> Result<ExtensionConfig> {
        Ok(self.store.read_extension_config()?)
    }

    /// Path of the active profile, if any.
    pub fn active_profile(&self) -> Result<Option<ProfilePath>> {
        Ok(self.config()?.active_profile)
    }

    /// Linked ancestor stack for `path`.
    pub fn profile_stack(&self, path: &ProfilePath) -> Result<ProfileStack> {
        navigator::resolve_stack(&self.config()?.profiles_list, path)
    }

    /// Effective (fully merged) profile at `path`.
    pub fn get_profile(&self, path: &ProfilePath) -> Result<EffectiveProfile> {
        Ok(self.profile_stack(path)?.resolve())
    }

    /// True when a profile exists at `path`.
    ///
    /// Only resolution failures mean "does not exist"; store read failures
    /// are returned as errors.
    pub fn profile_exists(&self, path: &ProfilePath) -> Result<bool> {
        let config = self.config()?;
        Ok(navigator::profile_exists(&config.profiles_list, path))
    }
}
