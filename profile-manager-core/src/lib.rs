//! Profile tree engine for profile-manager.
//!
//! Profiles are named nodes in a tree. Each node stores only the settings and
//! components that differ from what its ancestors already provide. This crate
//! provides:
//!
//! - The arena-backed profile tree and its persisted nested form
//! - Dotted path navigation and linked ancestor stacks
//! - Resolution of a path into its effective settings and components
//! - Delta saves with cascading de-duplication of descendants
//! - Loads that converge installed components and live settings
//! - Collaborator traits for the configuration store and component manager,
//!   plus in-memory implementations

pub mod error;
pub mod extension_config;
pub mod loader;
mod manager;
pub mod memory;
pub mod navigator;
pub mod path;
pub mod resolver;
pub mod store;
pub mod tree;
pub mod value;
pub mod writer;

pub use error::{ComponentError, ProfileError, StoreError};
pub use extension_config::{ExtensionConfig, keys};
pub use loader::LoadReport;
pub use manager::ProfileManager;
pub use navigator::{ProfileStack, profile_exists, resolve_chain, resolve_stack};
pub use path::ProfilePath;
pub use resolver::{EffectiveProfile, get_profile, resolve_effective};
pub use store::{ComponentManager, ConfigurationStore, WriteMode};
pub use tree::{NodeId, Profile, ProfileNode, ProfileTree};
pub use value::{Components, Settings};
pub use writer::{CleanupStats, SaveSummary, SaveTarget};
