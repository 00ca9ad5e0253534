//! Path navigation: turning a dotted path into the chain of nodes it denotes.

use crate::error::{ProfileError, Result};
use crate::path::ProfilePath;
use crate::tree::{NodeId, Profile, ProfileTree};

/// Resolve `path` into its nodes, root first.
///
/// Fails with [`ProfileError::NoProfilesExist`] on an empty tree and with
/// [`ProfileError::NodeNotFound`] naming the first prefix that does not
/// resolve. No partial chain is ever returned.
pub fn resolve_chain(tree: &ProfileTree, path: &ProfilePath) -> Result<Vec<NodeId>> {
    if tree.is_empty() {
        log::debug!("Cannot resolve \"{}\": no profiles exist", path);
        return Err(ProfileError::NoProfilesExist);
    }

    let mut chain = Vec::with_capacity(path.len());
    let mut parent = None;
    for (index, segment) in path.segments().iter().enumerate() {
        let Some(id) = tree.child(parent, segment) else {
            let prefix = path.prefix(index + 1);
            log::debug!("Profile path \"{}\" stops resolving at \"{}\"", path, prefix);
            return Err(ProfileError::NodeNotFound { prefix });
        };
        chain.push(id);
        parent = Some(id);
    }
    Ok(chain)
}

/// Resolve the chain of the parent of `path`.
///
/// A top-level path has no ancestors and yields an empty chain without
/// consulting the tree.
pub fn resolve_parent_chain(tree: &ProfileTree, path: &ProfilePath) -> Result<Vec<NodeId>> {
    match path.parent() {
        Some(parent) => resolve_chain(tree, &parent),
        None => Ok(Vec::new()),
    }
}

/// True when `path` resolves in `tree`.
pub fn profile_exists(tree: &ProfileTree, path: &ProfilePath) -> bool {
    match resolve_chain(tree, path) {
        Ok(_) => true,
        Err(e) if e.is_resolution_failure() => false,
        Err(_) => true,
    }
}

/// One frame of an ancestor chain, linked root to leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileStack {
    /// Local name of the node this frame was taken from.
    pub id: String,
    /// Snapshot of the node's own settings and components.
    pub profile: Profile,
    /// Next frame towards the leaf.
    pub next: Option<Box<ProfileStack>>,
}

impl ProfileStack {
    /// Snapshot a resolved chain. Returns `None` for an empty chain.
    pub fn from_chain(tree: &ProfileTree, chain: &[NodeId]) -> Option<Self> {
        chain.iter().rev().fold(None, |next, id| {
            let node = tree.node(*id);
            Some(ProfileStack {
                id: node.name().to_string(),
                profile: node.profile.clone(),
                next: next.map(Box::new),
            })
        })
    }

    /// Frames in root to leaf order.
    pub fn iter(&self) -> StackIter<'_> {
        StackIter { next: Some(self) }
    }

    /// Number of frames.
    pub fn depth(&self) -> usize {
        self.iter().count()
    }

    /// Dotted path spelled by the frame ids.
    pub fn path(&self) -> String {
        self.iter()
            .map(|frame| frame.id.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Iterator over the frames of a [`ProfileStack`].
pub struct StackIter<'a> {
    next: Option<&'a ProfileStack>,
}

impl<'a> Iterator for StackIter<'a> {
    type Item = &'a ProfileStack;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.next.as_deref();
        Some(current)
    }
}

/// Resolve `path` and snapshot its chain as a linked stack.
pub fn resolve_stack(tree: &ProfileTree, path: &ProfilePath) -> Result<ProfileStack> {
    let chain = resolve_chain(tree, path)?;
    // A resolved chain always has one node per segment.
    ProfileStack::from_chain(tree, &chain).ok_or(ProfileError::NoProfilesExist)
}
