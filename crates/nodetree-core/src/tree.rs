//! Arena-backed node tree.

use tracing::instrument;

use crate::clock::{Clock, SystemClock};
use crate::config::TreeConfig;
use crate::error::{Result, TreeError, validate_name};
use crate::node::{Node, NodeId};
use crate::options::{DeleteMode, DeleteOptions};

/// In-memory directory/file hierarchy.
///
/// All nodes live in an arena owned by the tree and are addressed by
/// [`NodeId`]. Parent links are ids used for navigation only. Hard-deleted
/// subtrees stay in the arena, detached, until [`NodeTree::reclaim`] frees
/// them.
#[derive(Debug)]
pub struct NodeTree<C: Clock = SystemClock> {
    nodes: Vec<Option<Node>>,
    root: NodeId,
    config: TreeConfig,
    clock: C,
}

impl NodeTree<SystemClock> {
    /// Create a tree holding only a root directory named `/`.
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Create a tree with explicit configuration.
    pub fn with_config(config: TreeConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for NodeTree<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> NodeTree<C> {
    /// Create a tree that stamps nodes using `clock`.
    pub fn with_clock(config: TreeConfig, clock: C) -> Self {
        let root = NodeId::new(0);
        let node = Node::new_directory(root, config.root_name.as_str(), None, clock.now());
        tracing::debug!(root_name = %config.root_name, "created tree");

        Self {
            nodes: vec![Some(node)],
            root,
            config,
            clock,
        }
    }

    /// Id of the root directory.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Number of nodes held by the arena, detached ones included.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    /// Check if `id` refers to a live node of this tree.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_ok()
    }

    /// Borrow a node.
    pub fn get(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(TreeError::InvalidHandle { id })
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(TreeError::InvalidHandle { id })
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.get(id)?.parent())
    }

    /// Children of `id` in insertion order.
    ///
    /// Files have no child sequence at all and yield `NotADirectory`.
    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        self.get(id)?
            .children()
            .ok_or(TreeError::NotADirectory { id })
    }

    /// Check if `id` is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> Result<bool> {
        Ok(self.topmost(id)? == self.root)
    }

    /// Slash-separated path of `id`.
    ///
    /// Attached nodes get an absolute path (`/dir1/file1.txt`, `/` for the
    /// root). Detached nodes get a path relative to the top of their
    /// detached subtree.
    pub fn path_of(&self, id: NodeId) -> Result<String> {
        let mut segments = Vec::new();
        let mut current = id;
        loop {
            let node = self.get(current)?;
            match node.parent() {
                Some(parent) => {
                    segments.push(node.name());
                    current = parent;
                }
                None if current == self.root => {
                    segments.reverse();
                    return Ok(format!("/{}", segments.join("/")));
                }
                None => {
                    segments.push(node.name());
                    segments.reverse();
                    return Ok(segments.join("/"));
                }
            }
        }
    }

    /// Create a directory under `parent`.
    #[instrument(level = "debug", skip(self))]
    pub fn create_directory(&mut self, name: &str, parent: NodeId) -> Result<NodeId> {
        let now = self.clock.now();
        self.insert(name, parent, |id| Node::new_directory(id, name, Some(parent), now))
    }

    /// Create a file holding `payload` under `parent`.
    #[instrument(level = "debug", skip(self, payload))]
    pub fn create_file(
        &mut self,
        name: &str,
        parent: NodeId,
        payload: impl Into<Vec<u8>>,
    ) -> Result<NodeId> {
        let now = self.clock.now();
        let payload = payload.into();
        self.insert(name, parent, |id| Node::new_file(id, name, Some(parent), payload, now))
    }

    fn insert(
        &mut self,
        name: &str,
        parent: NodeId,
        make: impl FnOnce(NodeId) -> Node,
    ) -> Result<NodeId> {
        validate_name(name)?;
        self.check_attachable(parent, name, None)?;

        let id = NodeId::new(self.nodes.len() as u64);
        self.nodes.push(Some(make(id)));
        self.push_child(parent, id)?;

        tracing::debug!(%id, %parent, name, "attached new node");
        Ok(id)
    }

    /// Attach an existing node as the last child of `parent`.
    ///
    /// A child that is currently attached elsewhere is unlinked from its old
    /// parent first.
    #[instrument(level = "debug", skip(self))]
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let name = self.get(child)?.name().to_string();
        if child == self.root {
            return Err(TreeError::not_allowed("attach the root node as a child"));
        }
        if self.is_ancestor_or_self(child, parent)? {
            return Err(TreeError::not_allowed(format!("attach {child} beneath itself")));
        }
        self.check_attachable(parent, &name, Some(child))?;

        self.unlink(child)?;
        self.push_child(parent, child)?;
        self.get_mut(child)?.set_parent(Some(parent));
        Ok(())
    }

    fn check_attachable(&self, parent: NodeId, name: &str, moving: Option<NodeId>) -> Result<()> {
        let children = self.children(parent)?;

        if self.config.unique_names {
            let taken = children
                .iter()
                .filter(|&&c| Some(c) != moving)
                .any(|&c| self.get(c).is_ok_and(|n| n.name() == name));
            if taken {
                return Err(TreeError::AlreadyExists {
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }

    fn push_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        match self.get_mut(parent)?.children_mut() {
            Some(children) => {
                children.push(child);
                Ok(())
            }
            None => Err(TreeError::NotADirectory { id: parent }),
        }
    }

    /// Remove `id` from its parent's children. Returns `false` if it had no parent.
    fn unlink(&mut self, id: NodeId) -> Result<bool> {
        let Some(parent) = self.get(id)?.parent() else {
            return Ok(false);
        };

        if let Some(children) = self.get_mut(parent)?.children_mut() {
            if let Some(pos) = children.iter().position(|&c| c == id) {
                children.remove(pos);
            }
        }
        self.get_mut(id)?.set_parent(None);
        Ok(true)
    }

    fn topmost(&self, id: NodeId) -> Result<NodeId> {
        let mut current = id;
        while let Some(parent) = self.get(current)?.parent() {
            current = parent;
        }
        Ok(current)
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> Result<bool> {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return Ok(true);
            }
            current = self.get(node)?.parent();
        }
        Ok(false)
    }

    /// Delete a node according to option tokens.
    ///
    /// `--force` or `-f` (the configured force tokens) select a hard delete,
    /// anything else a soft delete. Returns the mode that was applied.
    pub fn delete<I, S>(&mut self, id: NodeId, options: I) -> Result<DeleteMode>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mode = DeleteOptions::parse(options, &self.config).mode;
        self.delete_with(id, mode)?;
        Ok(mode)
    }

    /// Delete a node with an explicit mode.
    ///
    /// Soft delete sets the tombstone and refreshes `modified`. Hard delete
    /// unlinks the node from its parent; its descendants stay attached to it
    /// and become unreachable from the root. Hard-deleting an already
    /// detached node does nothing.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_with(&mut self, id: NodeId, mode: DeleteMode) -> Result<()> {
        self.get(id)?;
        if id == self.root {
            return Err(TreeError::not_allowed("delete the root node"));
        }

        match mode {
            DeleteMode::Soft => {
                let now = self.clock.now();
                self.get_mut(id)?.mark_deleted(now);
            }
            DeleteMode::Hard => {
                if !self.unlink(id)? {
                    tracing::debug!(%id, "node already detached");
                }
            }
        }
        Ok(())
    }

    /// Pre-order iterator over `id` and all of its descendants.
    pub fn iter(&self, id: NodeId) -> Result<Iter<'_, C>> {
        self.get(id)?;
        Ok(Iter {
            tree: self,
            stack: vec![id],
        })
    }

    /// Visit `id` and every descendant in pre-order, tombstones included.
    pub fn walk<F>(&self, id: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(&Node),
    {
        for node in self.iter(id)? {
            visit(node);
        }
        Ok(())
    }

    /// Resolve a slash-separated path relative to `id`.
    ///
    /// `""` and `"/"` resolve to `id` itself. Leading and trailing slashes are
    /// stripped; every remaining segment, empty ones included, must match a
    /// child name. The first matching child wins.
    pub fn find(&self, id: NodeId, path: &str) -> Result<NodeId> {
        self.get(id)?;
        if path.is_empty() || path == "/" {
            return Ok(id);
        }

        let mut current = id;
        for segment in path.trim_matches('/').split('/') {
            current = self
                .get(current)?
                .children()
                .unwrap_or_default()
                .iter()
                .copied()
                .find(|&child| self.get(child).is_ok_and(|n| n.name() == segment))
                .ok_or_else(|| TreeError::not_found(path))?;
        }

        tracing::trace!(from = %id, path, found = %current, "resolved path");
        Ok(current)
    }

    /// Drop every node that is no longer reachable from the root.
    ///
    /// Ids of reclaimed nodes become invalid. Returns the number of nodes freed.
    #[instrument(level = "debug", skip(self))]
    pub fn reclaim(&mut self) -> usize {
        let mut reachable = vec![false; self.nodes.len()];
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            reachable[id.index()] = true;
            if let Ok(node) = self.get(id) {
                stack.extend_from_slice(node.children().unwrap_or_default());
            }
        }

        let mut freed = 0;
        for (slot, keep) in self.nodes.iter_mut().zip(reachable) {
            if !keep && slot.take().is_some() {
                freed += 1;
            }
        }

        tracing::debug!(freed, "reclaimed detached nodes");
        freed
    }
}

/// Pre-order iterator over a subtree.
pub struct Iter<'a, C: Clock> {
    tree: &'a NodeTree<C>,
    stack: Vec<NodeId>,
}

impl<'a, C: Clock> Iterator for Iter<'a, C> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if let Ok(node) = self.tree.get(id) {
                // Reverse so the first child is popped next.
                let children = node.children().unwrap_or_default();
                self.stack.extend(children.iter().rev());
                return Some(node);
            }
        }
        None
    }
}
