//! File and directory node types.

use std::fmt;
use std::time::SystemTime;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Unique identifier for a node within a tree.
///
/// Ids index the tree's arena and are never reused, so a stale id can be
/// detected instead of silently aliasing a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Create a new NodeId from a u64.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node metadata timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    /// Set once at construction.
    pub created: SystemTime,
    /// Last mutation time (soft delete refreshes it).
    pub modified: SystemTime,
}

impl Timestamps {
    /// Create timestamps with both fields set to `now`.
    pub fn new(now: SystemTime) -> Self {
        Self {
            created: now,
            modified: now,
        }
    }
}

/// Type of node and its kind-specific contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Directory with its children in insertion order.
    Directory { children: Vec<NodeId> },
    /// Regular file holding an opaque payload.
    File { payload: Vec<u8> },
}

impl NodeKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, NodeKind::Directory { .. })
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, NodeKind::File { .. })
    }

    /// Single-character type marker, as in `ls -l`.
    pub fn marker(&self) -> char {
        match self {
            NodeKind::Directory { .. } => 'd',
            NodeKind::File { .. } => '-',
        }
    }
}

/// A single file or directory in the tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    name: CompactString,
    kind: NodeKind,
    parent: Option<NodeId>,
    timestamps: Timestamps,
    deleted: bool,
}

impl Node {
    pub(crate) fn new_directory(
        id: NodeId,
        name: impl Into<CompactString>,
        parent: Option<NodeId>,
        now: SystemTime,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind: NodeKind::Directory {
                children: Vec::new(),
            },
            parent,
            timestamps: Timestamps::new(now),
            deleted: false,
        }
    }

    pub(crate) fn new_file(
        id: NodeId,
        name: impl Into<CompactString>,
        parent: Option<NodeId>,
        payload: Vec<u8>,
        now: SystemTime,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind: NodeKind::File { payload },
            parent,
            timestamps: Timestamps::new(now),
            deleted: false,
        }
    }

    /// Identifier of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Node name (a single path segment, `/` for the root).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node type and contents.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Parent node, `None` for the root and for detached nodes.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn timestamps(&self) -> Timestamps {
        self.timestamps
    }

    /// Whether this node carries a tombstone.
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Check if this node is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Check if this node is a file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Children in insertion order, `None` for files.
    pub fn children(&self) -> Option<&[NodeId]> {
        match &self.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }

    /// File contents, `None` for directories.
    pub fn payload(&self) -> Option<&[u8]> {
        match &self.kind {
            NodeKind::File { payload } => Some(payload),
            NodeKind::Directory { .. } => None,
        }
    }

    /// Payload length in bytes, `None` for directories.
    pub fn payload_len(&self) -> Option<u64> {
        self.payload().map(|p| p.len() as u64)
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match &mut self.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    /// Set the tombstone. `modified` never moves backwards.
    pub(crate) fn mark_deleted(&mut self, now: SystemTime) {
        self.deleted = true;
        self.timestamps.modified = self.timestamps.modified.max(now);
    }
}
