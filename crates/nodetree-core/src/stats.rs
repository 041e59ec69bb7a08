//! Subtree statistics.

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::Result;
use crate::node::{Node, NodeId};
use crate::tree::NodeTree;

/// Summary statistics for a subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Number of directories, the starting node included.
    pub total_dirs: u64,
    /// Number of files.
    pub total_files: u64,
    /// Number of soft-deleted nodes.
    pub total_deleted: u64,
    /// Sum of all file payload lengths.
    pub total_bytes: u64,
    /// Deepest level below the starting node (0 when it has no children).
    pub max_depth: u32,
}

impl TreeStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gather statistics for `id` and everything below it.
    pub fn collect<C: Clock>(tree: &NodeTree<C>, id: NodeId) -> Result<Self> {
        let mut stats = Self::new();
        let mut stack = vec![(id, 0u32)];
        while let Some((current, depth)) = stack.pop() {
            let node = tree.get(current)?;
            stats.record(node, depth);
            let children = node.children().unwrap_or_default();
            stack.extend(children.iter().map(|&c| (c, depth + 1)));
        }
        Ok(stats)
    }

    /// Update stats with a single node seen at `depth`.
    pub fn record(&mut self, node: &Node, depth: u32) {
        match node.payload_len() {
            Some(len) => {
                self.total_files += 1;
                self.total_bytes += len;
            }
            None => self.total_dirs += 1,
        }
        if node.is_deleted() {
            self.total_deleted += 1;
        }
        self.max_depth = self.max_depth.max(depth);
    }

    /// Total number of nodes counted.
    pub fn total_nodes(&self) -> u64 {
        self.total_dirs + self.total_files
    }
}
