//! Serializable nested view of a subtree.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::Result;
use crate::node::{NodeId, Timestamps};
use crate::stats::TreeStats;
use crate::tree::NodeTree;

/// Node type as it appears in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotKind {
    Directory,
    File,
}

/// One node of a snapshot, with its children inlined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub id: NodeId,
    pub name: String,
    pub kind: SnapshotKind,
    pub timestamps: Timestamps,
    pub deleted: bool,
    /// Payload length for files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SnapshotNode>,
}

/// Point-in-time copy of a subtree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSnapshot {
    /// Path of the captured node.
    pub path: String,
    pub taken_at: SystemTime,
    pub stats: TreeStats,
    pub root: SnapshotNode,
}

impl TreeSnapshot {
    /// Capture `id` and everything below it.
    pub fn capture<C: Clock>(tree: &NodeTree<C>, id: NodeId) -> Result<Self> {
        Ok(Self {
            path: tree.path_of(id)?,
            taken_at: tree.clock().now(),
            stats: TreeStats::collect(tree, id)?,
            root: capture_node(tree, id)?,
        })
    }
}

fn capture_node<C: Clock>(tree: &NodeTree<C>, id: NodeId) -> Result<SnapshotNode> {
    let node = tree.get(id)?;
    let children = node
        .children()
        .unwrap_or_default()
        .iter()
        .map(|&child| capture_node(tree, child))
        .collect::<Result<Vec<_>>>()?;

    Ok(SnapshotNode {
        id,
        name: node.name().to_string(),
        kind: if node.is_dir() {
            SnapshotKind::Directory
        } else {
            SnapshotKind::File
        },
        timestamps: node.timestamps(),
        deleted: node.is_deleted(),
        size: node.payload_len(),
        children,
    })
}
