//! Core types for nodetree.
//!
//! This crate provides an in-memory hierarchy of directories and files:
//! node types, the arena-backed [`NodeTree`], delete options, configuration
//! and read-only views (statistics and snapshots) over a subtree.
//!
//! ```rust
//! use nodetree_core::NodeTree;
//!
//! let mut tree = NodeTree::new();
//! let root = tree.root();
//! let dir = tree.create_directory("dir1", root).unwrap();
//! let file = tree.create_file("file1.txt", dir, "Hello, World!").unwrap();
//!
//! assert_eq!(tree.find(root, "dir1/file1.txt").unwrap(), file);
//!
//! tree.delete(file, ["--force"]).unwrap();
//! assert!(tree.find(root, "dir1/file1.txt").is_err());
//! ```

mod clock;
mod config;
mod error;
mod node;
mod options;
mod snapshot;
mod stats;
mod tree;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{TreeConfig, TreeConfigBuilder};
pub use error::{Result, TreeError, validate_name};
pub use node::{Node, NodeId, NodeKind, Timestamps};
pub use options::{DeleteMode, DeleteOptions};
pub use snapshot::{SnapshotKind, SnapshotNode, TreeSnapshot};
pub use stats::TreeStats;
pub use tree::{Iter, NodeTree};
