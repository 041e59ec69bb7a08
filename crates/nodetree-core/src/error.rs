//! Error types for tree operations.

use thiserror::Error;

use crate::node::NodeId;

/// Errors that can occur while building, mutating or querying a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The action is not allowed on this node (e.g. deleting the root).
    #[error("Action not allowed: {action}")]
    ActionNotAllowed { action: String },

    /// Path resolution failed.
    #[error("Path not found: {path}")]
    NotFound { path: String },

    /// The id was not issued by this tree, or its node has been reclaimed.
    #[error("Invalid node handle: {id}")]
    InvalidHandle { id: NodeId },

    /// Children can only be attached to directories.
    #[error("Not a directory: {id}")]
    NotADirectory { id: NodeId },

    /// The node name is not usable as a path segment.
    #[error("Invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// A sibling with the same name already exists.
    #[error("Name already exists: {name}")]
    AlreadyExists { name: String },
}

impl TreeError {
    pub(crate) fn not_allowed(action: impl Into<String>) -> Self {
        Self::ActionNotAllowed {
            action: action.into(),
        }
    }

    pub(crate) fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Check if this is a lookup miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Convenience alias for tree results.
pub type Result<T, E = TreeError> = std::result::Result<T, E>;

/// Validate a node name for use as a single path segment.
///
/// Only `/` is rejected: a name containing it can never match a segment.
pub fn validate_name(name: &str) -> Result<()> {
    if name.contains('/') {
        return Err(TreeError::InvalidName {
            name: name.to_string(),
            reason: "name cannot contain '/'".to_string(),
        });
    }
    Ok(())
}
