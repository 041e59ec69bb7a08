//! Delete option parsing.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::config::TreeConfig;

/// How a node is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum DeleteMode {
    /// Set the tombstone flag; the node stays in the tree.
    Soft,
    /// Unlink the node from its parent.
    Hard,
}

/// Parsed delete options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOptions {
    pub mode: DeleteMode,
}

impl DeleteOptions {
    /// Parse option tokens. Any configured force token selects a hard delete.
    pub fn parse<I, S>(tokens: I, config: &TreeConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut mode = DeleteMode::Soft;
        for token in tokens {
            let token = token.as_ref();
            if config.is_force_token(token) {
                mode = DeleteMode::Hard;
            } else {
                tracing::debug!(token, "ignoring unknown delete option");
            }
        }
        Self { mode }
    }
}

impl Default for DeleteOptions {
    fn default() -> Self {
        Self {
            mode: DeleteMode::Soft,
        }
    }
}
