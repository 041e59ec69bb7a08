//! Tree configuration types.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration for a node tree.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct TreeConfig {
    /// Name given to the root directory.
    #[builder(default = "default_root_name()")]
    #[serde(default = "default_root_name")]
    pub root_name: String,

    /// Reject a new child whose name is already used by a sibling.
    #[builder(default = "false")]
    #[serde(default)]
    pub unique_names: bool,

    /// Delete option tokens that select a hard delete.
    #[builder(default = "default_force_tokens()")]
    #[serde(default = "default_force_tokens")]
    pub force_tokens: Vec<String>,
}

fn default_root_name() -> String {
    "/".to_string()
}

fn default_force_tokens() -> Vec<String> {
    vec!["--force".to_string(), "-f".to_string()]
}

impl TreeConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root_name) = self.root_name {
            if root_name.is_empty() {
                return Err("Root name cannot be empty".to_string());
            }
        }
        if let Some(ref tokens) = self.force_tokens {
            if tokens.is_empty() {
                return Err("At least one force token is required".to_string());
            }
        }
        Ok(())
    }
}

impl TreeConfig {
    /// Create a new tree config builder.
    pub fn builder() -> TreeConfigBuilder {
        TreeConfigBuilder::default()
    }

    /// Check if a delete option token requests a hard delete.
    pub fn is_force_token(&self, token: &str) -> bool {
        self.force_tokens.iter().any(|t| t == token)
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            root_name: default_root_name(),
            unique_names: false,
            force_tokens: default_force_tokens(),
        }
    }
}
