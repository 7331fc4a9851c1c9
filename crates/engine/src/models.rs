//! Core domain models for the runner.
//!
//! A node definition is what a workflow stores for one step: which node
//! implementation to run and the raw parameter object the user configured.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// NodeDefinition
// ---------------------------------------------------------------------------

/// A single configured node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDefinition {
    /// Identifier of this step, used in logs and errors.
    pub id: String,
    /// Maps to a registered `ExecutableNode` implementation.
    pub node_type: String,
    /// Parameter object as configured; defaults are filled at run time.
    #[serde(default)]
    pub parameters: serde_json::Value,
}

impl NodeDefinition {
    pub fn new(
        id: impl Into<String>,
        node_type: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            parameters,
        }
    }
}
