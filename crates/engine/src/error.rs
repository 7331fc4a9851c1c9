//! Engine-level error types.

use thiserror::Error;

use nodes::NodeError;

/// Errors produced by the runner.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No node implementation is registered under the requested type.
    #[error("no implementation registered for node_type '{0}'")]
    UnknownNodeType(String),

    /// A node rejected its configuration before any item was processed.
    #[error("node '{node_id}' has invalid parameters: {source}")]
    InvalidParameters {
        node_id: String,
        #[source]
        source: NodeError,
    },

    /// A node failed on an item; the whole run is aborted.
    #[error("node '{node_id}' failed on item {item_index}: {source}")]
    NodeFailed {
        node_id: String,
        item_index: usize,
        #[source]
        source: NodeError,
    },
}

impl EngineError {
    /// The node's own message for item failures, the full text otherwise.
    pub fn user_message(&self) -> String {
        match self {
            Self::NodeFailed { source, .. } => source.to_string(),
            other => other.to_string(),
        }
    }
}
