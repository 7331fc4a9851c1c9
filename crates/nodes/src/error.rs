//! Node-level error type.

use thiserror::Error;

/// Errors returned by a node's `execute` method.
///
/// The runner treats every variant as terminal for the item that produced
/// it. Whether that aborts the whole run depends on the host's
/// continue-on-fail setting, not on the variant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// The node's configuration could not be resolved into typed parameters.
    #[error("invalid node parameters: {0}")]
    InvalidParameters(String),

    /// A credential the node requires was not supplied, or lacks a field.
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    /// User-visible operation failure. The message is shown verbatim.
    #[error("{0}")]
    Operation(String),
}
