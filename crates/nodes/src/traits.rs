//! The node traits — the contract every node must fulfil.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::{CredentialTestResult, DecryptedCredential, Item, NodeDescription, NodeError};

/// Shared context passed to every node during execution.
///
/// Defined here (in the nodes crate) so both the engine and individual node
/// implementations can import it without a circular dependency.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// ID of the parent workflow.
    pub workflow_id: uuid::Uuid,
    /// ID of the current execution run.
    pub execution_id: uuid::Uuid,
    /// Decrypted credentials, keyed by credential type name.
    pub credentials: HashMap<String, DecryptedCredential>,
}

impl ExecutionContext {
    /// A context with fresh IDs and no credentials.
    pub fn new() -> Self {
        Self {
            workflow_id: uuid::Uuid::new_v4(),
            execution_id: uuid::Uuid::new_v4(),
            credentials: HashMap::new(),
        }
    }

    pub fn with_credential(mut self, credential: DecryptedCredential) -> Self {
        self.credentials.insert(credential.type_name.clone(), credential);
        self
    }

    pub fn credential(&self, type_name: &str) -> Result<&DecryptedCredential, NodeError> {
        self.credentials.get(type_name).ok_or_else(|| {
            NodeError::MissingCredentials(format!("no '{type_name}' credential configured"))
        })
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// The core node trait.
///
/// The host resolves `parameters` against [`ExecutableNode::description`]
/// once per run and then calls `execute` for every input item in order.
#[async_trait]
pub trait ExecutableNode: Send + Sync {
    fn description(&self) -> &NodeDescription;

    /// Process one input item and return the matching output item.
    async fn execute(
        &self,
        item: Item,
        item_index: usize,
        parameters: &Value,
        ctx: &ExecutionContext,
    ) -> Result<Item, NodeError>;
}

/// Verifies that a stored credential actually works against the remote
/// service. Failures are reported in the result, never as an `Err`.
#[async_trait]
pub trait CredentialTester: Send + Sync {
    async fn test_credential(&self, credential: &DecryptedCredential) -> CredentialTestResult;
}
