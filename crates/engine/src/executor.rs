//! Node execution runner.
//!
//! `NodeExecutor` plays the host's part for a single node:
//! 1. Looks the node up in the registry by `node_type`.
//! 2. Resolves the configured parameters against the node's description.
//! 3. Feeds input items to the node strictly one after another.
//! 4. Applies the failure policy: abort on the first failed item, or, with
//!    `continue_on_fail`, emit an error item and carry on.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument, warn};

use nodes::{ExecutableNode, ExecutionContext, Item};

use crate::{EngineError, NodeDefinition};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tuning knobs for the executor.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ExecutorConfig {
    /// Turn a failed item into `{ "error": <message> }` instead of aborting.
    #[serde(default)]
    pub continue_on_fail: bool,
}

// ---------------------------------------------------------------------------
// Node registry
// ---------------------------------------------------------------------------

/// Maps `node_type` strings to shared `ExecutableNode` implementations.
pub type NodeRegistry = HashMap<String, Arc<dyn ExecutableNode>>;

// ---------------------------------------------------------------------------
// Output of a completed run
// ---------------------------------------------------------------------------

/// The result of running a node over all its input items.
#[derive(Debug)]
pub struct ExecutionResult {
    pub execution_id: uuid::Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// One output item per input item, in input order.
    pub items: Vec<Item>,
}

// ---------------------------------------------------------------------------
// NodeExecutor
// ---------------------------------------------------------------------------

/// Stateless runner; holds only the registry and its configuration.
pub struct NodeExecutor {
    registry: NodeRegistry,
    config: ExecutorConfig,
}

impl NodeExecutor {
    pub fn new(registry: NodeRegistry, config: ExecutorConfig) -> Self {
        Self { registry, config }
    }

    /// Register a node under the name its description declares.
    pub fn register(&mut self, node: Arc<dyn ExecutableNode>) {
        let name = node.description().name.clone();
        self.registry.insert(name, node);
    }

    /// Run `definition` over `items` and return the output items.
    ///
    /// # Errors
    /// Returns `EngineError` for unknown node types, parameters that do not
    /// resolve, or (unless `continue_on_fail` is set) the first failed item.
    #[instrument(skip(self, items, ctx), fields(node_id = %definition.id, execution_id = %ctx.execution_id))]
    pub async fn run(
        &self,
        definition: &NodeDefinition,
        items: Vec<Item>,
        ctx: &ExecutionContext,
    ) -> Result<ExecutionResult, EngineError> {
        let started_at = Utc::now();

        let node = self
            .registry
            .get(&definition.node_type)
            .ok_or_else(|| EngineError::UnknownNodeType(definition.node_type.clone()))?;

        let parameters = node
            .description()
            .resolve_parameters(&definition.parameters)
            .map_err(|source| EngineError::InvalidParameters {
                node_id: definition.id.clone(),
                source,
            })?;
        debug!("resolved parameters: {parameters}");

        info!(
            "executing node '{}' ({}) over {} items",
            definition.id,
            definition.node_type,
            items.len()
        );

        let mut output = Vec::with_capacity(items.len());

        for (item_index, item) in items.into_iter().enumerate() {
            match node.execute(item, item_index, &parameters, ctx).await {
                Ok(out) => {
                    debug!("item {item_index} succeeded");
                    output.push(out);
                }

                Err(err) if self.config.continue_on_fail => {
                    warn!("item {item_index} failed, continuing: {err}");
                    output.push(error_item(item_index, &err.to_string()));
                }

                Err(source) => {
                    error!("node '{}' failed on item {item_index}: {source}", definition.id);
                    return Err(EngineError::NodeFailed {
                        node_id: definition.id.clone(),
                        item_index,
                        source,
                    });
                }
            }
        }

        info!("node '{}' produced {} items", definition.id, output.len());

        Ok(ExecutionResult {
            execution_id: ctx.execution_id,
            started_at,
            finished_at: Utc::now(),
            items: output,
        })
    }
}

fn error_item(item_index: usize, message: &str) -> Item {
    Item::from_value(json!({ "error": Value::String(message.to_owned()) })).paired_with(item_index)
}
