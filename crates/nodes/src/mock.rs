//! `MockNode` — a test double for `ExecutableNode`.
//!
//! Useful in runner tests where a real node implementation would need a
//! network or is irrelevant to what is being checked.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::{ExecutableNode, ExecutionContext, Item, NodeDescription, NodeError};

/// Behaviour injected into `MockNode` at construction time.
pub enum MockBehaviour {
    /// Merge the fields of this JSON object into every item.
    MergeFields(Value),
    /// Fail every item with an operation error.
    Fail(String),
    /// Fail only the item at the given index, merge nothing otherwise.
    FailAt { index: usize, message: String },
}

/// A mock node that records every call it receives and returns a
/// programmer-specified result.
pub struct MockNode {
    description: NodeDescription,
    /// What the node will do when `execute` is called.
    pub behaviour: MockBehaviour,
    /// `(item_index, item fields)` for every call, in call order.
    pub calls: Arc<Mutex<Vec<(usize, Value)>>>,
}

impl MockNode {
    fn with_behaviour(name: impl Into<String>, behaviour: MockBehaviour) -> Self {
        let name = name.into();
        Self {
            description: NodeDescription {
                display_name: name.clone(),
                name,
                description: "Test double".into(),
                version: 1,
                credentials: Vec::new(),
                properties: Vec::new(),
            },
            behaviour,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that merges `fields` into every item.
    pub fn merging(name: impl Into<String>, fields: Value) -> Self {
        Self::with_behaviour(name, MockBehaviour::MergeFields(fields))
    }

    /// Create a mock that fails every item.
    pub fn failing(name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::with_behaviour(name, MockBehaviour::Fail(msg.into()))
    }

    /// Create a mock that fails only the item at `index`.
    pub fn failing_at(name: impl Into<String>, index: usize, msg: impl Into<String>) -> Self {
        Self::with_behaviour(
            name,
            MockBehaviour::FailAt {
                index,
                message: msg.into(),
            },
        )
    }

    /// Number of times this node has been executed.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }
}

#[async_trait]
impl ExecutableNode for MockNode {
    fn description(&self) -> &NodeDescription {
        &self.description
    }

    async fn execute(
        &self,
        mut item: Item,
        item_index: usize,
        _parameters: &Value,
        _ctx: &ExecutionContext,
    ) -> Result<Item, NodeError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((item_index, Value::Object(item.json.clone())));
        }

        match &self.behaviour {
            MockBehaviour::MergeFields(fields) => {
                if let Some(obj) = fields.as_object() {
                    for (k, v) in obj {
                        item.json.insert(k.clone(), v.clone());
                    }
                }
                Ok(item)
            }
            MockBehaviour::Fail(msg) => Err(NodeError::Operation(msg.clone())),
            MockBehaviour::FailAt { index, message } if *index == item_index => {
                Err(NodeError::Operation(message.clone()))
            }
            MockBehaviour::FailAt { .. } => Ok(item),
        }
    }
}
