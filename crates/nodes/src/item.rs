//! The unit of data flowing between nodes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Link from an output item back to the input item it was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedItem {
    /// Index of the originating input item.
    pub item: usize,
}

/// One record of workflow data.
///
/// Nodes receive items one at a time and return one item per input. Fields
/// a node does not own must pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub json: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paired_item: Option<PairedItem>,
}

impl Item {
    /// Build an item from a JSON value.
    ///
    /// Objects become the item's fields. Any other value is stored under a
    /// `data` key so that nothing the caller passed is dropped.
    pub fn from_value(value: Value) -> Self {
        let json = match value {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("data".to_owned(), other);
                map
            }
        };
        Self { json, paired_item: None }
    }

    /// Attach the index of the input item this one derives from.
    pub fn paired_with(mut self, index: usize) -> Self {
        self.paired_item = Some(PairedItem { item: index });
        self
    }
}
