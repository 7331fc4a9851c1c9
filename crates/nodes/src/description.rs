//! Declarative node and credential schemas.
//!
//! A node describes its parameters as plain data: name, type, default and
//! the conditions under which a parameter applies. Hosts render these however
//! they like; the runner only needs [`NodeDescription::resolve_parameters`]
//! to fill in defaults before handing the configuration to the node.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::NodeError;

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

/// One selectable value of an `options` property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionValue {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OptionValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            action: None,
            description: None,
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// The value type of a property, plus any type-specific settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyKind {
    String {
        /// Masked in the UI and never echoed back.
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        password: bool,
    },
    Number,
    Boolean,
    Options { options: Vec<OptionValue> },
    /// A group of optional sub-properties the user adds one at a time.
    Collection { options: Vec<PropertyDescription> },
}

/// Shows a property only while another parameter holds a given value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayCondition {
    pub parameter: String,
    pub equals: Value,
}

/// One configurable parameter of a node or credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescription {
    pub name: String,
    pub display_name: String,
    #[serde(flatten)]
    pub kind: PropertyKind,
    pub default: Value,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// All conditions must hold for the property to apply.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub show_when: Vec<DisplayCondition>,
}

impl PropertyDescription {
    fn new(name: &str, display_name: &str, kind: PropertyKind, default: Value) -> Self {
        Self {
            name: name.to_owned(),
            display_name: display_name.to_owned(),
            kind,
            default,
            required: false,
            description: None,
            placeholder: None,
            show_when: Vec::new(),
        }
    }

    pub fn string(name: &str, display_name: &str, default: &str) -> Self {
        Self::new(
            name,
            display_name,
            PropertyKind::String { password: false },
            Value::String(default.to_owned()),
        )
    }

    pub fn number(name: &str, display_name: &str, default: f64) -> Self {
        Self::new(name, display_name, PropertyKind::Number, Value::from(default))
    }

    pub fn boolean(name: &str, display_name: &str, default: bool) -> Self {
        Self::new(name, display_name, PropertyKind::Boolean, Value::Bool(default))
    }

    pub fn options(name: &str, display_name: &str, options: Vec<OptionValue>, default: &str) -> Self {
        Self::new(
            name,
            display_name,
            PropertyKind::Options { options },
            Value::String(default.to_owned()),
        )
    }

    pub fn collection(name: &str, display_name: &str, options: Vec<PropertyDescription>) -> Self {
        Self::new(
            name,
            display_name,
            PropertyKind::Collection { options },
            Value::Object(Map::new()),
        )
    }

    /// Mask the value in the UI. Only meaningful for string properties.
    pub fn password(mut self) -> Self {
        if let PropertyKind::String { password } = &mut self.kind {
            *password = true;
        }
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_owned());
        self
    }

    pub fn shown_when(mut self, parameter: &str, equals: impl Into<Value>) -> Self {
        self.show_when.push(DisplayCondition {
            parameter: parameter.to_owned(),
            equals: equals.into(),
        });
        self
    }

    /// Whether this property applies given the current parameter values.
    pub fn is_visible(&self, parameters: &Value) -> bool {
        self.show_when
            .iter()
            .all(|cond| parameters.get(&cond.parameter) == Some(&cond.equals))
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Shape of a stored credential type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialDescription {
    pub name: String,
    pub display_name: String,
    pub properties: Vec<PropertyDescription>,
}

/// A node's reference to a credential type it consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialRef {
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub required: bool,
    /// Name of the connection test registered for this credential, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tested_by: Option<String>,
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// Everything a host needs to know to present and configure a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescription {
    /// Registry key, e.g. `wigle`.
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub version: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub credentials: Vec<CredentialRef>,
    pub properties: Vec<PropertyDescription>,
}

impl NodeDescription {
    pub fn property(&self, name: &str) -> Option<&PropertyDescription> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Fill every missing or `null` top-level parameter with its declared
    /// default.
    ///
    /// Collections default to an empty object; their sub-options are left
    /// unset so the node can tell "not added" apart from "added with the
    /// default value". Parameters the description does not declare are kept.
    pub fn resolve_parameters(&self, config: &Value) -> Result<Value, NodeError> {
        let mut resolved = match config {
            Value::Null => Map::new(),
            Value::Object(map) => map.clone(),
            other => {
                return Err(NodeError::InvalidParameters(format!(
                    "expected an object for node '{}', got {other}",
                    self.name
                )))
            }
        };

        for property in &self.properties {
            let slot = resolved.entry(property.name.clone()).or_insert(Value::Null);
            if slot.is_null() {
                *slot = property.default.clone();
            }
        }

        Ok(Value::Object(resolved))
    }
}
