//! Decrypted credential material handed to nodes at call time.

use std::collections::HashMap;

use secrecy::SecretString;
use serde::Serialize;

use crate::NodeError;

/// A credential after the host has decrypted it.
///
/// Field values are kept as [`SecretString`] so they never end up in a
/// `Debug` dump or a log line by accident.
#[derive(Debug, Clone)]
pub struct DecryptedCredential {
    /// Credential type name, e.g. `wigleApi`.
    pub type_name: String,
    pub data: HashMap<String, SecretString>,
}

impl DecryptedCredential {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            data: HashMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(name.into(), SecretString::from(value.into()));
        self
    }

    pub fn field(&self, name: &str) -> Result<&SecretString, NodeError> {
        self.data.get(name).ok_or_else(|| {
            NodeError::MissingCredentials(format!(
                "credential '{}' has no field '{name}'",
                self.type_name
            ))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CredentialTestStatus {
    #[serde(rename = "OK")]
    Ok,
    Error,
}

/// Outcome of a connection test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialTestResult {
    pub status: CredentialTestStatus,
    pub message: String,
}

impl CredentialTestResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: CredentialTestStatus::Ok,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: CredentialTestStatus::Error,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == CredentialTestStatus::Ok
    }
}
