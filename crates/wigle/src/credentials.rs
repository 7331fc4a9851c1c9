//! The `wigleApi` credential type.

use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};

use nodes::{CredentialDescription, DecryptedCredential, NodeError, PropertyDescription};

use crate::Error;

/// Credential type name nodes refer to.
pub const CREDENTIAL_TYPE: &str = "wigleApi";

/// The single stored field.
pub const API_KEY_FIELD: &str = "api_key";

pub fn credential_description() -> CredentialDescription {
    CredentialDescription {
        name: CREDENTIAL_TYPE.to_owned(),
        display_name: "WiGLE API".to_owned(),
        properties: vec![PropertyDescription::string(API_KEY_FIELD, "Api Key", "").password()],
    }
}

/// The WiGLE "encoded for use" token, sent after `Basic ` as is.
#[derive(Debug, Clone)]
pub struct WigleApiKey(SecretString);

impl WigleApiKey {
    pub fn new(key: SecretString) -> Self {
        Self(key)
    }

    pub fn from_credential(credential: &DecryptedCredential) -> Result<Self, NodeError> {
        credential.field(API_KEY_FIELD).cloned().map(Self)
    }

    /// `Authorization` header value, flagged sensitive.
    pub(crate) fn authorization(&self) -> Result<HeaderValue, Error> {
        let mut value = HeaderValue::from_str(&format!("Basic {}", self.0.expose_secret()))
            .map_err(|e| Error::InvalidApiKey(e.to_string()))?;
        value.set_sensitive(true);
        Ok(value)
    }
}
