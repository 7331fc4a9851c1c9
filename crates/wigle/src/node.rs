//! The WiGLE node: per-item network search and the credential check.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use nodes::{
    CredentialTestResult, CredentialTester, DecryptedCredential, ExecutableNode, ExecutionContext,
    Item, NodeDescription, NodeError,
};

use crate::client::{ClientConfig, WigleClient};
use crate::credentials::{WigleApiKey, CREDENTIAL_TYPE};
use crate::description::node_description;
use crate::query::{Operation, SearchParameters};

pub const CONNECTION_OK: &str = "Connection successful!";

pub struct WigleNode {
    description: NodeDescription,
    config: ClientConfig,
}

impl WigleNode {
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            description: node_description(),
            config,
        }
    }

    async fn search_network(
        &self,
        mut item: Item,
        params: &SearchParameters,
        api_key: &WigleApiKey,
    ) -> Result<Item, NodeError> {
        let query = params.build_query();
        let client = WigleClient::new(api_key, &self.config)?;

        let response = client.search(&query).await.map_err(|err| {
            warn!("network search failed: {err}");
            NodeError::from(err)
        })?;

        item.json.insert(params.results_field().to_owned(), response.results);
        Ok(item)
    }
}

impl Default for WigleNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutableNode for WigleNode {
    fn description(&self) -> &NodeDescription {
        &self.description
    }

    async fn execute(
        &self,
        item: Item,
        item_index: usize,
        parameters: &Value,
        ctx: &ExecutionContext,
    ) -> Result<Item, NodeError> {
        let params = SearchParameters::from_value(parameters)?;
        let api_key = WigleApiKey::from_credential(ctx.credential(CREDENTIAL_TYPE)?)?;

        debug!("item {item_index}: {:?}", params.operation);
        let item = match params.operation {
            Operation::SearchNetwork => self.search_network(item, &params, &api_key).await?,
        };

        Ok(item.paired_with(item_index))
    }
}

#[async_trait]
impl CredentialTester for WigleNode {
    async fn test_credential(&self, credential: &DecryptedCredential) -> CredentialTestResult {
        let api_key = match WigleApiKey::from_credential(credential) {
            Ok(key) => key,
            Err(err) => return CredentialTestResult::error(err.to_string()),
        };

        let outcome = match WigleClient::new(&api_key, &self.config) {
            Ok(client) => client.user_profile().await,
            Err(err) => Err(err),
        };

        match outcome {
            Ok(()) => CredentialTestResult::ok(CONNECTION_OK),
            Err(err) => {
                debug!("credential test failed: {err}");
                CredentialTestResult::error(err.raw_message())
            }
        }
    }
}
