//! `wigle` crate — a workflow node that searches the WiGLE wireless-network
//! database.
//!
//! The node takes its filters from the configured parameters (SSID/BSSID,
//! a geo radius, a postal address), issues one `network/search` request per
//! input item, and stores the returned `results` array on the item. The
//! `wigleApi` credential carries the API token; [`WigleNode`] also
//! implements [`nodes::CredentialTester`] to verify it.

pub mod client;
pub mod credentials;
pub mod description;
pub mod error;
pub mod node;
pub mod query;

pub use client::{ClientConfig, SearchResponse, WigleClient, DEFAULT_BASE_URL};
pub use credentials::{credential_description, WigleApiKey, API_KEY_FIELD, CREDENTIAL_TYPE};
pub use description::{node_description, NODE_TYPE};
pub use error::{ApiError, Error};
pub use node::WigleNode;
pub use query::{BoundingBox, Operation, QueryValue, SearchParameters, SearchQuery};
