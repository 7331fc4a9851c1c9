//! `nodes` crate — the node traits, the data they exchange, and a test double.
//!
//! Every node must implement [`ExecutableNode`]. Nodes that own a credential
//! type can also implement [`CredentialTester`] so the host can verify the
//! credential before a workflow runs.

pub mod credentials;
pub mod description;
pub mod error;
pub mod item;
pub mod mock;
pub mod traits;

pub use credentials::{CredentialTestResult, CredentialTestStatus, DecryptedCredential};
pub use description::{
    CredentialDescription, CredentialRef, DisplayCondition, NodeDescription, OptionValue,
    PropertyDescription, PropertyKind,
};
pub use error::NodeError;
pub use item::{Item, PairedItem};
pub use traits::{CredentialTester, ExecutableNode, ExecutionContext};
