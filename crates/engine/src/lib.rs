//! `engine` crate — runs a configured node over a list of input items.

pub mod error;
pub mod executor;
pub mod models;

pub use error::EngineError;
pub use executor::{ExecutionResult, ExecutorConfig, NodeExecutor, NodeRegistry};
pub use models::NodeDefinition;
