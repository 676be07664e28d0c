pub mod config;
pub mod errors;
pub mod models;
pub mod traits;

pub use config::AppConfig;
pub use errors::*;
pub use models::{Node, NodeStatus, DEFAULT_NODE_CAPACITY};
pub use traits::{NodeRegistry, NodeSelectionStrategy};
