//! mallard: DuckDB operations exposed as callable tools for agent
//! frameworks. The toolkit lazily opens one connection, submits SQL, and
//! flattens every result to plain text.

pub mod config;
pub mod engine;
pub mod error;
pub mod registry;
pub mod toolkit;

pub use config::ToolkitConfig;
pub use engine::{Engine, QueryReply};
pub use error::ToolError;
pub use registry::{ToolRegistry, ToolSpec};
pub use toolkit::{register_tools, DuckDbToolkit};
