//! Function registry - the capability table handed to an agent framework.
//!
//! The registry is built explicitly at composition time: callers create
//! it, register tools against it, then expose it however their framework
//! surfaces named callables. Every tool takes a JSON argument object and
//! returns plain text; there is no structured result channel.

use serde_json::Value;
use tracing::debug;

use crate::error::ToolError;

/// Handler invoked when the agent calls a registered tool.
pub type ToolHandler = Box<dyn Fn(&Value) -> Result<String, ToolError> + Send + Sync>;

/// Descriptor surfaced to the agent: name, prose description, and a JSON
/// Schema for the argument object.
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

struct RegisteredTool {
    spec: ToolSpec,
    handler: ToolHandler,
}

/// Ordered name-to-handler mapping.
pub struct ToolRegistry {
    name: String,
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tools: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a tool. Names are expected to be unique; duplicates are
    /// not rejected, and lookup finds the earliest registration.
    pub fn register(&mut self, spec: ToolSpec, handler: ToolHandler) {
        debug!(registry = %self.name, tool = %spec.name, "registered tool");
        self.tools.push(RegisteredTool { spec, handler });
    }

    /// Tool descriptors in registration order.
    pub fn specs(&self) -> impl Iterator<Item = &ToolSpec> {
        self.tools.iter().map(|tool| &tool.spec)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.spec.name.as_str()).collect()
    }

    /// Invoke a tool by name.
    ///
    /// `Err` here means a registry contract violation (unknown name,
    /// malformed arguments); query failures come back as `Ok` text.
    pub fn invoke(&self, name: &str, args: &Value) -> Result<String, ToolError> {
        let tool = self
            .tools
            .iter()
            .find(|tool| tool.spec.name == name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        debug!(registry = %self.name, tool = name, "invoking tool");
        (tool.handler)(args)
    }
}
