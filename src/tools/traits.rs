//! Native tool trait and the schema shape exposed to the orchestration loop.

use crate::types::{GlobalData, ToolResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Definition of a tool as presented to the function-calling model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
    /// Phrases the agent may say while the tool runs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fillers: Vec<String>,
}

/// What a native handler may see besides its arguments.
#[derive(Debug, Clone, Copy)]
pub struct CallContext<'a> {
    /// Current session globals. Handlers return a patch instead of mutating.
    pub global_data: &'a GlobalData,
}

/// A tool implemented in Rust.
#[async_trait]
pub trait NativeTool: Send + Sync {
    /// Run the tool. Arguments have already been validated.
    async fn call(&self, args: &serde_json::Value, ctx: &CallContext<'_>) -> ToolResult;
}

/// Adapts a synchronous closure into a `NativeTool`.
pub struct FnTool<F>(F);

impl<F> FnTool<F>
where
    F: Fn(&serde_json::Value, &CallContext<'_>) -> ToolResult + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> NativeTool for FnTool<F>
where
    F: Fn(&serde_json::Value, &CallContext<'_>) -> ToolResult + Send + Sync,
{
    async fn call(&self, args: &serde_json::Value, ctx: &CallContext<'_>) -> ToolResult {
        (self.0)(args, ctx)
    }
}
