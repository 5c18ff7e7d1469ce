//! Name-keyed tool registry.
//!
//! Built once at startup and shared read-only afterwards. Registering a
//! name twice is a configuration error and is rejected.

use super::params::parameters_schema;
use super::traits::{NativeTool, ToolDefinition};
use crate::datamap::DataMap;
use crate::error::ToolError;
use crate::types::ParameterSpec;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// How a tool is executed.
#[derive(Clone)]
pub enum ToolHandler {
    Native(Arc<dyn NativeTool>),
    DataMap(Arc<DataMap>),
}

impl fmt::Debug for ToolHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native(_) => write!(f, "Native"),
            Self::DataMap(dm) => write!(f, "DataMap({})", dm.name),
        }
    }
}

/// A registered tool.
#[derive(Debug, Clone)]
pub struct ToolEntry {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
    pub fillers: Vec<String>,
    pub handler: ToolHandler,
}

impl ToolEntry {
    pub fn native(
        name: &str,
        description: &str,
        parameters: Vec<ParameterSpec>,
        tool: impl NativeTool + 'static,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters,
            fillers: Vec::new(),
            handler: ToolHandler::Native(Arc::new(tool)),
        }
    }

    /// Name, description and parameters come from the descriptor itself.
    pub fn from_data_map(data_map: DataMap) -> Self {
        Self {
            name: data_map.name.clone(),
            description: data_map.description.clone(),
            parameters: data_map.parameters.clone(),
            fillers: Vec::new(),
            handler: ToolHandler::DataMap(Arc::new(data_map)),
        }
    }

    pub fn with_fillers(mut self, fillers: &[&str]) -> Self {
        self.fillers = fillers.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: parameters_schema(&self.parameters),
            fillers: self.fillers.clone(),
        }
    }
}

/// All tools available to a conversation, in registration order.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    entries: Vec<ToolEntry>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool. Fails if the name is already taken.
    pub fn register(&mut self, entry: ToolEntry) -> Result<(), ToolError> {
        if self.index.contains_key(&entry.name) {
            return Err(ToolError::DuplicateToolRegistration(entry.name));
        }
        debug!("Registered tool '{}' ({:?})", entry.name, entry.handler);
        self.index.insert(entry.name.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    pub fn register_data_map(&mut self, data_map: DataMap) -> Result<(), ToolError> {
        self.register(ToolEntry::from_data_map(data_map))
    }

    pub fn resolve(&self, name: &str) -> Option<&ToolEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Tool definitions in registration order, one per name.
    pub fn schema_snapshot(&self) -> Vec<ToolDefinition> {
        self.entries.iter().map(ToolEntry::definition).collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::tools::traits::{CallContext, FnTool};
    use crate::types::ToolResult;

    fn echo(name: &str) -> ToolEntry {
        ToolEntry::native(
            name,
            "Echo",
            Vec::new(),
            FnTool::new(|_: &serde_json::Value, _: &CallContext<'_>| ToolResult::new("echo")),
        )
    }

    fn data_map(name: &str) -> DataMap {
        DataMap::builder(name)
            .description("Lookup")
            .webhook(HttpMethod::Get, "https://example.com")
            .output("ok")
            .build()
            .unwrap()
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = ToolRegistry::new();
        registry.register(echo("a")).unwrap();
        registry.register_data_map(data_map("b")).unwrap();

        assert!(matches!(
            registry.resolve("a").unwrap().handler,
            ToolHandler::Native(_)
        ));
        assert!(matches!(
            registry.resolve("b").unwrap().handler,
            ToolHandler::DataMap(_)
        ));
        assert!(registry.resolve("c").is_none());
    }

    #[test]
    fn test_duplicate_rejected_and_original_kept() {
        let mut registry = ToolRegistry::new();
        registry.register(echo("a")).unwrap();
        let err = registry.register_data_map(data_map("a")).unwrap_err();
        assert_eq!(err, ToolError::DuplicateToolRegistration("a".into()));
        assert!(err.is_fatal());
        assert_eq!(registry.len(), 1);
        assert!(matches!(
            registry.resolve("a").unwrap().handler,
            ToolHandler::Native(_)
        ));
    }

    #[test]
    fn test_schema_snapshot_order_and_uniqueness() {
        let mut registry = ToolRegistry::new();
        for name in ["z", "a", "m"] {
            registry.register(echo(name)).unwrap();
        }
        let names: Vec<String> = registry
            .schema_snapshot()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["z", "a", "m"]);
        assert_eq!(registry.schema_snapshot(), registry.schema_snapshot());
    }

    #[test]
    fn test_definition_includes_fillers() {
        let entry = echo("a").with_fillers(&["One moment..."]);
        let def = entry.definition();
        assert_eq!(def.fillers, vec!["One moment..."]);
        assert_eq!(def.parameters["type"], "object");
    }
}
