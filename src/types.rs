//! Shared types used across the supportdesk runtime.

use crate::error::ToolErrorKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Session globals: a flat string-keyed map of arbitrary JSON values.
pub type GlobalData = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Parameter schema
// ---------------------------------------------------------------------------

/// Value type a tool parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Boolean,
    /// A string restricted to `ParameterSpec::enum_values`.
    Enum,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::Enum => write!(f, "enum"),
        }
    }
}

/// One declared tool parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
}

impl ParameterSpec {
    pub fn new(name: &str, param_type: ParamType, description: &str, required: bool) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            description: description.to_string(),
            required,
            enum_values: None,
        }
    }

    /// Shorthand for an enum parameter.
    pub fn enumeration(name: &str, values: &[&str], description: &str, required: bool) -> Self {
        Self {
            enum_values: Some(values.iter().map(|v| v.to_string()).collect()),
            ..Self::new(name, ParamType::Enum, description, required)
        }
    }
}

// ---------------------------------------------------------------------------
// Tool calls and results
// ---------------------------------------------------------------------------

/// A tool call request from the orchestration loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

/// Hand-off instruction surfaced to the telephony/session layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferSignal {
    pub target: String,
    pub final_message: String,
    #[serde(rename = "final")]
    pub is_final: bool,
}

/// Outcome of one tool invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolResult {
    /// Agent-facing text.
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_data_patch: Option<GlobalData>,
    /// When set, no further tools run in this conversation.
    #[serde(default)]
    pub terminal: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer: Option<TransferSignal>,
    /// Ask the orchestration loop to speak the text before acting on it.
    #[serde(default)]
    pub post_process: bool,
    /// Informational context (e.g. which ticket an escalation refers to).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolErrorKind>,
}

impl ToolResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Build a user-presentable failure result.
    pub fn failure(kind: ToolErrorKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            error: Some(kind),
            ..Default::default()
        }
    }

    /// Add keys to the global data patch. Repeated calls accumulate.
    pub fn update_global_data(mut self, patch: serde_json::Value) -> Self {
        if let serde_json::Value::Object(map) = patch {
            self.global_data_patch
                .get_or_insert_with(GlobalData::new)
                .extend(map);
        }
        self
    }

    /// Hand the conversation to `target`. A `final` transfer is terminal.
    pub fn transfer(mut self, target: &str, final_message: &str, is_final: bool) -> Self {
        self.transfer = Some(TransferSignal {
            target: target.to_string(),
            final_message: final_message.to_string(),
            is_final,
        });
        self.terminal = self.terminal || is_final;
        self
    }

    pub fn with_post_process(mut self, post_process: bool) -> Self {
        self.post_process = post_process;
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_global_data_accumulates() {
        let result = ToolResult::new("ok")
            .update_global_data(json!({"a": 1}))
            .update_global_data(json!({"b": 2, "a": 3}));
        let patch = result.global_data_patch.unwrap();
        assert_eq!(patch.get("a"), Some(&json!(3)));
        assert_eq!(patch.get("b"), Some(&json!(2)));
    }

    #[test]
    fn test_final_transfer_is_terminal() {
        let result = ToolResult::new("bye").transfer("/human", "Goodbye!", true);
        assert!(result.terminal);
        assert_eq!(result.transfer.unwrap().target, "/human");

        let soft = ToolResult::new("hold on").transfer("/queue", "One moment", false);
        assert!(!soft.terminal);
    }

    #[test]
    fn test_parameter_spec_deserialize() {
        let spec: ParameterSpec = toml::from_str(
            r#"
name = "priority"
type = "enum"
enum_values = ["low", "high"]
"#,
        )
        .unwrap();
        assert_eq!(spec.param_type, ParamType::Enum);
        assert!(!spec.required);
        assert_eq!(spec.enum_values.unwrap().len(), 2);
    }

    #[test]
    fn test_transfer_signal_serializes_final() {
        let signal = TransferSignal {
            target: "/human-support".into(),
            final_message: "Goodbye!".into(),
            is_final: true,
        };
        let value = serde_json::to_value(&signal).unwrap();
        assert_eq!(value["final"], json!(true));
    }
}
