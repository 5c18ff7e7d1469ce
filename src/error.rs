//! Tool error types.
//!
//! Caller mistakes and webhook failures are folded into user-presentable
//! `ToolResult`s; only `DuplicateToolRegistration` ever aborts startup.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the tool layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("Invalid arguments for '{tool}': {reason}")]
    Validation { tool: String, reason: String },

    #[error("Unknown tool: {0}")]
    ToolNotFound(String),

    #[error("Webhook for '{tool}' failed: {reason}")]
    WebhookFailure { tool: String, reason: String },

    #[error("Tool '{0}' is already registered")]
    DuplicateToolRegistration(String),

    #[error("Conversation has ended; '{0}' was not run")]
    SessionEnded(String),
}

/// Serializable classification carried on a failed `ToolResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    Validation,
    ToolNotFound,
    WebhookFailure,
    DuplicateToolRegistration,
    SessionEnded,
}

impl ToolError {
    pub fn kind(&self) -> ToolErrorKind {
        match self {
            Self::Validation { .. } => ToolErrorKind::Validation,
            Self::ToolNotFound(_) => ToolErrorKind::ToolNotFound,
            Self::WebhookFailure { .. } => ToolErrorKind::WebhookFailure,
            Self::DuplicateToolRegistration(_) => ToolErrorKind::DuplicateToolRegistration,
            Self::SessionEnded(_) => ToolErrorKind::SessionEnded,
        }
    }

    /// Startup-only errors; everything else is recovered per call.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::DuplicateToolRegistration(_))
    }
}
