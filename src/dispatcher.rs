//! Tool invocation: look up, validate, execute, merge.
//!
//! The dispatcher is shared across conversations; each conversation brings
//! its own `Session`. Calls within one session are sequential by
//! construction (`&mut Session`).

use crate::error::ToolError;
use crate::http::HttpTransport;
use crate::session::Session;
use crate::tools::params::validate_arguments;
use crate::tools::{CallContext, ToolHandler, ToolRegistry};
use crate::types::{ToolCall, ToolResult, TransferSignal};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Routes tool calls to their handlers.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    transport: Arc<dyn HttpTransport>,
    webhook_timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<ToolRegistry>,
        transport: Arc<dyn HttpTransport>,
        webhook_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            transport,
            webhook_timeout,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Invoke `name` for one conversation.
    ///
    /// Never fails: every error is folded into the returned `ToolResult`.
    /// On return `session` holds the merged global data, and a terminal
    /// result has ended it.
    pub async fn invoke(&self, name: &str, arguments: &Value, session: &mut Session) -> ToolResult {
        if session.is_ended() {
            let err = ToolError::SessionEnded(name.to_string());
            warn!("Session {}: {}", session.id(), err);
            return ToolResult::failure(
                err.kind(),
                "This conversation has already been handed off.",
            );
        }

        let Some(entry) = self.registry.resolve(name) else {
            let err = ToolError::ToolNotFound(name.to_string());
            warn!("Session {}: {}", session.id(), err);
            return ToolResult::failure(
                err.kind(),
                format!(
                    "I'm sorry, I don't have a way to do that ('{}' is not available).",
                    name
                ),
            );
        };

        info!("Session {}: invoking {}", session.id(), name);
        debug!("Session {}: {} arguments: {}", session.id(), name, arguments);

        let result = match &entry.handler {
            ToolHandler::Native(tool) => {
                match validate_arguments(&entry.name, &entry.parameters, arguments) {
                    Ok(()) => {
                        let args = match arguments {
                            Value::Null => Value::Object(Default::default()),
                            other => other.clone(),
                        };
                        let ctx = CallContext {
                            global_data: session.global_data(),
                        };
                        tool.call(&args, &ctx).await
                    }
                    Err(e) => {
                        warn!("Session {}: {}", session.id(), e);
                        ToolResult::failure(e.kind(), e.to_string())
                    }
                }
            }
            ToolHandler::DataMap(data_map) => {
                data_map
                    .execute(arguments, self.transport.as_ref(), self.webhook_timeout)
                    .await
            }
        };

        if let Some(patch) = &result.global_data_patch {
            session.merge(patch);
        }

        if result.terminal {
            let signal = result.transfer.clone().unwrap_or_else(|| TransferSignal {
                target: String::new(),
                final_message: result.text.clone(),
                is_final: true,
            });
            session.end(signal);
        }

        result
    }

    /// Convenience wrapper for a decoded `ToolCall`.
    pub async fn invoke_call(&self, call: &ToolCall, session: &mut Session) -> ToolResult {
        self.invoke(&call.name, &call.arguments, session).await
    }
}
