//! Supportdesk: declarative tools and session state for support agents.
//!
//! Tools are either native Rust handlers or data maps: templated webhook
//! calls whose responses are templated back into agent-facing text. Each
//! conversation carries its own global data, patched by tool results.

pub mod agent;
pub mod classifier;
pub mod config;
pub mod datamap;
pub mod dispatcher;
pub mod error;
pub mod http;
pub mod knowledge;
pub mod session;
pub mod template;
pub mod tools;
pub mod types;

pub use dispatcher::Dispatcher;
pub use error::{ToolError, ToolErrorKind};
pub use session::Session;
pub use types::{GlobalData, ToolCall, ToolResult, TransferSignal};
