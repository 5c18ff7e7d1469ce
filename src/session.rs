//! Per-conversation global data.
//!
//! One `Session` exists per conversation and is passed explicitly to the
//! dispatcher. Tool results only ever patch it: keys are inserted or
//! overwritten, never removed, and patches apply in the order results are
//! produced.

use crate::types::{GlobalData, TransferSignal};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

/// Mutable state scoped to a single conversation.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    started_at: DateTime<Utc>,
    global_data: GlobalData,
    transfer: Option<TransferSignal>,
}

impl Session {
    pub fn new() -> Self {
        Self::with_global_data(GlobalData::new())
    }

    /// Start a conversation with globals seeded by the platform.
    pub fn with_global_data(global_data: GlobalData) -> Self {
        let id = ulid::Ulid::new().to_string();
        debug!("Session {} started", id);
        Self {
            id,
            started_at: Utc::now(),
            global_data,
            transfer: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Time since the conversation started.
    pub fn elapsed(&self) -> Duration {
        Utc::now() - self.started_at
    }

    /// Read-only view handed to tool handlers.
    pub fn global_data(&self) -> &GlobalData {
        &self.global_data
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.global_data.get(key)
    }

    /// Apply a tool's patch: last write wins per key.
    pub fn merge(&mut self, patch: &GlobalData) {
        if patch.is_empty() {
            return;
        }
        for (key, value) in patch {
            self.global_data.insert(key.clone(), value.clone());
        }
        info!(
            "Session {}: merged {} key(s) into global data",
            self.id,
            patch.len()
        );
    }

    /// Record the terminal hand-off; later calls are refused until `resume`.
    pub fn end(&mut self, signal: TransferSignal) {
        info!(
            "Session {} ended after {}s: transfer to {}",
            self.id,
            self.elapsed().num_seconds(),
            signal.target
        );
        self.transfer = Some(signal);
    }

    pub fn is_ended(&self) -> bool {
        self.transfer.is_some()
    }

    /// The pending transfer, for the telephony/session layer.
    pub fn transfer(&self) -> Option<&TransferSignal> {
        self.transfer.as_ref()
    }

    /// Reopen an ended conversation at the platform's request.
    pub fn resume(&mut self) {
        if self.transfer.take().is_some() {
            info!("Session {} resumed", self.id);
        }
    }

    /// Hand the final globals to whoever closes the conversation.
    pub fn into_global_data(self) -> GlobalData {
        self.global_data
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
