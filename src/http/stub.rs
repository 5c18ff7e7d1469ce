//! Canned in-process transport that records every request it receives.
//!
//! Compiled for unit tests and behind the `test-util` feature.

use super::{HttpTransport, TransportError, WebhookRequest, WebhookResponse};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Reply {
    Respond(WebhookResponse),
    Fail(String),
    Stall(Duration),
}

/// Transport that answers every request the same way.
#[derive(Debug)]
pub struct StubTransport {
    reply: Reply,
    requests: Mutex<Vec<WebhookRequest>>,
}

impl StubTransport {
    /// Reply with `status` and a JSON payload.
    pub fn respond(status: u16, payload: serde_json::Value) -> Self {
        Self::respond_raw(status, &payload.to_string())
    }

    /// Reply with `status` and an arbitrary body.
    pub fn respond_raw(status: u16, payload: &str) -> Self {
        Self::with(Reply::Respond(WebhookResponse {
            status,
            payload: payload.to_string(),
        }))
    }

    /// Fail every request with a network error.
    pub fn failing(reason: &str) -> Self {
        Self::with(Reply::Fail(reason.to_string()))
    }

    /// Sleep for `delay` before answering `{}`; used to exercise timeouts.
    pub fn stalling(delay: Duration) -> Self {
        Self::with(Reply::Stall(delay))
    }

    fn with(reply: Reply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn requests(&self) -> Vec<WebhookRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn execute(&self, request: &WebhookRequest) -> Result<WebhookResponse, TransportError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        match &self.reply {
            Reply::Respond(response) => Ok(response.clone()),
            Reply::Fail(reason) => Err(TransportError::Network(reason.clone())),
            Reply::Stall(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(WebhookResponse {
                    status: 200,
                    payload: "{}".into(),
                })
            }
        }
    }
}
