//! Outbound HTTP seam for data-map webhooks.
//!
//! The tool layer only builds `WebhookRequest`s and interprets
//! `WebhookResponse`s; sockets, TLS and retries belong to the transport.

pub mod client;
#[cfg(any(test, feature = "test-util"))]
pub mod stub;

pub use client::ReqwestTransport;
#[cfg(any(test, feature = "test-util"))]
pub use stub::StubTransport;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// HTTP verbs a webhook template may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Patch => write!(f, "PATCH"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// A fully resolved outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

/// Raw response handed back by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: u16,
    pub payload: String,
}

impl WebhookResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failures. Non-2xx statuses are not errors here.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Network(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Executes webhook requests on behalf of data-map tools.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: &WebhookRequest) -> Result<WebhookResponse, TransportError>;
}
