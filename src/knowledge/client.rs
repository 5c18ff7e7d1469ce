//! HTTP client for a remote knowledge-base search service.

use super::{KnowledgeBase, SearchHit};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Knowledge base reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpKnowledgeBase {
    search_url: String,
    http: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    count: usize,
    distance: f64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

impl HttpKnowledgeBase {
    pub fn new(search_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build knowledge-base HTTP client")?;
        Ok(Self {
            search_url: search_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl KnowledgeBase for HttpKnowledgeBase {
    async fn search(&self, query: &str, count: usize, distance: f64) -> Result<Vec<SearchHit>> {
        debug!("Knowledge search: {}", query);

        let resp = self
            .http
            .post(&self.search_url)
            .json(&SearchRequest {
                query,
                count,
                distance,
            })
            .send()
            .await
            .context("Knowledge search request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("Knowledge search failed ({}): {}", status, body);
        }

        let body: SearchResponse = resp
            .json()
            .await
            .context("Failed to parse knowledge search response")?;
        Ok(body.results)
    }
}
