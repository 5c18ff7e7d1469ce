//! Knowledge-base search as a tool.
//!
//! Retrieval itself (embedding, indexing, nearest-neighbour search) lives
//! behind the `KnowledgeBase` trait; this module only formats ranked hits for
//! the agent.

pub mod client;

pub use client::HttpKnowledgeBase;

use crate::tools::traits::{CallContext, NativeTool};
use crate::types::{ParamType, ParameterSpec, ToolResult};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// One ranked snippet returned by the knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub text: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub score: f64,
}

/// Black-box retrieval collaborator.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    async fn search(&self, query: &str, count: usize, distance: f64) -> Result<Vec<SearchHit>>;
}

/// Upper bound on the caller-supplied `count`.
pub const MAX_RESULTS: usize = 20;

pub const NO_RESULTS: &str = "No relevant information found in the knowledge base.";
pub const UNAVAILABLE: &str =
    "The knowledge base is unavailable right now. I can create a support ticket instead.";

/// The `search_knowledge` tool.
pub struct SearchKnowledge {
    kb: Arc<dyn KnowledgeBase>,
    count: usize,
    distance: f64,
}

impl SearchKnowledge {
    pub const NAME: &'static str = "search_knowledge";

    pub fn new(kb: Arc<dyn KnowledgeBase>, count: usize, distance: f64) -> Self {
        Self {
            kb,
            count,
            distance,
        }
    }

    pub fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::new("query", ParamType::String, "What to look up", true),
            ParameterSpec::new(
                "count",
                ParamType::Number,
                "Maximum number of results",
                false,
            ),
        ]
    }
}

#[async_trait]
impl NativeTool for SearchKnowledge {
    async fn call(&self, args: &serde_json::Value, _ctx: &CallContext<'_>) -> ToolResult {
        let query = args["query"].as_str().unwrap_or_default();
        let count = args["count"]
            .as_f64()
            .filter(|c| *c >= 1.0)
            .map(|c| c.min(MAX_RESULTS as f64) as usize)
            .unwrap_or(self.count);

        match self.kb.search(query, count, self.distance).await {
            Ok(hits) if hits.is_empty() => ToolResult::new(NO_RESULTS),
            Ok(hits) => {
                info!("Knowledge search '{}' returned {} hit(s)", query, hits.len());
                ToolResult::new(format_hits(&hits))
            }
            Err(e) => {
                warn!("Knowledge search failed: {:#}", e);
                ToolResult::new(UNAVAILABLE)
            }
        }
    }
}

fn format_hits(hits: &[SearchHit]) -> String {
    let mut out = String::from("Found in the knowledge base:\n");
    for (i, hit) in hits.iter().enumerate() {
        out.push_str(&format!("{}. {}", i + 1, hit.text.trim()));
        if !hit.source.is_empty() {
            out.push_str(&format!(" (source: {})", hit.source));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GlobalData;
    use serde_json::json;
    use std::sync::Mutex;

    struct FixedKb {
        hits: Vec<SearchHit>,
        seen: Mutex<Vec<(String, usize)>>,
    }

    #[async_trait]
    impl KnowledgeBase for FixedKb {
        async fn search(&self, query: &str, count: usize, _distance: f64) -> Result<Vec<SearchHit>> {
            self.seen.lock().unwrap().push((query.to_string(), count));
            Ok(self.hits.iter().take(count).cloned().collect())
        }
    }

    struct DownKb;

    #[async_trait]
    impl KnowledgeBase for DownKb {
        async fn search(&self, _: &str, _: usize, _: f64) -> Result<Vec<SearchHit>> {
            anyhow::bail!("index not loaded")
        }
    }

    fn hit(text: &str, source: &str) -> SearchHit {
        SearchHit {
            text: text.into(),
            source: source.into(),
            score: 0.9,
        }
    }

    #[tokio::test]
    async fn test_formats_hits_with_sources() {
        let kb = Arc::new(FixedKb {
            hits: vec![hit("Run the installer as admin.", "install.md"), hit("Reboot.", "")],
            seen: Mutex::new(Vec::new()),
        });
        let tool = SearchKnowledge::new(kb.clone(), 3, 0.7);
        let globals = GlobalData::new();
        let ctx = CallContext { global_data: &globals };

        let result = tool.call(&json!({"query": "install"}), &ctx).await;
        assert_eq!(
            result.text,
            "Found in the knowledge base:\n1. Run the installer as admin. (source: install.md)\n2. Reboot.\n"
        );
        assert_eq!(kb.seen.lock().unwrap()[0], ("install".to_string(), 3));
    }

    #[tokio::test]
    async fn test_count_override_and_empty() {
        let kb = Arc::new(FixedKb {
            hits: Vec::new(),
            seen: Mutex::new(Vec::new()),
        });
        let tool = SearchKnowledge::new(kb.clone(), 3, 0.7);
        let globals = GlobalData::new();
        let ctx = CallContext { global_data: &globals };

        let result = tool.call(&json!({"query": "x", "count": 1}), &ctx).await;
        assert_eq!(result.text, NO_RESULTS);
        assert_eq!(kb.seen.lock().unwrap()[0].1, 1);
    }

    #[tokio::test]
    async fn test_huge_count_is_capped() {
        let kb = Arc::new(FixedKb {
            hits: Vec::new(),
            seen: Mutex::new(Vec::new()),
        });
        let tool = SearchKnowledge::new(kb.clone(), 3, 0.7);
        let globals = GlobalData::new();
        let ctx = CallContext { global_data: &globals };

        tool.call(&json!({"query": "x", "count": 1e300}), &ctx).await;
        tool.call(&json!({"query": "x", "count": 0}), &ctx).await;
        let seen = kb.seen.lock().unwrap();
        assert_eq!(seen[0].1, MAX_RESULTS);
        assert_eq!(seen[1].1, 3);
    }

    #[tokio::test]
    async fn test_search_failure_is_not_fatal() {
        let tool = SearchKnowledge::new(Arc::new(DownKb), 3, 0.7);
        let globals = GlobalData::new();
        let ctx = CallContext { global_data: &globals };
        let result = tool.call(&json!({"query": "x"}), &ctx).await;
        assert_eq!(result.text, UNAVAILABLE);
        assert!(!result.terminal);
    }
}
