//! Configuration schema for supportdesk.toml.

use crate::agent::prompt::{default_sections, PromptSection};
use crate::classifier::KeywordRule;
use crate::datamap::DataMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportConfig {
    /// Agent name shown in the prompt and logs.
    pub name: String,

    /// Log level (debug, info, warn, error).
    pub log_level: String,

    /// Upper bound on a single webhook call, in seconds.
    pub webhook_timeout_secs: u64,

    /// Where `escalate_to_human` transfers the caller.
    pub transfer_target: String,

    /// Last thing said before the transfer.
    pub transfer_farewell: String,

    /// Register the built-in `check_license` / `check_version` lookups.
    pub builtin_data_maps: bool,

    /// Base URL for the built-in lookups.
    pub lookup_api_url: String,

    /// Knowledge-base search settings.
    pub knowledge_base: KnowledgeBaseConfig,

    /// Replacement triage rules for `troubleshoot`; empty keeps the defaults.
    pub troubleshoot_rules: Vec<KeywordRule>,

    /// System prompt sections, in order.
    pub prompt_sections: Vec<PromptSection>,

    /// Additional webhook-backed tools.
    pub data_maps: Vec<DataMap>,
}

/// Knowledge-base search collaborator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeBaseConfig {
    /// Search endpoint. Empty disables `search_knowledge`.
    pub url: String,

    /// Results per query.
    pub count: usize,

    /// Maximum embedding distance for a hit.
    pub distance: f64,
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            count: 3,
            distance: 0.7,
        }
    }
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            name: "support-agent".into(),
            log_level: "info".into(),
            webhook_timeout_secs: 10,
            transfer_target: "/human-support".into(),
            transfer_farewell: "Goodbye!".into(),
            builtin_data_maps: true,
            lookup_api_url: "https://api.example.com".into(),
            knowledge_base: KnowledgeBaseConfig::default(),
            troubleshoot_rules: Vec::new(),
            prompt_sections: default_sections(),
            data_maps: Vec::new(),
        }
    }
}

impl SupportConfig {
    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_secs.max(1))
    }

    pub fn knowledge_base_enabled(&self) -> bool {
        !self.knowledge_base.url.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = SupportConfig::default();
        assert_eq!(config.transfer_target, "/human-support");
        assert_eq!(config.knowledge_base.count, 3);
        assert!(!config.knowledge_base_enabled());
        assert!(config.builtin_data_maps);
        assert_eq!(config.webhook_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml_str = r#"
name = "acme-support"
webhook_timeout_secs = 0

[knowledge_base]
url = "http://localhost:8090/search"

[[troubleshoot_rules]]
name = "billing"
keywords = ["invoice", "charge"]
response = "Billing questions go to billing@example.com."

[[data_maps]]
name = "check_order"
description = "Look up an order"
output = "Order ${args.order_id} is ${status}."

[[data_maps.parameters]]
name = "order_id"
type = "string"
required = true

[data_maps.webhook]
method = "GET"
url = "https://api.example.com/orders/${args.order_id}"
"#;
        let config: SupportConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.name, "acme-support");
        assert!(config.knowledge_base_enabled());
        assert_eq!(config.knowledge_base.count, 3);
        assert_eq!(config.webhook_timeout(), Duration::from_secs(1));
        assert_eq!(config.troubleshoot_rules.len(), 1);
        assert_eq!(config.data_maps[0].name, "check_order");
        assert_eq!(config.transfer_farewell, "Goodbye!");
        assert!(!config.prompt_sections.is_empty());
    }
}
